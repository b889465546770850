use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::listing::Listing;

/// A capability flag and the label shown when it is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub flag: Arc<str>,
    pub label: Arc<str>,
}

/// The ordered badges a category displays on its cards.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BadgeSpec(Vec<Badge>);

static COMMON: Lazy<BadgeSpec> = Lazy::new(|| BadgeSpec::from_pairs(&[
    ("verified", "Verified"),
    ("emergency", "Emergency call-outs"),
    ("available_24h", "24/7"),
]));

impl BadgeSpec {
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        BadgeSpec(pairs.iter()
            .map(|&(flag, label)| Badge { flag: flag.into(), label: label.into() })
            .collect())
    }

    /// The badges used by categories that don't declare their own.
    pub fn common() -> &'static BadgeSpec {
        &COMMON
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Badge> {
        self.0.iter()
    }

    /// Labels of the badges whose flag is set on `listing`, in declared order.
    ///
    /// ```rust
    /// use saltaire::{BadgeSpec, Listing};
    ///
    /// let spec = BadgeSpec::from_pairs(&[
    ///     ("emergency", "Emergency"),
    ///     ("verified", "Verified"),
    ///     ("part_p", "Part P registered"),
    /// ]);
    ///
    /// let mut listing = Listing::new("spark", "Spark Electrical");
    /// listing.verified = true;
    /// listing.emergency = true;
    /// assert_eq!(spec.badges(&listing), ["Emergency", "Verified"]);
    /// ```
    pub fn badges<'s>(&'s self, listing: &Listing) -> Vec<&'s str> {
        self.0.iter()
            .filter(|badge| listing.flag(&badge.flag))
            .map(|badge| &*badge.label)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badges_are_deterministic() {
        let spec = BadgeSpec::from_pairs(&[("a", "A"), ("b", "B"), ("c", "C")]);
        let mut listing = Listing::new("x", "X");
        listing.extra.insert("c".into(), true.into());
        listing.extra.insert("a".into(), true.into());

        let first = spec.badges(&listing);
        assert_eq!(first, ["A", "C"]);
        assert_eq!(first, spec.badges(&listing));
    }

    #[test]
    fn common_spec_uses_typed_flags() {
        let mut listing = Listing::new("x", "X");
        listing.available_24h = true;
        assert_eq!(BadgeSpec::common().badges(&listing), ["24/7"]);
    }

    #[test]
    fn deserializes_from_table_array() {
        #[derive(Deserialize)]
        struct Page { badges: BadgeSpec }

        let page: Page = toml::from_str(r#"
            [[badges]]
            flag = "dbs_checked"
            label = "DBS checked"
        "#).unwrap();

        assert_eq!(page.badges, BadgeSpec::from_pairs(&[("dbs_checked", "DBS checked")]));
    }
}
