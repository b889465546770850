use std::borrow::Cow;
use std::sync::Arc;

use derive_more::{Debug, Deref, Display, From};
use serde::{Deserialize, Serialize};

use crate::util::slugify;

/// Shown in place of a phone number when a listing has none.
pub const NO_PHONE: &str = "No phone listed";

/// Reduces a human-formatted phone number to its digits, keeping a leading
/// `+`. Returns `None` when nothing dialable is left.
///
/// ```rust
/// use saltaire::listing::dialable;
///
/// assert_eq!(dialable(" +44 (0)1274 123456").as_deref(), Some("+4401274123456"));
/// assert_eq!(dialable("n/a"), None);
/// ```
pub fn dialable(number: &str) -> Option<String> {
    let number = number.trim();
    let mut tel = String::with_capacity(number.len());
    for (i, ch) in number.chars().enumerate() {
        if ch.is_ascii_digit() || (i == 0 && ch == '+') {
            tel.push(ch);
        }
    }

    (!tel.is_empty()).then_some(tel)
}

/// The unique id of a listing within its category: the card's anchor id and
/// the comparison table's row key.
#[derive(Debug, Display, Deref, From, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize, Default)]
#[debug("{_0:?}")]
#[serde(transparent)]
pub struct Slug(Arc<str>);

impl Slug {
    pub fn new<S: Into<Arc<str>>>(slug: S) -> Self {
        Slug(slug.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The in-page fragment, `#slug`.
    pub fn fragment(&self) -> String {
        format!("#{}", self.0)
    }
}

impl From<&str> for Slug {
    fn from(value: &str) -> Self {
        Slug::new(value)
    }
}

/// A single directory entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Listing {
    pub slug: Slug,
    pub name: Arc<str>,
    pub phone_local: Option<Arc<str>>,
    pub phone_tel: Option<Arc<str>>,
    pub email: Option<Arc<str>>,
    pub website: Option<Arc<str>>,
    pub booking_url: Option<Arc<str>>,
    pub excerpt: Option<Arc<str>>,
    pub price_from: Option<Arc<str>>,
    pub image: Option<Arc<str>>,
    pub emergency: bool,
    pub available_24h: bool,
    pub featured: bool,
    pub verified: bool,
    pub accreditations: Vec<Arc<str>>,
    pub area_served: Vec<Arc<str>>,
    pub tags: Vec<Arc<str>>,
    pub services: Vec<Arc<str>>,
    pub payment: Vec<Arc<str>>,
    pub notes: Vec<Arc<str>>,
    /// Category-specific fields, e.g. `dog_walking = true` for pet sitters.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Listing {
    pub fn new<N: Into<Arc<str>>>(slug: &str, name: N) -> Self {
        Listing { slug: slug.into(), name: name.into(), ..Default::default() }
    }

    /// Returns the slug, deriving one from the name when it is missing.
    pub(crate) fn ensure_slug(&mut self) -> &Slug {
        if self.slug.is_empty() {
            self.slug = Slug::new(slugify(&self.name));
        }

        &self.slug
    }

    /// Whether the capability flag `name` is set. Only boolean `true` counts;
    /// an absent or non-boolean field is `false`.
    ///
    /// ```rust
    /// use saltaire::Listing;
    ///
    /// let mut listing = Listing::new("paws", "Paws About Town");
    /// listing.extra.insert("dog_walking".into(), true.into());
    /// listing.extra.insert("cats".into(), "yes".into());
    ///
    /// assert!(listing.flag("dog_walking"));
    /// assert!(!listing.flag("cats"));
    /// assert!(!listing.flag("emergency"));
    /// ```
    pub fn flag(&self, name: &str) -> bool {
        match name {
            "emergency" => self.emergency,
            "available_24h" => self.available_24h,
            "featured" => self.featured,
            "verified" => self.verified,
            _ => self.extra.get(name).and_then(|v| v.as_bool()).unwrap_or(false),
        }
    }

    /// The scalar field `name` as a display string.
    pub fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        let known = match name {
            "slug" => Some(self.slug.as_str()),
            "name" => Some(&*self.name),
            "phone" | "phone_local" => self.phone_local.as_deref(),
            "phone_tel" => self.phone_tel.as_deref(),
            "email" => self.email.as_deref(),
            "website" => self.website.as_deref(),
            "booking_url" => self.booking_url.as_deref(),
            "excerpt" => self.excerpt.as_deref(),
            "price_from" => self.price_from.as_deref(),
            "image" => self.image.as_deref(),
            _ => return match self.extra.get(name)? {
                serde_json::Value::String(s) => Some(Cow::Borrowed(s.as_str())),
                serde_json::Value::Number(n) => Some(Cow::Owned(n.to_string())),
                _ => None,
            },
        };

        known.filter(|s| !s.is_empty()).map(Cow::Borrowed)
    }

    /// The list field `name`. Non-string entries of extra lists are skipped.
    pub fn list(&self, name: &str) -> Cow<'_, [Arc<str>]> {
        let known = match name {
            "accreditations" => &self.accreditations,
            "area_served" => &self.area_served,
            "tags" => &self.tags,
            "services" => &self.services,
            "payment" => &self.payment,
            "notes" => &self.notes,
            _ => {
                let values = self.extra.get(name)
                    .and_then(|v| v.as_array())
                    .map(|array| array.iter()
                        .filter_map(|v| v.as_str())
                        .map(Arc::from)
                        .collect())
                    .unwrap_or_default();

                return Cow::Owned(values);
            }
        };

        Cow::Borrowed(known.as_slice())
    }

    /// A dialable number: `phone_tel`, or `phone_local` reduced to digits and
    /// a leading `+`.
    ///
    /// ```rust
    /// use saltaire::Listing;
    ///
    /// let mut listing = Listing::new("spark", "Spark");
    /// assert_eq!(listing.telephone(), None);
    ///
    /// listing.phone_local = Some("01274 123 456".into());
    /// assert_eq!(listing.telephone().as_deref(), Some("01274123456"));
    ///
    /// listing.phone_local = Some("+44 (0)1274 123456".into());
    /// assert_eq!(listing.telephone().as_deref(), Some("+4401274123456"));
    ///
    /// listing.phone_tel = Some("+441274123456".into());
    /// assert_eq!(listing.telephone().as_deref(), Some("+441274123456"));
    /// ```
    pub fn telephone(&self) -> Option<String> {
        if let Some(tel) = self.phone_tel.as_deref().filter(|t| !t.is_empty()) {
            return Some(tel.to_string());
        }

        dialable(self.phone_local.as_deref()?)
    }

    pub fn phone_display(&self) -> &str {
        self.phone_local.as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(NO_PHONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_extra_fields() {
        let listing: Listing = toml::from_str(r#"
            slug = "paws"
            name = "Paws About Town"
            featured = true
            dog_walking = true
            max_dogs = 4
            species = ["dogs", "cats", 7]
        "#).unwrap();

        assert!(listing.featured);
        assert!(listing.flag("dog_walking"));
        assert_eq!(listing.field("max_dogs").as_deref(), Some("4"));
        assert_eq!(&*listing.list("species"), &[Arc::from("dogs"), Arc::from("cats")]);
        assert!(listing.list("tags").is_empty());
    }

    #[test]
    fn missing_slug_derives_from_name() {
        let mut listing = Listing::new("", "Shipley & Saltaire Locks");
        assert_eq!(listing.ensure_slug().as_str(), "shipley-saltaire-locks");

        let mut listing = Listing::new("custom", "Anything");
        assert_eq!(listing.ensure_slug().as_str(), "custom");
    }

    #[test]
    fn empty_fields_are_absent() {
        let mut listing = Listing::new("a", "A");
        listing.email = Some("".into());
        assert_eq!(listing.field("email"), None);
        assert_eq!(listing.field("name").as_deref(), Some("A"));
        assert_eq!(listing.phone_display(), NO_PHONE);
    }
}
