use crate::listing::Listing;

/// Listings split by placement, each half in input order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Partition<'a> {
    pub featured: Vec<&'a Listing>,
    pub others: Vec<&'a Listing>,
}

/// Stable split of `listings` into featured and non-featured entries.
///
/// ```rust
/// use saltaire::{partition, Listing};
///
/// let mut a = Listing::new("a", "A");
/// a.featured = true;
/// let b = Listing::new("b", "B");
/// let mut c = Listing::new("c", "C");
/// c.featured = true;
///
/// let listings = [a, b, c];
/// let split = partition(&listings);
/// let slugs = |v: &[&Listing]| v.iter().map(|l| l.slug.to_string()).collect::<Vec<_>>();
/// assert_eq!(slugs(&split.featured), ["a", "c"]);
/// assert_eq!(slugs(&split.others), ["b"]);
/// ```
pub fn partition(listings: &[Listing]) -> Partition<'_> {
    let (featured, others) = listings.iter().partition(|l| l.featured);
    Partition { featured, others }
}

impl Partition<'_> {
    pub fn len(&self) -> usize {
        self.featured.len() + self.others.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Featured listings followed by the rest: the order cards are shown in.
    pub fn iter(&self) -> impl Iterator<Item = &Listing> + '_ {
        self.featured.iter().chain(self.others.iter()).copied()
    }
}
