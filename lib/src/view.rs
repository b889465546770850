//! Serializable template contexts.
//!
//! Each page kind renders from exactly one view, and every view is built from
//! the same data its structured data is: the cards, the table, the FAQ
//! accordion and the JSON-LD all come from one source.

use std::sync::Arc;

use serde::Serialize;

use crate::faq::Faq;
use crate::howto::HowTo;
use crate::jsonld::JsonLd;
use crate::listing::{Listing, Slug};
use crate::markdown::TocEntry;
use crate::site::{Breadcrumb, SiteSettings};
use crate::table::ComparisonTable;

/// Keys a [`Card`] adds next to its listing's own fields. A listing's extra
/// data must not use them.
pub const CARD_FIELDS: &[&str] = &["anchor", "position", "badges", "phone", "telephone"];

/// A listing as shown on its category page.
#[derive(Debug, Clone, Serialize)]
pub struct Card<'a> {
    /// The element id of the card; `#anchor` links to it.
    pub anchor: &'a Slug,
    /// 1-based index of the listing in its category.
    pub position: usize,
    pub badges: Vec<&'a str>,
    /// The phone number, or a "no phone" notice.
    pub phone: &'a str,
    /// A `tel:`-ready number, when the listing has a phone at all.
    pub telephone: Option<String>,
    #[serde(flatten)]
    pub listing: &'a Listing,
}

impl<'a> Card<'a> {
    pub fn new(listing: &'a Listing, position: usize, badges: Vec<&'a str>) -> Self {
        Card {
            anchor: &listing.slug,
            position,
            badges,
            phone: listing.phone_display(),
            telephone: listing.telephone(),
            listing,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryView<'a> {
    pub site: &'a SiteSettings,
    pub slug: &'a str,
    pub title: &'a str,
    pub heading: &'a str,
    pub description: &'a str,
    /// The intro, rendered to HTML.
    pub intro: Option<&'a str>,
    pub url: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub featured: Vec<Card<'a>>,
    pub others: Vec<Card<'a>>,
    pub table: ComparisonTable,
    pub faqs: &'a [Faq],
    pub guide: Option<&'a HowTo>,
    pub updated: Option<String>,
    pub structured_data: JsonLd,
    /// `structured_data` as `<script>` elements.
    pub jsonld: String,
}

#[derive(Debug, Serialize)]
pub struct PageView<'a> {
    pub site: &'a SiteSettings,
    pub slug: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub url: String,
    pub updated: Option<String>,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub content: &'a str,
    pub toc: &'a [TocEntry],
    pub faqs: &'a [Faq],
    pub guide: Option<&'a HowTo>,
    pub structured_data: JsonLd,
    pub jsonld: String,
}

/// A link to a category or page from the home page.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub title: Arc<str>,
    pub description: Arc<str>,
    pub url: String,
    /// Number of listings; zero for content pages.
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct IndexView<'a> {
    pub site: &'a SiteSettings,
    pub url: String,
    pub categories: Vec<Summary>,
    pub pages: Vec<Summary>,
    pub structured_data: JsonLd,
    pub jsonld: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SitemapView {
    pub urls: Vec<SitemapEntry>,
}
