use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer};
use toml::value::Datetime;

use crate::badge::BadgeSpec;
use crate::error::{Chainable, Result};
use crate::faq::{self, Faq};
use crate::howto::HowTo;
use crate::jsonld::{self, JsonLd};
use crate::listing::{Listing, Slug};
use crate::markdown;
use crate::partition::{partition, Partition};
use crate::site::{Breadcrumb, SiteSettings};
use crate::table::{Column, ComparisonTable};
use crate::util::{is_slug, slugify};
use crate::view::{Card, CategoryView, CARD_FIELDS};

pub const DEFAULT_ENTITY_TYPE: &str = "LocalBusiness";
pub const DEFAULT_TEMPLATE: &str = "category.html";

/// The declarative description of one directory category, as written in a
/// category data file.
#[derive(Debug, Clone, Deserialize)]
pub struct CategorySpec {
    #[serde(default)]
    pub slug: Slug,
    pub title: Arc<str>,
    pub description: Arc<str>,
    /// The page's `<h1>`; the title when absent.
    #[serde(default)]
    pub heading: Option<Arc<str>>,
    /// Markdown shown above the listings.
    #[serde(default)]
    pub intro: Option<Arc<str>>,
    /// The schema.org type of each listing: `Electrician`, `Locksmith`, ...
    #[serde(default = "default_entity_type")]
    pub entity_type: Arc<str>,
    #[serde(default)]
    pub badges: Option<BadgeSpec>,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub listings: Vec<Listing>,
    #[serde(default)]
    pub faqs: Vec<Faq>,
    #[serde(default)]
    pub guide: Option<HowTo>,
    #[serde(default)]
    pub template: Option<Arc<str>>,
    /// `updated = 2024-03-01` in TOML, `"updated": "2024-03-01"` in JSON.
    #[serde(default, deserialize_with = "deserialize_updated")]
    pub updated: Option<Datetime>,
    #[serde(default)]
    pub draft: bool,
}

fn default_entity_type() -> Arc<str> {
    DEFAULT_ENTITY_TYPE.into()
}

fn deserialize_updated<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Datetime>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Updated {
        Native(Datetime),
        Text(String),
    }

    match Option::<Updated>::deserialize(de)? {
        Some(Updated::Native(datetime)) => Ok(Some(datetime)),
        Some(Updated::Text(text)) => text.parse().map(Some).map_err(<D::Error as serde::de::Error>::custom),
        None => Ok(None),
    }
}

impl CategorySpec {
    pub fn new<T: Into<Arc<str>>, D: Into<Arc<str>>>(slug: &str, title: T, description: D) -> Self {
        CategorySpec {
            slug: slug.into(),
            title: title.into(),
            description: description.into(),
            heading: None,
            intro: None,
            entity_type: default_entity_type(),
            badges: None,
            columns: vec![],
            listings: vec![],
            faqs: vec![],
            guide: None,
            template: None,
            updated: None,
            draft: false,
        }
    }
}

/// A validated category, ready to be projected into cards, a comparison
/// table and structured data.
#[derive(Debug, Clone)]
pub struct DirectoryCategory {
    pub spec: CategorySpec,
    intro_html: Option<String>,
}

impl DirectoryCategory {
    /// Fills in missing slugs, renders the intro and validates the listings.
    pub fn new(mut spec: CategorySpec) -> Result<Self> {
        if spec.slug.is_empty() {
            spec.slug = Slug::new(slugify(&spec.title));
        }

        if !is_slug(&spec.slug) {
            return err! {
                "category slug is not a valid URL segment",
                "category" => spec.title,
                "slug" => spec.slug,
                "suggestion" => slugify(&spec.slug),
            };
        }

        for listing in &mut spec.listings {
            listing.ensure_slug();
        }

        validate_listings(&spec.listings).chain_with(|| error! {
            "invalid category listings",
            "category" => spec.slug,
        })?;

        let intro_html = spec.intro.as_deref().map(|intro| markdown::render(intro).html);
        Ok(DirectoryCategory { spec, intro_html })
    }

    pub fn slug(&self) -> &str {
        self.spec.slug.as_str()
    }

    pub fn url(&self, site: &SiteSettings) -> String {
        site.page_url(self.slug())
    }

    pub fn template(&self) -> &str {
        self.spec.template.as_deref().unwrap_or(DEFAULT_TEMPLATE)
    }

    pub fn listings(&self) -> &[Listing] {
        &self.spec.listings
    }

    pub fn intro_html(&self) -> Option<&str> {
        self.intro_html.as_deref()
    }

    pub fn partition(&self) -> Partition<'_> {
        partition(&self.spec.listings)
    }

    pub fn badge_spec(&self) -> &BadgeSpec {
        self.spec.badges.as_ref().unwrap_or_else(|| BadgeSpec::common())
    }

    pub fn badges<'s>(&'s self, listing: &Listing) -> Vec<&'s str> {
        self.badge_spec().badges(listing)
    }

    pub fn table(&self) -> ComparisonTable {
        ComparisonTable::project(&self.spec.listings, &self.spec.columns)
    }

    /// The `updated` date as `YYYY-MM-DD`, if the category has one.
    pub fn updated(&self) -> Option<String> {
        let updated = self.spec.updated.as_ref()?;
        updated.date.map(|date| date.to_string())
    }

    pub fn breadcrumbs(&self, site: &SiteSettings) -> Vec<Breadcrumb> {
        vec![
            site.home_crumb(),
            Breadcrumb { name: self.spec.title.clone(), url: self.url(site).into() },
        ]
    }

    /// WebPage, BreadcrumbList and ItemList, then FAQPage and HowTo when the
    /// category has them.
    pub fn structured_data(&self, site: &SiteSettings) -> JsonLd {
        let url = self.url(site);
        let mut web_page = jsonld::web_page(&self.spec.title, &self.spec.description, &url, &site.name, &site.home_url());
        if let Some(updated) = self.updated() {
            web_page["dateModified"] = updated.into();
        }

        let mut ld = JsonLd::new();
        ld.push(web_page)
            .push(jsonld::breadcrumb_list(&self.breadcrumbs(site)))
            .push(jsonld::item_list(&self.spec.title, &self.spec.listings, &url, &self.spec.entity_type));

        if !self.spec.faqs.is_empty() {
            ld.push(faq::faq_page(&self.spec.faqs));
        }

        if let Some(guide) = &self.spec.guide {
            ld.push(guide.structured_data());
        }

        ld
    }

    /// The template context for this category's page.
    pub fn view<'a>(&'a self, site: &'a SiteSettings) -> CategoryView<'a> {
        let positions: FxHashMap<&Slug, usize> = self.spec.listings.iter()
            .enumerate()
            .map(|(i, listing)| (&listing.slug, i + 1))
            .collect();

        let card = |listing: &'a Listing| Card::new(listing, positions[&listing.slug], self.badges(listing));
        let Partition { featured, others } = self.partition();
        let structured_data = self.structured_data(site);

        CategoryView {
            site,
            slug: self.slug(),
            title: &self.spec.title,
            heading: self.spec.heading.as_deref().unwrap_or(&self.spec.title),
            description: &self.spec.description,
            intro: self.intro_html(),
            url: self.url(site),
            breadcrumbs: self.breadcrumbs(site),
            featured: featured.into_iter().map(card).collect(),
            others: others.into_iter().map(card).collect(),
            table: self.table(),
            faqs: &self.spec.faqs,
            guide: self.spec.guide.as_ref(),
            updated: self.updated(),
            jsonld: structured_data.to_scripts(),
            structured_data,
        }
    }

    /// Checks the page this category renders to: every card anchor matches
    /// its ItemList URL, the table has a row per listing in order, and the
    /// FAQPage mirrors the visible FAQ.
    pub fn verify(&self, site: &SiteSettings) -> Result<()> {
        let view = self.view(site);
        let context = || error!("category page failed verification", "category" => self.slug());

        let mut cards: Vec<&Card<'_>> = view.featured.iter().chain(&view.others).collect();
        cards.sort_by_key(|card| card.position);
        let item_list = view.structured_data.find("ItemList")
            .ok_or_else(|| error!("missing ItemList structured data"))
            .chain_with(context)?;

        jsonld::verify_anchors(cards.iter().map(|card| card.anchor), item_list)
            .chain_with(context)?;

        let row_keys = view.table.rows.iter().map(|row| &row.slug);
        if !row_keys.eq(self.spec.listings.iter().map(|l| &l.slug)) {
            return Err(error!("comparison table rows do not follow the listings")).chain_with(context);
        }

        match view.structured_data.find("FAQPage") {
            Some(node) => faq::verify_mirror(view.faqs, node).chain_with(context),
            None if view.faqs.is_empty() => Ok(()),
            None => Err(error!("visible FAQ has no FAQPage structured data")).chain_with(context),
        }
    }
}

/// Listing slugs must be present, anchor-safe and unique within a category.
/// Extra data may not shadow the fields a card adds.
fn validate_listings(listings: &[Listing]) -> Result<()> {
    let mut seen: FxHashMap<&Slug, &Listing> = FxHashMap::default();
    for listing in listings {
        if listing.slug.is_empty() {
            return err! {
                "listing has no slug and no name to derive one from",
                "listing" => format!("{listing:?}"),
            };
        }

        if !is_slug(&listing.slug) {
            return err! {
                "listing slug is not a valid anchor id",
                "listing" => listing.name,
                "slug" => listing.slug,
                "suggestion" => slugify(&listing.slug),
            };
        }

        if let Some(key) = CARD_FIELDS.iter().find(|key| listing.extra.contains_key(**key)) {
            return err! {
                "listing data uses a reserved card field",
                "listing" => listing.name,
                "field" => key,
            };
        }

        if let Some(first) = seen.insert(&listing.slug, listing) {
            return err! {
                "two listings share the same slug",
                "slug" => listing.slug,
                "first listing" => first.name,
                "second listing" => listing.name,
            };
        }
    }

    Ok(())
}
