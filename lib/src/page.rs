use std::borrow::Cow;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use toml::value::Datetime;

use crate::error::{Chainable, Result};
use crate::faq::{self, Faq};
use crate::howto::HowTo;
use crate::io::{Format, Toml};
use crate::jsonld::{self, JsonLd};
use crate::listing::Slug;
use crate::markdown::{self, split_front_matter, Rendered, TocEntry};
use crate::site::{Breadcrumb, SiteSettings};
use crate::templating::Engine;
use crate::util::{is_slug, is_template, slugify};
use crate::view::PageView;

pub const DEFAULT_TEMPLATE: &str = "page.html";

/// The `+++` front matter of a content page.
#[derive(Debug, Clone, Deserialize)]
pub struct PageMeta {
    pub title: Arc<str>,
    pub description: Arc<str>,
    #[serde(default)]
    pub slug: Option<Slug>,
    #[serde(default)]
    pub template: Option<Arc<str>>,
    /// A TOML date, e.g. `updated = 2024-03-01`.
    #[serde(default)]
    pub updated: Option<Datetime>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub faqs: Vec<Faq>,
    #[serde(default)]
    pub guide: Option<HowTo>,
}

/// A free-form markdown page: visitor information, itineraries, legal text.
#[derive(Debug, Clone)]
pub struct ContentPage {
    pub meta: PageMeta,
    slug: Slug,
    html: String,
    toc: Vec<TocEntry>,
}

impl ContentPage {
    /// Parses a page from its file stem and source. When `engine` is given and
    /// the body contains template syntax, the body is rendered as a template
    /// before it is rendered as markdown.
    pub fn parse(stem: &str, source: &str, engine: Option<&dyn Engine>) -> Result<Self> {
        let context = || error!("failed to parse content page", "page" => stem);
        let (front_matter, body) = split_front_matter(source);
        let front_matter = front_matter
            .ok_or_else(|| error!("missing `+++` front matter"))
            .chain_with(context)?;

        let meta: PageMeta = Toml::from_str(front_matter).chain_with(context)?;
        let slug = match &meta.slug {
            Some(slug) => slug.clone(),
            None => Slug::new(slugify(stem)),
        };

        if !is_slug(&slug) {
            return Err(error! {
                "page slug is not a valid URL segment",
                "slug" => slug,
                "suggestion" => slugify(&slug),
            }).chain_with(context);
        }

        let body = match engine {
            Some(engine) if is_template(body) => {
                let page = json!({
                    "page": {
                        "title": &*meta.title,
                        "description": &*meta.description,
                        "slug": slug.as_str(),
                    }
                });

                Cow::Owned(engine.render_str(Some(stem), body, &page).chain_with(context)?)
            }
            _ => Cow::Borrowed(body),
        };

        let Rendered { html, toc } = markdown::render(&body);
        Ok(ContentPage { meta, slug, html, toc })
    }

    /// Whether the front matter of `source` sets `draft = true`. Only that key
    /// is read, so a draft is recognized even when the rest of the page would
    /// fail to parse.
    pub fn is_draft(source: &str) -> bool {
        #[derive(Deserialize)]
        struct Draft {
            #[serde(default)]
            draft: bool,
        }

        split_front_matter(source).0
            .and_then(|front_matter| Toml::from_str::<Draft>(front_matter).ok())
            .is_some_and(|meta| meta.draft)
    }

    pub fn slug(&self) -> &str {
        self.slug.as_str()
    }

    pub fn url(&self, site: &SiteSettings) -> String {
        site.page_url(self.slug())
    }

    pub fn template(&self) -> &str {
        self.meta.template.as_deref().unwrap_or(DEFAULT_TEMPLATE)
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn toc(&self) -> &[TocEntry] {
        &self.toc
    }

    /// The `updated` date as `YYYY-MM-DD`, if the page has one.
    pub fn updated(&self) -> Option<String> {
        let updated = self.meta.updated.as_ref()?;
        updated.date.map(|date| date.to_string())
    }

    pub fn breadcrumbs(&self, site: &SiteSettings) -> Vec<Breadcrumb> {
        vec![
            site.home_crumb(),
            Breadcrumb { name: self.meta.title.clone(), url: self.url(site).into() },
        ]
    }

    pub fn structured_data(&self, site: &SiteSettings) -> JsonLd {
        let url = self.url(site);
        let mut web_page = jsonld::web_page(&self.meta.title, &self.meta.description, &url, &site.name, &site.home_url());
        if let Some(updated) = self.updated() {
            web_page["dateModified"] = updated.into();
        }

        let mut ld = JsonLd::new();
        ld.push(web_page).push(jsonld::breadcrumb_list(&self.breadcrumbs(site)));
        if !self.meta.faqs.is_empty() {
            ld.push(faq::faq_page(&self.meta.faqs));
        }

        if let Some(guide) = &self.meta.guide {
            ld.push(guide.structured_data());
        }

        ld
    }

    pub fn view<'a>(&'a self, site: &'a SiteSettings) -> PageView<'a> {
        let structured_data = self.structured_data(site);
        PageView {
            site,
            slug: self.slug(),
            title: &self.meta.title,
            description: &self.meta.description,
            url: self.url(site),
            updated: self.updated(),
            breadcrumbs: self.breadcrumbs(site),
            content: &self.html,
            toc: &self.toc,
            faqs: &self.meta.faqs,
            guide: self.meta.guide.as_ref(),
            jsonld: structured_data.to_scripts(),
            structured_data,
        }
    }

    /// Checks that the page's FAQPage mirrors its visible FAQ.
    pub fn verify(&self, site: &SiteSettings) -> Result<()> {
        let view = self.view(site);
        let context = || error!("content page failed verification", "page" => self.slug());
        match view.structured_data.find("FAQPage") {
            Some(node) => faq::verify_mirror(view.faqs, node).chain_with(context),
            None if view.faqs.is_empty() => Ok(()),
            None => Err(error!("visible FAQ has no FAQPage structured data")).chain_with(context),
        }
    }
}
