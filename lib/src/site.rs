use std::path::PathBuf;
use std::sync::Arc;

use derive_more::Debug;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use serde_json::json;

use crate::category::DirectoryCategory;
use crate::error::Result;
use crate::jsonld::JsonLd;
use crate::page::ContentPage;
use crate::util::join_url;
use crate::view::{IndexView, SitemapEntry, SitemapView, Summary};

/// Site-wide configuration, read from `config.toml`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteSettings {
    pub name: Arc<str>,
    /// Absolute base URL, e.g. `https://saltaire.guide`.
    pub url: Arc<str>,
    #[serde(default)]
    pub email: Option<Arc<str>>,
    #[serde(default = "SiteSettings::default_language")]
    pub language: Arc<str>,
    #[serde(default)]
    pub tagline: Option<Arc<str>>,
    /// Anything else in the file, exposed to templates.
    #[serde(flatten)]
    pub globals: FxHashMap<String, serde_json::Value>,
}

impl SiteSettings {
    pub fn new<N: Into<Arc<str>>, U: Into<Arc<str>>>(name: N, url: U) -> Self {
        SiteSettings {
            name: name.into(),
            url: url.into(),
            email: None,
            language: Self::default_language(),
            tagline: None,
            globals: FxHashMap::default(),
        }
    }

    fn default_language() -> Arc<str> {
        "en-GB".into()
    }

    pub fn home_url(&self) -> String {
        join_url(&self.url, "")
    }

    /// The canonical URL of the page living at `/<slug>/`.
    pub fn page_url(&self, slug: &str) -> String {
        join_url(&self.url, &format!("{slug}/"))
    }

    pub fn home_crumb(&self) -> Breadcrumb {
        Breadcrumb { name: "Home".into(), url: self.home_url().into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub name: Arc<str>,
    pub url: Arc<str>,
}

/// A file copied (or compiled) into the output as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub source: PathBuf,
    /// Output path relative to the output root.
    pub permapath: PathBuf,
}

#[derive(Debug)]
pub struct Site {
    pub settings: Arc<SiteSettings>,
    pub categories: Vec<Arc<DirectoryCategory>>,
    pub pages: Vec<Arc<ContentPage>>,
    #[debug(ignore)]
    pub assets: Vec<Asset>,
}

impl Site {
    pub fn new(settings: SiteSettings) -> Site {
        Site {
            settings: Arc::new(settings),
            categories: vec![],
            pages: vec![],
            assets: vec![],
        }
    }

    pub fn add_category(&mut self, category: DirectoryCategory) -> &Arc<DirectoryCategory> {
        self.categories.push(Arc::new(category));
        &self.categories[self.categories.len() - 1]
    }

    pub fn add_page(&mut self, page: ContentPage) -> &Arc<ContentPage> {
        self.pages.push(Arc::new(page));
        &self.pages[self.pages.len() - 1]
    }

    pub fn add_asset(&mut self, asset: Asset) {
        self.assets.push(asset);
    }

    /// Sorts categories and pages by title so listings of them are stable.
    pub fn sort(&mut self) {
        self.categories.sort_by(|a, b| a.spec.title.cmp(&b.spec.title));
        self.pages.sort_by(|a, b| a.meta.title.cmp(&b.meta.title));
    }

    /// Every page on the site must live at a distinct `/<slug>/`.
    pub fn validate(&self) -> Result<()> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let slugs = self.categories.iter().map(|c| c.slug())
            .chain(self.pages.iter().map(|p| p.slug()));

        for slug in slugs {
            if !seen.insert(slug) {
                return err! {
                    "two pages share the same URL",
                    "slug" => slug,
                    "url" => self.settings.page_url(slug),
                };
            }
        }

        Ok(())
    }

    /// The home page context: a summary of every category and page.
    pub fn index_view(&self) -> IndexView<'_> {
        let settings = &*self.settings;
        let categories = self.categories.iter()
            .map(|c| Summary {
                title: c.spec.title.clone(),
                description: c.spec.description.clone(),
                url: c.url(settings),
                count: c.listings().len(),
            })
            .collect();

        let pages = self.pages.iter()
            .map(|p| Summary {
                title: p.meta.title.clone(),
                description: p.meta.description.clone(),
                url: p.url(settings),
                count: 0,
            })
            .collect();

        let mut web_site = json!({
            "@type": "WebSite",
            "name": &*settings.name,
            "url": settings.home_url(),
            "inLanguage": &*settings.language,
        });

        if let Some(tagline) = &settings.tagline {
            web_site["description"] = (&**tagline).into();
        }

        let mut structured_data = JsonLd::new();
        structured_data.push(web_site);
        IndexView {
            site: settings,
            url: settings.home_url(),
            categories,
            pages,
            jsonld: structured_data.to_scripts(),
            structured_data,
        }
    }

    /// Every rendered URL: the home page, then categories, then pages.
    pub fn sitemap_view(&self) -> SitemapView {
        let settings = &*self.settings;
        let home = SitemapEntry { loc: settings.home_url(), lastmod: None };
        let categories = self.categories.iter()
            .map(|c| SitemapEntry { loc: c.url(settings), lastmod: c.updated() });

        let pages = self.pages.iter()
            .map(|p| SitemapEntry { loc: p.url(settings), lastmod: p.updated() });

        SitemapView { urls: std::iter::once(home).chain(categories).chain(pages).collect() }
    }
}
