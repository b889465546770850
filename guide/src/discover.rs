use std::path::{Path, PathBuf};

use saltaire::rayon::prelude::*;
use saltaire::error::{Chainable, Result};
use saltaire::io::{DataFormat, Source};
use saltaire::listing::Slug;
use saltaire::templating::EngineInit;
use saltaire::util::slugify;
use saltaire::{error, Asset, CategorySpec, ContentPage, DirectoryCategory, Site};

use crate::{ASSETS_DIR, CATEGORIES_DIR, CONTENT_DIR, PAGES_DIR};
use crate::config::Config;
use crate::util::{dircheck, file_stem, files};

#[derive(Debug)]
pub struct Guide {
    pub input: PathBuf,
    pub config: Config,
    pub category_root: Option<PathBuf>,
    pub page_root: Option<PathBuf>,
    pub asset_root: Option<PathBuf>,
}

impl Guide {
    pub fn new<E: EngineInit, I: AsRef<Path>>(input: I) -> Result<Self> {
        let input = input.as_ref();
        let content_root = dircheck(input, CONTENT_DIR, true)?
            .ok_or_else(|| error!("missing content directory", "input" => input.display()))?;

        Ok(Guide {
            category_root: dircheck(&content_root, CATEGORIES_DIR, false)?,
            page_root: dircheck(&content_root, PAGES_DIR, false)?,
            asset_root: dircheck(input, ASSETS_DIR, false)?,
            config: Config::discover::<E>(input)?,
            input: input.to_path_buf(),
        })
    }

    /// Loads every category, page and asset into a validated site. Drafts are
    /// left out.
    pub fn discover(&self) -> Result<Site> {
        let mut site = Site::new(self.config.settings.clone());
        self.discover_categories(&mut site)?;
        self.discover_pages(&mut site)?;
        self.discover_assets(&mut site);

        site.sort();
        site.validate()?;
        log::info!(
            "discovered {} categories, {} pages and {} assets",
            site.categories.len(), site.pages.len(), site.assets.len()
        );

        Ok(site)
    }

    /// Checks every category and page for consistency between what is shown
    /// and what is emitted as structured data.
    pub fn verify(&self, site: &Site) -> Result<()> {
        let settings = &*site.settings;
        site.categories.par_iter().try_for_each(|category| category.verify(settings))?;
        site.pages.par_iter().try_for_each(|page| page.verify(settings))
    }

    fn discover_categories(&self, site: &mut Site) -> Result<()> {
        let Some(root) = &self.category_root else {
            log::warn!("no {CONTENT_DIR}/{CATEGORIES_DIR} directory; the site has no categories");
            return Ok(());
        };

        for path in files(root) {
            let Some(format) = DataFormat::from_path(&path) else {
                log::warn!("skipping {}: categories must be TOML or JSON", path.display());
                continue;
            };

            let mut spec: CategorySpec = format.read(&path)?;
            if spec.draft {
                log::info!("skipping draft category {}", path.display());
                continue;
            }

            if spec.slug.is_empty() {
                spec.slug = Slug::new(slugify(file_stem(&path)));
            }

            let category = DirectoryCategory::new(spec)
                .chain_with(|| error!("failed to load category", "path" => path.display()))?;

            log::debug!("category {} with {} listings", category.slug(), category.listings().len());
            site.add_category(category);
        }

        Ok(())
    }

    fn discover_pages(&self, site: &mut Site) -> Result<()> {
        const KNOWN_EXTS: &[&str] = &["md", "mdown", "markdown"];

        let Some(root) = &self.page_root else {
            return Ok(());
        };

        let engine = &*self.config.engine;
        for path in files(root) {
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
            if !KNOWN_EXTS.contains(&ext) {
                log::warn!("skipping {}: pages must be markdown", path.display());
                continue;
            }

            let source = path.as_path().read_text()?;
            if ContentPage::is_draft(&source) {
                log::info!("skipping draft page {}", path.display());
                continue;
            }

            let page = ContentPage::parse(file_stem(&path), &source, Some(engine))
                .chain_with(|| error!("failed to load page", "path" => path.display()))?;

            site.add_page(page);
        }

        Ok(())
    }

    fn discover_assets(&self, site: &mut Site) {
        let Some(root) = &self.asset_root else {
            return;
        };

        for path in files(root) {
            if let Ok(relative) = path.strip_prefix(root) {
                let permapath = Path::new(ASSETS_DIR).join(relative);
                site.add_asset(Asset { source: path.clone(), permapath });
            }
        }
    }
}
