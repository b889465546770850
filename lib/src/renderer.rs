use std::sync::Arc;

use rayon::prelude::*;

use crate::category::DirectoryCategory;
use crate::error::Result;
use crate::page::ContentPage;
use crate::site::{Asset, Site};

/// Renders categories and pages in parallel with assets. When both sides
/// fail, the errors are chained.
#[inline(always)]
pub fn render_site<R>(renderer: &R, site: &Site) -> Result<R::Output>
    where R: Renderer + ?Sized
{
    let (collected, process_result): (Result<R::Output>, _) = rayon::join(
        || site.categories.par_iter()
            .map(|category| renderer.render_category(site, category))
            .chain(site.pages.par_iter().map(|page| renderer.render_page(site, page)))
            .collect(),
        || site.assets.par_iter().try_for_each(|asset| renderer.render_asset(asset))
    );

    match (collected, process_result) {
        (Ok(v), Ok(_)) => Ok(v),
        (Ok(_), Err(e)) | (Err(e), Ok(_)) => Err(e),
        (Err(e1), Err(e2)) => Err(e1.chain(e2)),
    }
}

pub trait Renderer: Sync {
    type Output: FromParallelIterator<Self::Render> + Send;

    type Render: Send;

    #[inline(always)]
    fn render_site(&self, site: &Site) -> Result<Self::Output> {
        render_site(self, site)
    }

    fn render_category(&self, site: &Site, category: &Arc<DirectoryCategory>) -> Result<Self::Render>;

    fn render_page(&self, site: &Site, page: &Arc<ContentPage>) -> Result<Self::Render>;

    fn render_asset(&self, asset: &Asset) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::category::CategorySpec;
    use crate::site::SiteSettings;

    struct Urls;

    impl Renderer for Urls {
        type Output = Vec<String>;
        type Render = String;

        fn render_category(&self, site: &Site, category: &Arc<DirectoryCategory>) -> Result<String> {
            category.verify(&site.settings)?;
            Ok(category.url(&site.settings))
        }

        fn render_page(&self, site: &Site, page: &Arc<ContentPage>) -> Result<String> {
            Ok(page.url(&site.settings))
        }

        fn render_asset(&self, asset: &Asset) -> Result<()> {
            match asset.source.extension() {
                Some(ext) if ext == "bad" => err!("unreadable asset", "path" => asset.source.display()),
                _ => Ok(()),
            }
        }
    }

    fn site() -> Site {
        let mut site = Site::new(SiteSettings::new("Saltaire Guide", "https://saltaire.guide"));
        site.add_category(DirectoryCategory::new(CategorySpec::new("tutors", "Tutors", "Tutors")).unwrap());
        site.add_category(DirectoryCategory::new(CategorySpec::new("vets", "Vets", "Vets")).unwrap());
        let page = "+++\ntitle = \"Things to do\"\ndescription = \"Ideas\"\n+++\n";
        site.add_page(ContentPage::parse("things-to-do", page, None).unwrap());
        site.add_asset(Asset { source: "site.css".into(), permapath: "assets/site.css".into() });
        site
    }

    #[test]
    fn renders_every_category_and_page() {
        let mut urls = Urls.render_site(&site()).unwrap();
        urls.sort();
        assert_eq!(urls, [
            "https://saltaire.guide/things-to-do/",
            "https://saltaire.guide/tutors/",
            "https://saltaire.guide/vets/",
        ]);
    }

    #[test]
    fn asset_failures_are_reported() {
        let mut site = site();
        site.add_asset(Asset { source: PathBuf::from("logo.bad"), permapath: "logo.bad".into() });

        let error = Urls.render_site(&site).unwrap_err();
        assert_eq!(error.messages(), ["unreadable asset"]);
    }
}
