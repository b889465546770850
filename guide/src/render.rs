use std::path::{Path, PathBuf};
use std::sync::Arc;

use saltaire::error::{Chainable, Result};
use saltaire::io::{Grass, Mapper, Sink, Source};
use saltaire::templating::EngineExt;
use saltaire::{error, render_site, Asset, ContentPage, DirectoryCategory, Renderer, Site};

use crate::discover::Guide;

/// Writes a discovered site to `output`.
#[derive(Debug)]
pub struct SiteWriter<'a> {
    guide: &'a Guide,
    output: PathBuf,
    verify: bool,
}

impl<'a> SiteWriter<'a> {
    pub fn new(guide: &'a Guide, output: PathBuf, verify: bool) -> Self {
        SiteWriter { guide, output, verify }
    }

    fn write<P: AsRef<Path>>(&self, permapath: P, contents: String) -> Result<PathBuf> {
        let path = self.output.join(permapath);
        path.as_path().write(contents)?;
        Ok(path)
    }
}

impl Renderer for SiteWriter<'_> {
    type Output = Vec<PathBuf>;
    type Render = PathBuf;

    fn render_site(&self, site: &Site) -> Result<Self::Output> {
        let mut written = render_site(self, site)?;
        let engine = &self.guide.config.engine;

        let index = engine.render_view("index.html", &site.index_view())
            .chain_with(|| error!("failed to render home page", "template used" => "index.html"))?;
        written.push(self.write("index.html", index)?);

        let sitemap = engine.render_view("sitemap.xml", &site.sitemap_view())
            .chain_with(|| error!("failed to render sitemap", "template used" => "sitemap.xml"))?;
        written.push(self.write("sitemap.xml", sitemap)?);

        Ok(written)
    }

    fn render_category(&self, site: &Site, category: &Arc<DirectoryCategory>) -> Result<PathBuf> {
        if self.verify {
            category.verify(&site.settings)?;
        }

        let template = category.template();
        let html = self.guide.config.engine
            .render_view(template, &category.view(&site.settings))
            .chain_with(|| error! {
                "failed to render category",
                "category" => category.slug(),
                "template used" => template,
            })?;

        self.write(Path::new(category.slug()).join("index.html"), html)
    }

    fn render_page(&self, site: &Site, page: &Arc<ContentPage>) -> Result<PathBuf> {
        if self.verify {
            page.verify(&site.settings)?;
        }

        let template = page.template();
        let html = self.guide.config.engine
            .render_view(template, &page.view(&site.settings))
            .chain_with(|| error! {
                "failed to render page",
                "page" => page.slug(),
                "template used" => template,
            })?;

        self.write(Path::new(page.slug()).join("index.html"), html)
    }

    fn render_asset(&self, asset: &Asset) -> Result<()> {
        let output = self.output.join(&asset.permapath);
        let source = asset.source.as_path();
        let partial = source.file_name()
            .and_then(|name| name.to_str())
            .map_or(false, |name| name.starts_with('_'));

        match source.extension().and_then(|ext| ext.to_str()) {
            Some("scss") | Some("sass") if partial => Ok(()),
            Some("scss") | Some("sass") => {
                Grass::default().map_copy(source, output.with_extension("css"))
            },
            _ => source.read_to(output.as_path()).chain_with(|| error! {
                "failed to copy asset",
                "source path" => source.display(),
                "destination path" => output.display(),
            })
        }
    }
}
