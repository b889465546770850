use saltaire::error::Result;
use saltaire::templating::minijinja::MiniJinjaEngine;
use saltaire::{time, Renderer};

use crate::discover::Guide;
use crate::render::SiteWriter;

mod config;
mod discover;
mod render;
mod util;

pub const CONTENT_DIR: &str = "content";
pub const CATEGORIES_DIR: &str = "categories";
pub const PAGES_DIR: &str = "pages";
pub const TEMPLATE_DIR: &str = "templates";
pub const ASSETS_DIR: &str = "assets";
pub const CONFIG_FILE: &str = "config.toml";

mod flags {
    use std::path::PathBuf;

    xflags::xflags! {
        /// Builds the Saltaire Guide from a site directory.
        cmd saltaire-guide {
            /// Log debug output.
            optional -v, --verbose

            /// Render the site in <input> to static HTML in <output>.
            cmd build {
                required input: PathBuf
                required output: PathBuf
                /// Do not check pages for consistency before writing them.
                optional --skip-verify
            }

            /// Load and verify the site in <input> without writing anything.
            cmd check {
                required input: PathBuf
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();
}

fn run(flags: flags::SaltaireGuide) -> Result<()> {
    match flags.subcommand {
        flags::SaltaireGuideCmd::Build(build) => {
            let (guide, site) = time!("discovery", {
                let guide = Guide::new::<MiniJinjaEngine, _>(&build.input)?;
                let site = guide.discover()?;
                (guide, site)
            });

            let writer = SiteWriter::new(&guide, build.output.clone(), !build.skip_verify);
            let written = time!("render", writer.render_site(&site)?);
            log::info!("wrote {} pages to {}", written.len(), build.output.display());
        }
        flags::SaltaireGuideCmd::Check(check) => {
            let guide = Guide::new::<MiniJinjaEngine, _>(&check.input)?;
            let site = guide.discover()?;
            time!("verification", guide.verify(&site)?);
            log::info!(
                "{} categories and {} pages are consistent",
                site.categories.len(), site.pages.len()
            );
        }
    }

    Ok(())
}

pub fn main() {
    let flags = flags::SaltaireGuide::from_env_or_exit();
    init_logging(flags.verbose);

    if let Err(e) = time!("build", run(flags)) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::*;

    const CONFIG: &str = r#"
        name = "Saltaire Guide"
        url = "https://saltaire.guide"
        email = "hello@saltaire.guide"
        stylesheet = "assets/site.css"
    "#;

    const LOCKSMITHS: &str = r#"
        title = "Locksmiths"
        description = "Locksmiths covering Saltaire and Shipley."
        entity_type = "Locksmith"
        updated = 2024-01-15

        [[columns]]
        header = "24/7"
        flag = "available_24h"

        [[listings]]
        name = "Aire Locks"
        featured = true
        available_24h = true
        phone_local = "01274 555 010"

        [[listings]]
        name = "Bolt & Bar"

        [[faqs]]
        q = "Can a locksmith open a uPVC door?"
        a = "Yes, most listed locksmiths can."
    "#;

    const VETS: &str = r#"{
        "title": "Vets",
        "description": "Vets near Saltaire.",
        "draft": true,
        "listings": []
    }"#;

    const ROBERTS_PARK: &str = "+++
title = \"Roberts Park\"
description = \"A Victorian park across the river.\"
updated = 2024-06-01
+++

# Roberts Park in {{ G.name }}

Cross the footbridge from Salts Mill.
";

    const WALKS_DRAFT: &str = "+++
title = \"Walks\"
slug = \"Canal Walks\"
draft = true
+++

{{ unfinished(
";

    fn write(root: &Path, path: &str, contents: &str) {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn site_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, CONFIG_FILE, CONFIG);
        write(root, "content/categories/locksmiths.toml", LOCKSMITHS);
        write(root, "content/categories/vets.json", VETS);
        write(root, "content/pages/roberts-park.md", ROBERTS_PARK);
        write(root, "content/pages/walks.md", WALKS_DRAFT);
        write(root, "assets/site.scss", "@import 'colours';\nbody { color: $ink; }\n");
        write(root, "assets/_colours.scss", "$ink: #222;\n");
        write(root, "assets/logo.svg", "<svg/>");
        dir
    }

    #[test]
    fn builds_a_site() {
        let input = site_dir();
        let output = tempfile::tempdir().unwrap();

        let guide = Guide::new::<MiniJinjaEngine, _>(input.path()).unwrap();
        let site = guide.discover().unwrap();
        assert_eq!(site.categories.len(), 1);
        assert_eq!(site.pages.len(), 1);

        let written = SiteWriter::new(&guide, output.path().to_path_buf(), true)
            .render_site(&site)
            .unwrap();

        assert_eq!(written.len(), 4);
        let out = output.path();
        let locksmiths = fs::read_to_string(out.join("locksmiths/index.html")).unwrap();
        assert!(locksmiths.contains(r#"id="aire-locks""#));
        assert!(locksmiths.contains(r#"id="bolt-bar""#));
        assert!(locksmiths.contains("https://saltaire.guide/locksmiths/#aire-locks"));
        assert!(locksmiths.contains("Can a locksmith open a uPVC door?"));
        assert!(locksmiths.contains("hello@saltaire.guide"));

        let park = fs::read_to_string(out.join("roberts-park/index.html")).unwrap();
        assert!(park.contains("Roberts Park in Saltaire Guide"));
        assert!(park.contains("1 June 2024"));

        let index = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(index.contains("Locksmiths"));
        assert!(index.contains("(2)"));
        assert!(!out.join("vets").exists());

        let sitemap = fs::read_to_string(out.join("sitemap.xml")).unwrap();
        assert!(sitemap.contains("<lastmod>2024-06-01</lastmod>"));
        assert!(sitemap.contains("<lastmod>2024-01-15</lastmod>"));
        assert!(!sitemap.contains("walks"));
        assert!(locksmiths.contains("15 January 2024"));

        let css = fs::read_to_string(out.join("assets/site.css")).unwrap();
        assert!(css.contains("#222"));
        assert!(!out.join("assets/_colours.css").exists());
        assert!(out.join("assets/logo.svg").exists());
    }

    #[test]
    fn duplicate_listing_slugs_fail_discovery() {
        let input = site_dir();
        let clash = "title = \"Tutors\"\ndescription = \"Tutors\"\n\
            [[listings]]\nname = \"Maths Help\"\n[[listings]]\nname = \"maths help\"\n";
        write(input.path(), "content/categories/tutors.toml", clash);

        let guide = Guide::new::<MiniJinjaEngine, _>(input.path()).unwrap();
        let error = guide.discover().unwrap_err();
        let messages = error.messages();
        assert_eq!(messages[0], "failed to load category");
        assert!(messages.iter().any(|m| m == "two listings share the same slug"));
    }

    #[test]
    fn missing_content_is_an_error() {
        let input = tempfile::tempdir().unwrap();
        write(input.path(), CONFIG_FILE, CONFIG);
        assert!(Guide::new::<MiniJinjaEngine, _>(input.path()).is_err());
    }

    #[test]
    fn check_verifies_everything() {
        let input = site_dir();
        let guide = Guide::new::<MiniJinjaEngine, _>(input.path()).unwrap();
        let site = guide.discover().unwrap();
        guide.verify(&site).unwrap();
    }
}
