use std::path::Path;
use std::sync::Arc;

use saltaire::error;
use saltaire::error::{Chainable, Result};
use saltaire::io::{Format, Toml};
use saltaire::templating::{Engine, EngineInit};
use saltaire::SiteSettings;

use crate::util::dircheck;

#[derive(Debug)]
pub struct Config {
    pub engine: Arc<dyn Engine>,
    pub settings: SiteSettings,
}

impl Config {
    pub fn discover<E: EngineInit>(input: &Path) -> Result<Self> {
        let settings: SiteSettings = Toml::read(&input.join(crate::CONFIG_FILE))
            .chain_with(|| error! {
                "failed to load site configuration",
                "hint" => format!("{} must set at least `name` and `url`", crate::CONFIG_FILE),
            })?;

        let templates = dircheck(input, crate::TEMPLATE_DIR, false)?;
        let engine: Arc<dyn Engine> = Arc::new(E::init(templates.as_deref(), &settings));
        log::debug!("templates: {}", templates.as_deref().map_or("built-in".into(), |p| p.display().to_string()));
        Ok(Config { engine, settings })
    }
}
