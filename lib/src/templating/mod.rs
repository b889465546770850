pub mod minijinja;
mod builtin;

pub use builtin::{builtin, BUILTIN_NAMES};

use std::fmt::Debug;
use std::path::Path;

use serde::Serialize;

use crate::error::{Chainable, Result};

pub trait EngineInit {
    type Engine: Engine + 'static;

    /// Builds an engine that loads templates from `templates` first, falling
    /// back to the built-in templates, with `globals` exposed as `G`.
    fn init<G: Serialize>(templates: Option<&Path>, globals: G) -> Self::Engine;
}

pub trait Engine: Send + Sync + Debug {
    fn render(&self, name: &str, context: &serde_json::Value) -> Result<String>;

    fn render_str(
        &self,
        name: Option<&str>,
        template_str: &str,
        context: &serde_json::Value,
    ) -> Result<String>;
}

pub trait EngineExt: Engine {
    /// Serializes `view` and renders the template `name` with it.
    fn render_view<V: Serialize>(&self, name: &str, view: &V) -> Result<String> {
        let context = serde_json::to_value(view)
            .chain_with(|| error!("failed to serialize template context", "template" => name))?;

        self.render(name, &context)
    }
}

impl<E: Engine + ?Sized> EngineExt for E { }
