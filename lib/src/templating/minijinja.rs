use std::path::Path;

use minijinja::{Environment, path_loader};
use minijinja::value::Value;
use serde::Serialize;

use crate::error::Result;
use crate::templating::{builtin, Engine, EngineInit};

#[derive(Debug)]
pub struct MiniJinjaEngine {
    env: Result<Environment<'static>>,
}

fn try_init<G: Serialize>(templates: Option<&Path>, globals: G) -> Result<Environment<'static>> {
    let globals = serde_json::to_value(&globals)?;
    let base_url = globals.get("url")
        .and_then(|url| url.as_str())
        .unwrap_or("/")
        .to_string();

    let mut env = Environment::new();
    let user_loader = templates.map(|dir| path_loader(dir.to_path_buf()));
    env.set_loader(move |name: &str| {
        if let Some(loader) = &user_loader {
            if let Some(source) = loader(name)? {
                return Ok(Some(source));
            }
        }

        Ok(builtin(name).map(String::from))
    });

    env.add_global("G", Value::from_serializable(&globals));
    env.add_function("year", ext::year);
    env.add_function("link", move |path: String| {
        Value::from_safe_string(ext::link(&base_url, &path))
    });
    env.add_filter("deslug", ext::deslug);
    env.add_filter("date", ext::date);
    env.add_filter("tel", ext::tel);
    Ok(env)
}

impl EngineInit for MiniJinjaEngine {
    type Engine = Self;

    fn init<G: Serialize>(templates: Option<&Path>, globals: G) -> Self::Engine {
        MiniJinjaEngine { env: try_init(templates, globals) }
    }
}

impl Engine for MiniJinjaEngine {
    fn render(&self, name: &str, context: &serde_json::Value) -> Result<String> {
        let env = self.env.as_ref().map_err(|e| e.clone())?;
        let template = env.get_template(name)?;
        Ok(template.render(context)?)
    }

    fn render_str(
        &self,
        name: Option<&str>,
        template_str: &str,
        context: &serde_json::Value,
    ) -> Result<String> {
        let env = self.env.as_ref().map_err(|e| e.clone())?;
        let string = match name {
            Some(name) => env.render_named_str(name, template_str, context)?,
            None => env.render_str(template_str, context)?,
        };

        Ok(string)
    }
}

mod ext {
    use std::fmt::Write;
    use std::time::SystemTime;

    use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
    use minijinja::{Error, ErrorKind};

    use crate::listing::dialable;
    use crate::util::join_url;

    const DEFAULT_DATE_FORMAT: &str = "%-d %B %Y";

    pub fn year() -> i32 {
        DateTime::<Utc>::from(SystemTime::now()).year()
    }

    /// `link('assets/site.css')`: a path relative to the site's base URL.
    pub fn link(base: &str, path: &str) -> String {
        join_url(base, path)
    }

    /// `"pet-sitters"|deslug` → `"Pet sitters"`.
    pub fn deslug(value: &str) -> String {
        let spaced = value.replace('-', " ");
        let mut chars = spaced.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => spaced,
        }
    }

    pub fn date(value: String, fmt: Option<String>) -> Result<String, Error> {
        let fmt = fmt.as_deref().unwrap_or(DEFAULT_DATE_FORMAT);
        let mut out = String::new();
        let written = if let Ok(date) = value.parse::<NaiveDate>() {
            write!(out, "{}", date.format(fmt))
        } else if let Ok(datetime) = value.parse::<NaiveDateTime>() {
            write!(out, "{}", datetime.format(fmt))
        } else if let Ok(datetime) = DateTime::parse_from_rfc3339(&value) {
            write!(out, "{}", datetime.format(fmt))
        } else {
            return Err(Error::new(
                ErrorKind::InvalidOperation,
                format!("`date` expects a date or datetime, found {value:?}")
            ));
        };

        written.map_err(|_| Error::new(
            ErrorKind::InvalidOperation,
            format!("invalid date format {fmt:?}")
        ))?;

        Ok(out)
    }

    pub fn tel(value: &str) -> String {
        dialable(value).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;

    use super::*;
    use crate::category::{CategorySpec, DirectoryCategory};
    use crate::listing::Listing;
    use crate::site::SiteSettings;
    use crate::templating::EngineExt;

    fn settings() -> SiteSettings {
        let mut settings = SiteSettings::new("Saltaire Guide", "https://saltaire.guide");
        settings.globals.insert("stylesheet".into(), "assets/site.css".into());
        settings
    }

    #[test]
    fn renders_builtin_category_template() {
        let settings = settings();
        let engine = MiniJinjaEngine::init(None, &settings);

        let mut spec = CategorySpec::new("locksmiths", "Locksmiths", "Locksmiths near Saltaire.");
        let mut a = Listing::new("a", "Aire Locks");
        a.featured = true;
        a.phone_local = Some("01274 111 222".into());
        spec.listings = vec![a, Listing::new("b", "Bolt & Bar")];

        let category = DirectoryCategory::new(spec).unwrap();
        let html = engine.render_view(category.template(), &category.view(&settings)).unwrap();

        assert!(html.contains(r#"id="a""#));
        assert!(html.contains(r#"id="b""#));
        assert!(html.contains(r#"href="tel:01274111222""#));
        assert!(html.contains("No phone listed"));
        assert!(html.contains("application/ld+json"));
        assert!(html.contains("https://saltaire.guide/assets/site.css"));
        assert!(html.find(r#"id="a""#) < html.find(r#"id="b""#));
    }

    #[test]
    fn user_templates_take_priority() {
        let dir = std::env::temp_dir().join(format!("saltaire-templates-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("page.html"), "custom {{ title }}").unwrap();

        let engine = MiniJinjaEngine::init(Some(dir.as_path()), settings());
        let context = json!({ "title": "Hello" });
        assert_eq!(engine.render("page.html", &context).unwrap(), "custom Hello");
        assert!(engine.render("sitemap.xml", &json!({ "urls": [] })).unwrap().contains("<urlset"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn filters_and_functions() {
        let engine = MiniJinjaEngine::init(None, settings());
        let render = |src: &str| engine.render_str(None, src, &json!({})).unwrap();

        assert_eq!(render("{{ 'pet-sitters'|deslug }}"), "Pet sitters");
        assert_eq!(render("{{ '2024-03-01'|date }}"), "1 March 2024");
        assert_eq!(render("{{ '2024-03-01'|date('%Y') }}"), "2024");
        assert_eq!(render("{{ '01274 (0) 123'|tel }}"), "012740123");
        assert_eq!(render("{{ link('faq/') }}"), "https://saltaire.guide/faq/");
        assert_eq!(render("{{ G.name }}"), "Saltaire Guide");
        assert!(render("{{ year() }}").parse::<i32>().unwrap() >= 2024);
        assert!(engine.render_str(None, "{{ 'soon'|date }}", &json!({})).is_err());
    }
}
