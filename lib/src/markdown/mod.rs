//! Markdown for content pages and category intros.

mod front_matter;
mod heading;

pub use front_matter::split_front_matter;
pub use heading::TocEntry;

use pulldown_cmark::{html, Options, Parser};

use heading::{AutoHeading, HeadingAnchor};

/// HTML and table of contents of a markdown document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rendered {
    pub html: String,
    pub toc: Vec<TocEntry>,
}

pub fn options() -> Options {
    Options::all().difference(Options::ENABLE_SMART_PUNCTUATION)
}

/// Renders `input` to HTML. Headings get a unique slugified id unless they
/// set one with `{#id}`, an anchor link, and an entry in the table of
/// contents.
///
/// ```rust
/// let rendered = saltaire::markdown::render("# Opening times\n\nDaily.\n\n## Opening times\n");
/// assert_eq!(rendered.toc.len(), 2);
/// assert_eq!(rendered.toc[0].id, "opening-times");
/// assert_eq!(rendered.toc[1].id, "opening-times-1");
/// assert!(rendered.html.contains(r##"<a class="anchor" title="anchor" href="#opening-times"></a>"##));
/// ```
pub fn render(input: &str) -> Rendered {
    let mut toc = vec![];
    let parser = Parser::new_ext(input, options());
    let events = HeadingAnchor::new(AutoHeading::new(parser, &mut toc));

    let mut html = String::with_capacity(input.len() * 3 / 2);
    html::push_html(&mut html, events);
    Rendered { html, toc }
}
