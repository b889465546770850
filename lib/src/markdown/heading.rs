use std::collections::VecDeque;

use pulldown_cmark::{CowStr, Event, Tag, TagEnd};
use rustc_hash::FxHashMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub title: String,
    pub level: usize,
    pub id: String,
}

/// Gives every heading an id and records it in the table of contents.
pub struct AutoHeading<'a, 't, I: Iterator<Item = Event<'a>>> {
    stack: VecDeque<Event<'a>>,
    seen: FxHashMap<String, usize>,
    toc: &'t mut Vec<TocEntry>,
    inner: I,
}

impl<'a, 't, I: Iterator<Item = Event<'a>>> AutoHeading<'a, 't, I> {
    pub fn new(inner: I, toc: &'t mut Vec<TocEntry>) -> Self {
        AutoHeading { stack: VecDeque::with_capacity(4), seen: FxHashMap::default(), toc, inner }
    }

    fn unique(&mut self, id: String) -> String {
        let count = self.seen.entry(id.clone()).or_insert(0);
        *count += 1;
        match *count {
            1 => id,
            n => format!("{id}-{}", n - 1),
        }
    }
}

impl<'a, I: Iterator<Item = Event<'a>>> Iterator for AutoHeading<'a, '_, I> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(event) = self.stack.pop_front() {
            return Some(event);
        }

        match self.inner.next()? {
            Event::Start(Tag::Heading { level, id, classes, attrs }) => {
                let mut title = String::new();
                loop {
                    let event = self.inner.next()?;
                    if let Event::Text(ref s) | Event::Code(ref s) = event {
                        title.push_str(s);
                    } else if let Event::End(TagEnd::Heading(..)) = event {
                        break;
                    }

                    self.stack.push_back(event);
                }

                let id = match id {
                    Some(id) => id.to_string(),
                    None => match crate::util::slugify(&title) {
                        slug if slug.is_empty() => format!("section-{}", self.toc.len() + 1),
                        slug => slug,
                    },
                };

                let id = self.unique(id);

                let title = title.trim().to_string();
                self.toc.push(TocEntry { title, level: level as usize, id: id.clone() });
                self.stack.push_back(Event::End(TagEnd::Heading(level)));
                let tag = Tag::Heading { level, id: Some(CowStr::from(id)), classes, attrs };
                Some(Event::Start(tag))
            },
            event => Some(event)
        }
    }
}

/// Emits a self-link right after every heading that has an id.
pub struct HeadingAnchor<'a, I: Iterator<Item = Event<'a>>> {
    pending: Option<CowStr<'a>>,
    inner: I,
}

impl<'a, I: Iterator<Item = Event<'a>>> HeadingAnchor<'a, I> {
    pub fn new(inner: I) -> Self {
        HeadingAnchor { pending: None, inner }
    }
}

impl<'a, I: Iterator<Item = Event<'a>>> Iterator for HeadingAnchor<'a, I> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(id) = self.pending.take() {
            let html = format!(r##"<a class="anchor" title="anchor" href="#{id}"></a>"##);
            return Some(Event::Html(html.into()));
        }

        let event = self.inner.next()?;
        if let Event::Start(Tag::Heading { id: Some(ref id), .. }) = event {
            self.pending = Some(id.clone());
        }

        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use crate::markdown::render;

    #[test]
    fn explicit_ids_are_kept() {
        let rendered = render("## Getting here {#travel}\n\nBy train.\n");
        assert_eq!(rendered.toc[0].id, "travel");
        assert_eq!(rendered.toc[0].title, "Getting here");
        assert_eq!(rendered.toc[0].level, 2);
        assert!(rendered.html.starts_with(r#"<h2 id="travel">"#));
    }

    #[test]
    fn inline_code_counts_toward_title() {
        let rendered = render("### The `1853` mill\n");
        assert_eq!(rendered.toc[0].title, "The 1853 mill");
        assert_eq!(rendered.toc[0].id, "the-1853-mill");
        assert!(rendered.html.contains("<code>1853</code>"));
    }

    #[test]
    fn unsluggable_headings_get_positional_ids() {
        let rendered = render("# Visiting\n## ?!\n");
        assert_eq!(rendered.toc[1].id, "section-2");
        assert!(rendered.html.contains(r##"href="#section-2""##));
        assert!(!rendered.html.contains(r##"href="#""##));
    }

    #[test]
    fn repeated_headings_are_numbered() {
        let rendered = render("# A\n# A\n# A\n");
        let ids: Vec<&str> = rendered.toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["a", "a-1", "a-2"]);
    }
}
