//! schema.org structured data, emitted as JSON-LD.
//!
//! Nodes are plain [`serde_json::Value`]s built from the same data the visible
//! page is rendered from. A page collects its nodes in a [`JsonLd`], which
//! renders each node as its own `<script type="application/ld+json">` block.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::listing::{Listing, Slug};
use crate::site::Breadcrumb;

pub const CONTEXT: &str = "https://schema.org";

/// The structured data of one page, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct JsonLd {
    nodes: Vec<Value>,
}

impl JsonLd {
    pub fn new() -> Self {
        JsonLd::default()
    }

    pub fn push(&mut self, node: Value) -> &mut Self {
        self.nodes.push(node);
        self
    }

    pub fn nodes(&self) -> &[Value] {
        &self.nodes
    }

    /// The first node whose `@type` is `kind`.
    pub fn find(&self, kind: &str) -> Option<&Value> {
        self.nodes.iter().find(|node| node["@type"] == kind)
    }

    /// Every node as a `<script>` block, separated by newlines.
    pub fn to_scripts(&self) -> String {
        self.nodes.iter()
            .map(script)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Renders `node` with a leading `@context` inside a JSON-LD script element.
///
/// ```rust
/// use saltaire::jsonld::script;
///
/// let node = serde_json::json!({ "@type": "Thing", "name": "</script>&" });
/// assert_eq!(script(&node), concat!(
///     r#"<script type="application/ld+json">"#,
///     r#"{"@context":"https://schema.org","@type":"Thing","name":"\u003c/script\u003e\u0026"}"#,
///     "</script>"
/// ));
/// ```
pub fn script(node: &Value) -> String {
    let mut with_context = Map::new();
    with_context.insert("@context".into(), CONTEXT.into());
    if let Value::Object(fields) = node {
        with_context.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    let json = Value::Object(with_context).to_string();
    format!(r#"<script type="application/ld+json">{}</script>"#, escape_script(&json))
}

/// Escapes the characters that could end a script element or open a comment.
/// JSON never contains them outside of strings, where `\uXXXX` is valid.
fn escape_script(json: &str) -> String {
    let bytes = json.as_bytes();
    let mut output = String::with_capacity(json.len());
    let mut start = 0;
    while let Some(i) = memchr::memchr3(b'<', b'>', b'&', &bytes[start..]) {
        let i = start + i;
        output.push_str(&json[start..i]);
        output.push_str(match bytes[i] {
            b'<' => "\\u003c",
            b'>' => "\\u003e",
            _ => "\\u0026",
        });

        start = i + 1;
    }

    output.push_str(&json[start..]);
    output
}

/// The canonical URL of a listing's card on the page at `page_url`.
pub fn anchor_url(page_url: &str, slug: &Slug) -> String {
    format!("{page_url}{}", slug.fragment())
}

fn insert<V: Into<Value>>(map: &mut Map<String, Value>, key: &str, value: Option<V>) {
    if let Some(value) = value {
        map.insert(key.into(), value.into());
    }
}

fn non_empty(list: &[std::sync::Arc<str>]) -> Option<Vec<Value>> {
    (!list.is_empty()).then(|| list.iter().map(|s| Value::from(&**s)).collect())
}

pub fn web_page(name: &str, description: &str, url: &str, site_name: &str, site_url: &str) -> Value {
    json!({
        "@type": "WebPage",
        "name": name,
        "description": description,
        "url": url,
        "isPartOf": {
            "@type": "WebSite",
            "name": site_name,
            "url": site_url,
        },
    })
}

pub fn breadcrumb_list(crumbs: &[Breadcrumb]) -> Value {
    let elements: Vec<Value> = crumbs.iter()
        .enumerate()
        .map(|(i, crumb)| json!({
            "@type": "ListItem",
            "position": i + 1,
            "name": &*crumb.name,
            "item": &*crumb.url,
        }))
        .collect();

    json!({
        "@type": "BreadcrumbList",
        "itemListElement": elements,
    })
}

/// The typed entity (`Electrician`, `Locksmith`, `LocalBusiness`, ...) for
/// `listing`. Absent optional fields are omitted.
pub fn entity(listing: &Listing, entity_type: &str, page_url: &str) -> Value {
    let anchor = anchor_url(page_url, &listing.slug);
    let mut map = Map::new();
    map.insert("@type".into(), entity_type.into());
    map.insert("@id".into(), anchor.clone().into());
    map.insert("name".into(), (&*listing.name).into());
    map.insert("url".into(), listing.field("website").map_or(anchor, |w| w.into_owned()).into());
    insert(&mut map, "description", listing.field("excerpt"));
    insert(&mut map, "telephone", listing.telephone());
    insert(&mut map, "email", listing.field("email"));
    insert(&mut map, "image", listing.field("image"));
    insert(&mut map, "priceRange", listing.field("price_from"));
    insert(&mut map, "areaServed", non_empty(&listing.area_served));
    insert(&mut map, "knowsAbout", non_empty(&listing.services));
    insert(&mut map, "hasCredential", non_empty(&listing.accreditations));
    insert(&mut map, "paymentAccepted", (!listing.payment.is_empty()).then(|| listing.payment.join(", ")));
    if listing.available_24h {
        map.insert("openingHours".into(), "Mo-Su 00:00-23:59".into());
    }

    if let Some(booking) = listing.field("booking_url") {
        map.insert("potentialAction".into(), json!({
            "@type": "ReserveAction",
            "target": &*booking,
        }));
    }

    Value::Object(map)
}

/// An `ItemList` of every listing, in input order. `position` is the 1-based
/// input index, `url` the card's anchor; featured listings embed their typed
/// entity as `item`.
pub fn item_list(name: &str, listings: &[Listing], page_url: &str, entity_type: &str) -> Value {
    let elements: Vec<Value> = listings.iter()
        .enumerate()
        .map(|(i, listing)| {
            let mut element = json!({
                "@type": "ListItem",
                "position": i + 1,
                "name": &*listing.name,
                "url": anchor_url(page_url, &listing.slug),
            });

            if listing.featured {
                element["item"] = entity(listing, entity_type, page_url);
            }

            element
        })
        .collect();

    json!({
        "@type": "ItemList",
        "name": name,
        "numberOfItems": listings.len(),
        "itemListElement": elements,
    })
}

/// Checks that the `ItemList` URLs end, in order, with `#<anchor>` for each
/// of `anchors`: the visible cards and the structured data agree.
pub fn verify_anchors<'a, I>(anchors: I, item_list: &Value) -> Result<()>
    where I: IntoIterator<Item = &'a Slug>
{
    let anchors: Vec<&Slug> = anchors.into_iter().collect();
    let urls: Vec<&str> = item_list["itemListElement"].as_array()
        .map(|elements| elements.iter().filter_map(|e| e["url"].as_str()).collect())
        .unwrap_or_default();

    if anchors.len() != urls.len() {
        return err! {
            "structured data lists a different number of items than the page",
            "anchors" => anchors.len(),
            "item list urls" => urls.len(),
        };
    }

    for (i, (anchor, url)) in anchors.iter().zip(&urls).enumerate() {
        if !url.ends_with(&anchor.fragment()) {
            return err! {
                "structured data URL does not match the card anchor",
                "position" => i + 1,
                "anchor" => anchor.fragment(),
                "url" => url,
            };
        }

        if item_list["itemListElement"][i]["position"] != i + 1 {
            return err! {
                "structured data position does not match the listing order",
                "expected" => i + 1,
                "found" => &item_list["itemListElement"][i]["position"],
            };
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://saltaire.guide/locksmiths/";

    fn listings() -> Vec<Listing> {
        let mut a = Listing::new("a", "Alpha");
        a.featured = true;
        a.website = Some("https://alpha.example".into());
        a.phone_local = Some("01274 111111".into());
        let b = Listing::new("b", "Bravo");
        let mut c = Listing::new("c", "Charlie");
        c.featured = true;
        c.booking_url = Some("https://book.example/c".into());
        vec![a, b, c]
    }

    #[test]
    fn item_list_positions_follow_input() {
        let listings = listings();
        let list = item_list("Locksmiths", &listings, PAGE, "Locksmith");

        assert_eq!(list["numberOfItems"], 3);
        let elements = list["itemListElement"].as_array().unwrap();
        for (i, (element, slug)) in elements.iter().zip(["a", "b", "c"]).enumerate() {
            assert_eq!(element["position"], i + 1);
            assert_eq!(element["url"], format!("{PAGE}#{slug}"));
        }

        assert_eq!(elements[0]["item"]["@type"], "Locksmith");
        assert_eq!(elements[0]["item"]["url"], "https://alpha.example");
        assert_eq!(elements[0]["item"]["telephone"], "01274111111");
        assert!(elements[1].get("item").is_none());
        assert_eq!(elements[2]["item"]["url"], format!("{PAGE}#c"));
        assert_eq!(elements[2]["item"]["potentialAction"]["target"], "https://book.example/c");
    }

    #[test]
    fn entity_omits_absent_fields() {
        let entity = entity(&Listing::new("b", "Bravo"), "LocalBusiness", PAGE);
        let keys: Vec<&str> = entity.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["@type", "@id", "name", "url"]);
    }

    #[test]
    fn anchors_must_match_urls() {
        let listings = listings();
        let list = item_list("Locksmiths", &listings, PAGE, "Locksmith");
        verify_anchors(listings.iter().map(|l| &l.slug), &list).unwrap();

        let swapped = [Slug::from("b"), Slug::from("a"), Slug::from("c")];
        let error = verify_anchors(&swapped, &list).unwrap_err();
        assert_eq!(error.messages(), ["structured data URL does not match the card anchor"]);

        let short = [Slug::from("a")];
        assert!(verify_anchors(&short, &list).is_err());
    }

    #[test]
    fn scripts_are_emitted_in_order() {
        let mut ld = JsonLd::new();
        ld.push(json!({ "@type": "WebPage" })).push(json!({ "@type": "ItemList" }));

        let scripts = ld.to_scripts();
        assert_eq!(scripts.matches("<script").count(), 2);
        assert!(scripts.find("WebPage").unwrap() < scripts.find("ItemList").unwrap());
        assert!(ld.find("ItemList").is_some());
        assert!(ld.find("FAQPage").is_none());
    }
}
