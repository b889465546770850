use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::Result;

/// A question and its answer, shown as an accordion entry and mirrored into
/// `FAQPage` structured data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub q: Arc<str>,
    pub a: Arc<str>,
}

impl Faq {
    pub fn new<Q: Into<Arc<str>>, A: Into<Arc<str>>>(q: Q, a: A) -> Self {
        Faq { q: q.into(), a: a.into() }
    }
}

/// A `FAQPage` node with one `Question` per entry, in order.
pub fn faq_page(faqs: &[Faq]) -> Value {
    let questions: Vec<Value> = faqs.iter()
        .map(|faq| json!({
            "@type": "Question",
            "name": &*faq.q,
            "acceptedAnswer": {
                "@type": "Answer",
                "text": &*faq.a,
            },
        }))
        .collect();

    json!({
        "@type": "FAQPage",
        "mainEntity": questions,
    })
}

/// Checks that `node` mirrors `faqs` exactly: same number of questions, each
/// question and answer identical and in the same order.
pub fn verify_mirror(faqs: &[Faq], node: &Value) -> Result<()> {
    let questions = node["mainEntity"].as_array().map_or(&[][..], |v| v.as_slice());
    if questions.len() != faqs.len() {
        return err! {
            "FAQ structured data has a different number of questions than the page",
            "visible" => faqs.len(),
            "structured" => questions.len(),
        };
    }

    for (i, (faq, question)) in faqs.iter().zip(questions).enumerate() {
        let q = question["name"].as_str();
        let a = question["acceptedAnswer"]["text"].as_str();
        if q != Some(&*faq.q) || a != Some(&*faq.a) {
            return err! {
                "FAQ structured data has drifted from the visible FAQ",
                "position" => i + 1,
                "visible question" => faq.q,
                "structured question" => q.unwrap_or("<missing>"),
            };
        }
    }

    Ok(())
}
