use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// A step-by-step guide, such as a walking itinerary or "how to book".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HowTo {
    pub name: Arc<str>,
    #[serde(default)]
    pub description: Option<Arc<str>>,
    /// An ISO 8601 duration, e.g. `PT3H`.
    #[serde(default)]
    pub total_time: Option<Arc<str>>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub name: Arc<str>,
    pub text: Arc<str>,
    #[serde(default)]
    pub url: Option<Arc<str>>,
}

impl HowTo {
    pub fn structured_data(&self) -> Value {
        let steps: Vec<Value> = self.steps.iter()
            .enumerate()
            .map(|(i, step)| {
                let mut node = json!({
                    "@type": "HowToStep",
                    "position": i + 1,
                    "name": &*step.name,
                    "text": &*step.text,
                });

                if let Some(url) = &step.url {
                    node["url"] = (&**url).into();
                }

                node
            })
            .collect();

        let mut map = Map::new();
        map.insert("@type".into(), "HowTo".into());
        map.insert("name".into(), (&*self.name).into());
        if let Some(description) = &self.description {
            map.insert("description".into(), (&**description).into());
        }

        if let Some(total_time) = &self.total_time {
            map.insert("totalTime".into(), (&**total_time).into());
        }

        map.insert("step".into(), steps.into());
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_are_numbered() {
        let guide: HowTo = toml::from_str(r#"
            name = "A morning in Saltaire"
            total_time = "PT3H"

            [[steps]]
            name = "Salts Mill"
            text = "Start at the Hockney gallery."

            [[steps]]
            name = "Roberts Park"
            text = "Cross the river."
            url = "https://saltaire.guide/roberts-park/"
        "#).unwrap();

        let node = guide.structured_data();
        assert_eq!(node["@type"], "HowTo");
        assert_eq!(node["totalTime"], "PT3H");
        assert!(node.get("description").is_none());
        assert_eq!(node["step"][0]["position"], 1);
        assert_eq!(node["step"][1]["position"], 2);
        assert_eq!(node["step"][1]["url"], "https://saltaire.guide/roberts-park/");
        assert!(node["step"][0].get("url").is_none());
    }
}
