use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Layer categories shown in the details view, in display order.
pub const LAYER_ORDER: [&str; 3] = ["physical", "psychological", "spiritual"];

/// One record of the knowledge graph, as read from the dataset.
///
/// Only `id`, `children` and `relations.corresponds_to` matter to the engine;
/// everything else is carried through for presentation.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Node {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
    #[serde(default, skip_serializing_if = "Relations::is_empty")]
    pub relations: Relations,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glyph: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codepoint: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub layers: BTreeMap<String, String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Relations {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub corresponds_to: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Relations {
    pub fn is_empty(&self) -> bool {
        self.corresponds_to.is_empty() && self.extra.is_empty()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.is_empty())
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_correspondences<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relations.corresponds_to = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Display text: `label` wins over `name`; empty strings count as absent.
    pub fn display_label(&self) -> Option<&str> {
        non_empty(&self.label).or_else(|| non_empty(&self.name))
    }

    /// Like [`Node::display_label`] but never empty, falling back to the id.
    pub fn title(&self) -> &str {
        self.display_label().unwrap_or(self.id.as_str())
    }

    /// Title prefixed with the glyph when one is present.
    pub fn heading(&self) -> String {
        match non_empty(&self.glyph) {
            Some(glyph) => format!("{glyph} {}", self.title()),
            None => self.title().to_owned(),
        }
    }

    /// Known layers in display order, skipping empty or missing ones.
    pub fn ordered_layers(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        LAYER_ORDER.iter().filter_map(|category| {
            self.layers
                .get(*category)
                .map(String::as_str)
                .filter(|text| !text.is_empty())
                .map(|text| (*category, text))
        })
    }
}
