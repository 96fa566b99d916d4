//! The serialized document handed to a renderer

use crate::Result;
use crate::annotation::Annotations;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// A text annotation as the renderer sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNode {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Referenced ids without repeats
    pub references: Vec<String>,
    pub connected_to: Vec<String>,
}

/// A code annotation as the renderer sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeNode {
    pub id: String,
    pub title: String,
    pub content: String,
    pub file: String,
    pub line: usize,
    pub connected_to: Vec<String>,
}

/// The finished document.
///
/// Transforms add top-level fields next to the two annotation lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub text_annotations: Vec<TextNode>,
    pub code_annotations: Vec<CodeNode>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Document {
    /// Serialize annotations with their connectivity sets
    pub fn from_annotations(
        annotations: &Annotations,
        connected: &BTreeMap<&str, BTreeSet<&str>>,
    ) -> Self {
        let connected_to = |id: &str| -> Vec<String> {
            connected
                .get(id)
                .map(|ids| ids.iter().map(|s| s.to_string()).collect())
                .unwrap_or_else(|| vec![id.to_string()])
        };

        let text_annotations = annotations
            .text_annotations
            .iter()
            .map(|a| TextNode {
                id: a.id.clone(),
                title: a.title.clone(),
                content: a.content.clone(),
                references: a.unique_references().into_iter().map(String::from).collect(),
                connected_to: connected_to(&a.id),
            })
            .collect();

        let code_annotations = annotations
            .code_annotations
            .iter()
            .map(|a| CodeNode {
                id: a.id.clone(),
                title: a.title.clone(),
                content: a.content.clone(),
                file: a.file.clone(),
                line: a.line,
                connected_to: connected_to(&a.id),
            })
            .collect();

        Self {
            text_annotations,
            code_annotations,
            fields: Map::new(),
        }
    }

    /// Set a top-level field, replacing any earlier value
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.fields.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
