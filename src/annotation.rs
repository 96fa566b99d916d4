//! Annotation types - the shared data model
//!
//! Two kinds of annotation feed one graph:
//! - `TextAnnotation`: a `.an` file, the only kind that carries references
//! - `CodeAnnotation`: a marked comment plus the declaration right below it
//!
//! Every annotation is a node; every entry of `TextAnnotation::references`
//! is a directed edge to the node with that id.

use serde::{Deserialize, Serialize};

/// Character that introduces an id, both in references and in code comments.
pub const REFERENCE_MARKER: char = '$';

/// Check whether a character may appear in an annotation id (`[A-Za-z-]`).
pub fn is_id_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '-'
}

/// Check whether a whole string is a well-formed id (`[A-Za-z-]+`).
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(is_id_char)
}

/// A text annotation parsed from a standalone file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextAnnotation {
    /// File stem of the source file
    pub id: String,
    /// First non-blank line with the leading marker stripped
    pub title: String,
    /// Remaining body, leading line breaks removed
    pub content: String,
    /// Referenced ids in order of appearance, repeats preserved
    pub references: Vec<String>,
}

impl TextAnnotation {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        references: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            references,
        }
    }

    /// References with repeats removed, first occurrence wins
    pub fn unique_references(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.references
            .iter()
            .map(String::as_str)
            .filter(|r| seen.insert(*r))
            .collect()
    }
}

/// A code annotation and its position in the scanned sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeAnnotation {
    pub id: String,
    pub title: String,
    /// Exact source text of the annotated declaration
    pub content: String,
    /// Path relative to the scan root, `/`-separated
    pub file: String,
    /// Zero-based line of the comment
    pub line: usize,
}

impl CodeAnnotation {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        file: impl Into<String>,
        line: usize,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            file: file.into(),
            line,
        }
    }
}

/// The combined annotation set of one run.
///
/// Built once by the collector, observed by the checks, copied by the
/// preprocessor when a transform needs to rewrite content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    pub text_annotations: Vec<TextAnnotation>,
    pub code_annotations: Vec<CodeAnnotation>,
}

impl Annotations {
    pub fn new(text_annotations: Vec<TextAnnotation>, code_annotations: Vec<CodeAnnotation>) -> Self {
        Self {
            text_annotations,
            code_annotations,
        }
    }

    /// All ids, text annotations first
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.text_annotations
            .iter()
            .map(|a| a.id.as_str())
            .chain(self.code_annotations.iter().map(|a| a.id.as_str()))
    }

    /// Every reference edge as `(from, to)`
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.text_annotations
            .iter()
            .flat_map(|a| a.references.iter().map(move |r| (a.id.as_str(), r.as_str())))
    }

    pub fn len(&self) -> usize {
        self.text_annotations.len() + self.code_annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
