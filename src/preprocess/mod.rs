//! Graph preprocessor
//!
//! Turns a validated [`Annotations`] aggregate into the [`Document`] a
//! renderer consumes. A preprocessor is an ordered chain of transforms:
//! each may rewrite the annotations before serialization and then add or
//! replace fields on the finished document. Transforms run in the order they
//! were added, so when two set the same field the later one wins.

pub mod connectivity;
pub mod document;

pub use connectivity::connectivity;
pub use document::{CodeNode, Document, TextNode};

use crate::{Error, Result};
use crate::annotation::Annotations;
use crate::graph::AnnotationGraph;
use std::fmt;
use std::str::FromStr;

/// Document field holding the layout direction
pub const DIRECTION_FIELD: &str = "dir";
/// Document field holding the lineup strategy
pub const LINEUP_FIELD: &str = "lineup";
/// Replaces the elided middle of truncated code content
pub const ELISION: &str = "...";

/// Layout direction of the rendered graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    UpDown,
    DownUp,
    LeftRight,
    RightLeft,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::UpDown => "UD",
            Direction::DownUp => "DU",
            Direction::LeftRight => "LR",
            Direction::RightLeft => "RL",
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "UD" => Ok(Direction::UpDown),
            "DU" => Ok(Direction::DownUp),
            "LR" => Ok(Direction::LeftRight),
            "RL" => Ok(Direction::RightLeft),
            _ => Err(Error::Config(format!(
                "Unknown direction `{}` (expected UD, DU, LR or RL)",
                s
            ))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the renderer orders nodes within a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lineup {
    #[default]
    HubSize,
    Directed,
}

impl Lineup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lineup::HubSize => "hubsize",
            Lineup::Directed => "directed",
        }
    }
}

impl FromStr for Lineup {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "hubsize" => Ok(Lineup::HubSize),
            "directed" => Ok(Lineup::Directed),
            _ => Err(Error::Config(format!(
                "Unknown lineup `{}` (expected hubsize or directed)",
                s
            ))),
        }
    }
}

impl fmt::Display for Lineup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of the preprocessing chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    /// Set the `dir` field
    Direction(Direction),
    /// Set the `lineup` field
    Lineup(Lineup),
    /// Keep only the first and last line of long code annotations
    TruncateCode,
}

impl Transform {
    fn rewrite(&self, annotations: &mut Annotations) {
        if let Transform::TruncateCode = self {
            for annotation in &mut annotations.code_annotations {
                if let Some(short) = truncate(&annotation.content) {
                    annotation.content = short;
                }
            }
        }
    }

    fn decorate(&self, document: &mut Document) {
        match self {
            Transform::Direction(direction) => document.set(DIRECTION_FIELD, direction.as_str()),
            Transform::Lineup(lineup) => document.set(LINEUP_FIELD, lineup.as_str()),
            Transform::TruncateCode => {}
        }
    }
}

/// `first line`, elision, `last line` for content longer than two lines
fn truncate(content: &str) -> Option<String> {
    let lines: Vec<&str> = content.lines().collect();
    match lines.as_slice() {
        [first, _, .., last] => Some(format!("{}\n{}\n{}", first, ELISION, last)),
        _ => None,
    }
}

/// Collects transforms in order
#[derive(Debug, Clone, Default)]
pub struct PreprocessorBuilder {
    transforms: Vec<Transform>,
}

impl PreprocessorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_direction(mut self, direction: Direction) -> Self {
        self.transforms.push(Transform::Direction(direction));
        self
    }

    pub fn add_lineup(mut self, lineup: Lineup) -> Self {
        self.transforms.push(Transform::Lineup(lineup));
        self
    }

    pub fn truncate_code_content(mut self) -> Self {
        self.transforms.push(Transform::TruncateCode);
        self
    }

    pub fn add(mut self, transform: Transform) -> Self {
        self.transforms.push(transform);
        self
    }

    pub fn build(self) -> Preprocessor {
        Preprocessor {
            transforms: self.transforms,
        }
    }
}

/// Composed preprocessing chain; with no transforms it only serializes
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    transforms: Vec<Transform>,
}

impl Preprocessor {
    pub fn builder() -> PreprocessorBuilder {
        PreprocessorBuilder::new()
    }

    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }

    /// Serialize annotations with connectivity and apply every transform
    pub fn preprocess(&self, annotations: &Annotations) -> Document {
        let mut working = annotations.clone();
        for transform in &self.transforms {
            transform.rewrite(&mut working);
        }

        let graph = AnnotationGraph::from_annotations(&working);
        let connected = connectivity(&graph);
        let mut document = Document::from_annotations(&working, &connected);

        for transform in &self.transforms {
            transform.decorate(&mut document);
        }

        tracing::debug!(
            "Preprocessed {} annotations with {} transforms",
            working.len(),
            self.transforms.len()
        );
        document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{CodeAnnotation, TextAnnotation};
    use serde_json::Value;

    fn sample() -> Annotations {
        Annotations::new(
            vec![
                TextAnnotation::new("root", "Root", "see $mid", vec!["mid".into()]),
                TextAnnotation::new("mid", "Mid", "see $leaf-src", vec!["leaf-src".into()]),
            ],
            vec![CodeAnnotation::new(
                "leaf-src",
                "Leaf",
                "int leaf() {\n    int x = 1;\n    int y = 2;\n    return x + y;\n}",
                "leaf.cpp",
                3,
            )],
        )
    }

    #[test]
    fn test_no_transforms_only_serializes() {
        let document = Preprocessor::default().preprocess(&sample());

        assert!(document.fields.is_empty());
        assert_eq!(document.text_annotations.len(), 2);
        assert_eq!(document.code_annotations[0].content.lines().count(), 5);
        assert_eq!(document.code_annotations[0].connected_to, vec!["leaf-src", "mid", "root"]);
    }

    #[test]
    fn test_direction_and_lineup_fields() {
        let document = PreprocessorBuilder::new()
            .add_direction(Direction::LeftRight)
            .add_lineup(Lineup::Directed)
            .build()
            .preprocess(&sample());

        assert_eq!(document.get(DIRECTION_FIELD), Some(&Value::from("LR")));
        assert_eq!(document.get(LINEUP_FIELD), Some(&Value::from("directed")));
    }

    #[test]
    fn test_later_transform_wins() {
        let document = PreprocessorBuilder::new()
            .add_direction(Direction::LeftRight)
            .add_direction(Direction::DownUp)
            .build()
            .preprocess(&sample());

        assert_eq!(document.get(DIRECTION_FIELD), Some(&Value::from("DU")));
    }

    #[test]
    fn test_truncate_code_content() {
        let annotations = sample();
        let document = PreprocessorBuilder::new()
            .truncate_code_content()
            .build()
            .preprocess(&annotations);

        assert_eq!(document.code_annotations[0].content, "int leaf() {\n...\n}");
        // the input aggregate is left alone
        assert_eq!(annotations.code_annotations[0].content.lines().count(), 5);
    }

    #[test]
    fn test_truncate_keeps_short_content() {
        assert_eq!(truncate("int x;"), None);
        assert_eq!(truncate("int f()\n{}"), None);
        assert_eq!(truncate("a\nb\nc"), Some("a\n...\nc".to_string()));
    }

    #[test]
    fn test_parse_options() {
        assert_eq!("lr".parse::<Direction>().unwrap(), Direction::LeftRight);
        assert_eq!("UD".parse::<Direction>().unwrap(), Direction::UpDown);
        assert!(matches!("XY".parse::<Direction>(), Err(Error::Config(_))));
        assert_eq!("hubsize".parse::<Lineup>().unwrap(), Lineup::HubSize);
        assert!(matches!("random".parse::<Lineup>(), Err(Error::Config(_))));
    }
}
