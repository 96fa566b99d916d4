//! Extraction layer
//!
//! Turns `.an` files and marked source comments into one [`Annotations`]
//! aggregate.
//!
//! [`Annotations`]: crate::annotation::Annotations

pub mod text;
pub mod code;
pub mod collector;

pub use code::parse_code_annotations;
pub use collector::AnnotationsBuilder;
pub use text::{extract_references, parse_text_annotation, parse_text_source, TEXT_EXTENSION};
