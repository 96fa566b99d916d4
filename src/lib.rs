//! # Lect - annotation graph extractor
//!
//! Collects small, identified units of documentation and links them into a graph:
//! - Text annotations written as standalone `.an` files
//! - Code annotations written as `// $id Title` comments right above a declaration
//! - Inline `$id` references between them
//!
//! The pipeline is strictly one-way: the [`extract`] layer builds an
//! [`Annotations`] aggregate, the [`check`] pipeline validates it, and the
//! [`preprocess`] layer turns it into a [`Document`] for a renderer.

pub mod annotation;
pub mod graph;
pub mod adapter;
pub mod extract;
pub mod check;
pub mod preprocess;
pub mod config;
pub mod ignore;
pub mod export;
pub mod ui;

// Re-exports for convenient access
pub use annotation::{Annotations, CodeAnnotation, TextAnnotation};
pub use adapter::{Language, LanguageRegistry};
pub use check::{IntegrityError, Pipeline};
pub use config::Settings;
pub use extract::AnnotationsBuilder;
pub use graph::AnnotationGraph;
pub use preprocess::{Document, Preprocessor, PreprocessorBuilder};

use std::path::PathBuf;

/// Result type alias for Lect operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Lect operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{}:{line} - {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    #[error("Output error: {0}")]
    Sink(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

/// Run the whole core for resolved settings: extract, validate, preprocess.
///
/// Nothing is returned unless every phase succeeds.
pub fn generate(settings: &Settings) -> Result<Document> {
    let annotations = collect(settings)?;
    settings.pipeline().run(&annotations)?;

    Ok(settings.preprocessor().preprocess(&annotations))
}

/// Extract both kinds of annotations from the configured roots
pub fn collect(settings: &Settings) -> Result<Annotations> {
    Ok(AnnotationsBuilder::new()
        .with_excludes(settings.excludes.clone(), settings.gitignore)
        .extract_text_annotations(&settings.text_path)?
        .extract_code_annotations(&settings.source_path, &settings.language)?
        .build())
}
