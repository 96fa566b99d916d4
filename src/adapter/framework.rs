//! Core adapter framework
//!
//! Defines the syntax-query seam and the language descriptors built on it.

use crate::Result;
use crate::annotation::REFERENCE_MARKER;
use std::ops::Range;
use std::path::Path;
use std::sync::Arc;

/// A leading comment and the node that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryMatch {
    /// Byte range of the comment
    pub comment: Range<usize>,
    /// Byte range of the following object
    pub object: Range<usize>,
    /// Zero-based start line of the comment
    pub line: usize,
}

/// Finds (comment, object) pairs in source text.
///
/// The comment precedes the object directly, or through other comments.
pub trait SyntaxQuery: Send + Sync {
    fn matches(&self, source: &str) -> Result<Vec<QueryMatch>>;
}

/// Comment markers of a language, from which the two validators derive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSyntax {
    /// Single-line comment marker
    pub line: &'static str,
    /// Block comment opener, if the language has one
    pub block: Option<&'static str>,
}

impl CommentSyntax {
    /// `//` and `/* */`
    pub const fn c_like() -> Self {
        Self { line: "//", block: Some("/*") }
    }

    /// `#` only
    pub const fn hash() -> Self {
        Self { line: "#", block: None }
    }

    /// A comment qualifies when it is a single-line comment whose first
    /// token is a reference marker.
    pub fn validate_comment(&self, text: &str) -> bool {
        let Some(rest) = text.trim_start().strip_prefix(self.line) else {
            return false;
        };
        rest.trim_start().starts_with(REFERENCE_MARKER)
    }

    /// An object qualifies unless it is itself a comment.
    pub fn validate_object(&self, text: &str) -> bool {
        let text = text.trim_start();
        if text.is_empty() || text.starts_with(self.line) {
            return false;
        }
        !self.block.is_some_and(|block| text.starts_with(block))
    }
}

/// Everything language-dependent about code annotation extraction.
#[derive(Clone)]
pub struct Language {
    name: &'static str,
    aliases: &'static [&'static str],
    extensions: &'static [&'static str],
    syntax: CommentSyntax,
    query: Arc<dyn SyntaxQuery>,
}

impl Language {
    pub fn new(
        name: &'static str,
        extensions: &'static [&'static str],
        syntax: CommentSyntax,
        query: impl SyntaxQuery + 'static,
    ) -> Self {
        Self {
            name,
            aliases: &[],
            extensions,
            syntax,
            query: Arc::new(query),
        }
    }

    /// Additional names the language can be selected by
    pub fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    /// Get the language name (for display)
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn aliases(&self) -> &[&str] {
        self.aliases
    }

    /// Get file extensions this language handles
    pub fn extensions(&self) -> &[&str] {
        self.extensions
    }

    pub fn syntax(&self) -> CommentSyntax {
        self.syntax
    }

    pub fn query(&self) -> &dyn SyntaxQuery {
        self.query.as_ref()
    }

    /// Check if this language can handle a file
    pub fn can_handle(&self, path: &Path) -> bool {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            self.extensions.contains(&ext)
        } else {
            false
        }
    }

    /// Case-insensitive match against the name and aliases
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Debug for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Language")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("extensions", &self.extensions)
            .field("syntax", &self.syntax)
            .finish_non_exhaustive()
    }
}

/// Registry of selectable languages
#[derive(Debug, Default)]
pub struct LanguageRegistry {
    languages: Vec<Language>,
}

impl LanguageRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a language
    pub fn register(&mut self, language: Language) {
        self.languages.push(language);
    }

    /// Find a language by name or alias
    pub fn find(&self, name: &str) -> Option<&Language> {
        self.languages.iter().find(|l| l.is_named(name))
    }

    /// Get all registered languages
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }
}
