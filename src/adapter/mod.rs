//! Language Adapter Framework
//!
//! Each language provides a Tree-sitter grammar, a query that pairs a leading
//! comment with the declaration below it, and its comment syntax. The
//! extraction layer only ever sees [`QueryMatch`] spans.

pub mod framework;
pub mod query_adapter;

pub use framework::{CommentSyntax, Language, LanguageRegistry, QueryMatch, SyntaxQuery};
pub use query_adapter::{default_registry, TreeSitterQuery};
