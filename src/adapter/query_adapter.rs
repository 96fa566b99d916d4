//! Query-based Language Adapter
//!
//! Locates annotation candidates with Tree-sitter queries instead of
//! hand-written tree walks. Every query must define two captures:
//! - `comment` → the leading comment
//! - `object` → the first node after it, possibly past other comments
//!
//! The query only finds adjacency; deciding whether a comment really is an
//! annotation is left to the language's [`CommentSyntax`].

use crate::{Error, Result};
use super::framework::{CommentSyntax, Language, LanguageRegistry, QueryMatch, SyntaxQuery};
use std::collections::HashSet;
use tree_sitter::{Parser, Query, QueryCursor};

/// Query for grammars whose comments are all `comment` nodes
const COMMENT_QUERY: &str = "((comment) @comment . (comment)* . (_) @object)";

/// Rust splits comments into `line_comment` and `block_comment`
const RUST_COMMENT_QUERY: &str = "((line_comment) @comment . (line_comment)* . (_) @object)";

/// A syntax query backed by a Tree-sitter grammar
pub struct TreeSitterQuery {
    language: tree_sitter::Language,
    query: Query,
    comment_index: u32,
    object_index: u32,
}

impl TreeSitterQuery {
    /// Compile a query for a grammar
    pub fn new(language: tree_sitter::Language, query_source: &str) -> Result<Self> {
        let query = Query::new(&language, query_source)
            .map_err(|e| Error::Query(format!("Query parse error: {}", e)))?;

        let capture = |name: &str| {
            query
                .capture_index_for_name(name)
                .ok_or_else(|| Error::Query(format!("Query has no @{} capture", name)))
        };
        let comment_index = capture("comment")?;
        let object_index = capture("object")?;

        Ok(Self {
            language,
            query,
            comment_index,
            object_index,
        })
    }
}

impl SyntaxQuery for TreeSitterQuery {
    fn matches(&self, source: &str) -> Result<Vec<QueryMatch>> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| Error::Query(format!("Failed to set language: {}", e)))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| Error::Query("Failed to parse file".to_string()))?;

        let mut cursor = QueryCursor::new();
        let mut found = Vec::new();
        // One comment may match several objects through the `(comment)*`
        // quantifier; keep them all, the object validator picks.
        let mut seen = HashSet::new();

        for query_match in cursor.matches(&self.query, tree.root_node(), source.as_bytes()) {
            let node_for = |index: u32| {
                query_match
                    .captures
                    .iter()
                    .find(|c| c.index == index)
                    .map(|c| c.node)
            };

            if let (Some(comment), Some(object)) = (node_for(self.comment_index), node_for(self.object_index)) {
                if seen.insert((comment.start_byte(), object.start_byte())) {
                    found.push(QueryMatch {
                        comment: comment.byte_range(),
                        object: object.byte_range(),
                        line: comment.start_position().row,
                    });
                }
            }
        }

        found.sort_by_key(|m| (m.comment.start, m.object.start));
        Ok(found)
    }
}

/// C and C++ share the C++ grammar
pub fn cpp() -> Result<Language> {
    let query = TreeSitterQuery::new(tree_sitter_cpp::LANGUAGE.into(), COMMENT_QUERY)?;
    Ok(Language::new(
        "c++",
        &["c", "cpp", "cc", "cxx", "h", "hpp", "hh"],
        CommentSyntax::c_like(),
        query,
    )
    .with_aliases(&["cpp", "c"]))
}

pub fn rust() -> Result<Language> {
    let query = TreeSitterQuery::new(tree_sitter_rust::LANGUAGE.into(), RUST_COMMENT_QUERY)?;
    Ok(Language::new("rust", &["rs"], CommentSyntax::c_like(), query).with_aliases(&["rs"]))
}

pub fn go() -> Result<Language> {
    let query = TreeSitterQuery::new(tree_sitter_go::LANGUAGE.into(), COMMENT_QUERY)?;
    Ok(Language::new("go", &["go"], CommentSyntax::c_like(), query).with_aliases(&["golang"]))
}

pub fn javascript() -> Result<Language> {
    let query = TreeSitterQuery::new(tree_sitter_javascript::LANGUAGE.into(), COMMENT_QUERY)?;
    Ok(Language::new(
        "javascript",
        &["js", "jsx", "mjs", "cjs"],
        CommentSyntax::c_like(),
        query,
    )
    .with_aliases(&["js"]))
}

pub fn python() -> Result<Language> {
    let query = TreeSitterQuery::new(tree_sitter_python::LANGUAGE.into(), COMMENT_QUERY)?;
    Ok(Language::new("python", &["py", "pyi"], CommentSyntax::hash(), query).with_aliases(&["py"]))
}

/// Create a registry with all built-in languages
pub fn default_registry() -> Result<LanguageRegistry> {
    let mut registry = LanguageRegistry::new();
    for language in [cpp()?, rust()?, go()?, javascript()?, python()?] {
        registry.register(language);
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans<'s>(source: &'s str, m: &QueryMatch) -> (&'s str, &'s str) {
        (&source[m.comment.clone()], &source[m.object.clone()])
    }

    #[test]
    fn test_builtin_queries_compile() {
        let registry = default_registry().unwrap();
        let names: Vec<_> = registry.languages().iter().map(|l| l.name()).collect();
        assert_eq!(names, vec!["c++", "rust", "go", "javascript", "python"]);
        assert!(registry.find("cpp").is_some());
    }

    #[test]
    fn test_cpp_comment_before_function() {
        let source = "// $parse-src Parse the input\nint parse(int x) {\n    return x;\n}\n";
        let language = cpp().unwrap();
        let matches = language.query().matches(source).unwrap();

        let accepted: Vec<_> = matches
            .iter()
            .map(|m| spans(source, m))
            .filter(|(c, o)| language.syntax().validate_comment(c) && language.syntax().validate_object(o))
            .collect();

        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].0, "// $parse-src Parse the input");
        assert_eq!(accepted[0].1, "int parse(int x) {\n    return x;\n}");
        assert_eq!(matches[0].line, 0);
    }

    #[test]
    fn test_rust_line_comment_before_item() {
        let source = "\n\n// $config-src Settings\nstruct Config {\n    path: String,\n}\n";
        let language = rust().unwrap();
        let matches = language.query().matches(source).unwrap();

        let m = matches
            .iter()
            .find(|m| language.syntax().validate_object(&source[m.object.clone()]))
            .unwrap();
        assert!(source[m.object.clone()].starts_with("struct Config"));
        assert_eq!(m.line, 2);
    }

    #[test]
    fn test_python_hash_comment() {
        let source = "# $loader-src Load files\ndef load(path):\n    return path\n";
        let language = python().unwrap();
        let matches = language.query().matches(source).unwrap();

        assert!(matches.iter().any(|m| {
            let (comment, object) = spans(source, m);
            language.syntax().validate_comment(comment) && object.starts_with("def load")
        }));
    }

    #[test]
    fn test_invalid_query_is_reported() {
        let result = TreeSitterQuery::new(tree_sitter_cpp::LANGUAGE.into(), "((comment) @comment");
        assert!(matches!(result, Err(Error::Query(_))));

        let result = TreeSitterQuery::new(tree_sitter_cpp::LANGUAGE.into(), "(comment) @comment");
        assert!(matches!(result, Err(Error::Query(msg)) if msg.contains("@object")));
    }
}
