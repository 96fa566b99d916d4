//! Code annotation parser
//!
//! Consumes the syntax query output for one source file. A pair becomes an
//! annotation when the comment reads `// $id Title` and the object is not
//! itself a comment; every other pair is skipped without complaint.

use crate::{Error, Result};
use crate::adapter::Language;
use crate::annotation::{is_id_char, CodeAnnotation, REFERENCE_MARKER};
use std::collections::HashSet;
use std::path::Path;

const NO_IDENTITY: &str = "annotation has no identity";
const NO_TITLE: &str = "annotation has no title";

/// Extract the code annotations of one file.
///
/// `relative` is the path recorded on each annotation. Files the language
/// does not handle yield nothing.
pub fn parse_code_annotations(
    path: &Path,
    relative: &str,
    source: &str,
    language: &Language,
) -> Result<Vec<CodeAnnotation>> {
    if !language.can_handle(path) {
        return Ok(Vec::new());
    }

    let syntax = language.syntax();
    let mut annotations = Vec::new();
    let mut annotated = HashSet::new();

    for m in language.query().matches(source)? {
        if annotated.contains(&m.comment.start) {
            continue;
        }

        let span = |range: std::ops::Range<usize>| {
            source.get(range).ok_or_else(|| {
                Error::Query(format!("{}: match outside of source text", path.display()))
            })
        };
        let comment = span(m.comment.clone())?;
        let object = span(m.object.clone())?;

        if !syntax.validate_comment(comment) || !syntax.validate_object(object) {
            continue;
        }

        let (id, title) =
            split_comment(comment).map_err(|message| Error::parse(path, m.line + 1, message))?;

        annotated.insert(m.comment.start);
        annotations.push(CodeAnnotation::new(id, title, object, relative, m.line));
    }

    tracing::debug!("{} code annotations in {}", annotations.len(), relative);
    Ok(annotations)
}

/// Split an accepted comment into its id and title
fn split_comment(comment: &str) -> std::result::Result<(&str, &str), &'static str> {
    let marker = comment.find(REFERENCE_MARKER).ok_or(NO_IDENTITY)?;
    let rest = &comment[marker + REFERENCE_MARKER.len_utf8()..];

    let end = rest
        .find(|c: char| !is_id_char(c))
        .filter(|&end| end > 0)
        .ok_or(NO_IDENTITY)?;

    let (id, title) = rest.split_at(end);
    let title = title.trim();
    if title.is_empty() {
        return Err(NO_TITLE);
    }

    Ok((id, title))
}
