//! Text annotation parser
//!
//! A text annotation file looks like:
//!
//! ```text
//! # Elaborate annotation title
//!
//! Free text that may point at $other-annotation anywhere.
//! ```

use crate::{Error, Result};
use crate::annotation::TextAnnotation;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Extension of text annotation files
pub const TEXT_EXTENSION: &str = "an";

/// Prefix of the title line
const TITLE_MARKER: &str = "# ";

static REFERENCE: OnceLock<Regex> = OnceLock::new();

/// Read and parse one text annotation file
pub fn parse_text_annotation(path: &Path) -> Result<TextAnnotation> {
    let source = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_text_source(path, &source)
}

/// Parse the contents of a text annotation file; `path` provides the id.
pub fn parse_text_source(path: &Path, source: &str) -> Result<TextAnnotation> {
    let id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::parse(path, 0, "file name is not valid UTF-8"))?;

    let mut lines = source
        .lines()
        .enumerate()
        .skip_while(|(_, line)| line.trim().is_empty());

    let Some((index, first)) = lines.next() else {
        return Err(Error::parse(path, 1, "annotation has no title"));
    };

    let title = first.strip_prefix(TITLE_MARKER).ok_or_else(|| {
        Error::parse(
            path,
            index + 1,
            "the file doesn't follow the text annotation format; \
             the first line should be `#` followed by the title, e.g. `# Elaborate annotation title`",
        )
    })?;

    let mut content = String::new();
    for (_, line) in lines {
        content.push_str(line);
        content.push('\n');
    }
    let content = content.trim_start_matches('\n');

    if content.trim().is_empty() {
        return Err(Error::parse(path, index + 1, "annotation has no body"));
    }

    Ok(TextAnnotation::new(
        id,
        title.trim_end(),
        content,
        extract_references(content),
    ))
}

/// Every `$id` token in order of appearance, repeats included.
pub fn extract_references(content: &str) -> Vec<String> {
    let reference = REFERENCE.get_or_init(|| {
        Regex::new(r"\$([A-Za-z-]+)").expect("reference pattern is valid")
    });

    reference
        .captures_iter(content)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
