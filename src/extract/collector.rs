//! Annotation collector
//!
//! Walks the text and source roots and parses every candidate file. Each
//! directory level fans out over a rayon parallel iterator; `try_for_each`
//! is the join barrier, so a level only finishes once all of its children
//! have. The first error fails the whole collection and the builder holding
//! the partial results is dropped.

use crate::{Error, Result};
use crate::adapter::Language;
use crate::annotation::{Annotations, CodeAnnotation, TextAnnotation};
use crate::ignore::IgnoreFilter;
use super::code::parse_code_annotations;
use super::text::{parse_text_annotation, TEXT_EXTENSION};
use rayon::prelude::*;
use std::fs::FileType;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Builds an [`Annotations`] aggregate from directory trees.
///
/// ```rust,no_run
/// # fn main() -> lect::Result<()> {
/// let registry = lect::adapter::default_registry()?;
/// let cpp = registry.find("c++").unwrap();
/// let annotations = lect::AnnotationsBuilder::new()
///     .extract_text_annotations("docs".as_ref())?
///     .extract_code_annotations("src".as_ref(), cpp)?
///     .build();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct AnnotationsBuilder {
    text_annotations: Mutex<Vec<TextAnnotation>>,
    code_annotations: Mutex<Vec<CodeAnnotation>>,
    excludes: Vec<String>,
    gitignore: bool,
}

impl AnnotationsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclusion patterns applied to both roots
    pub fn with_excludes(mut self, excludes: Vec<String>, gitignore: bool) -> Self {
        self.excludes = excludes;
        self.gitignore = gitignore;
        self
    }

    /// Parse every `.an` file under `root` (a directory or a single file)
    pub fn extract_text_annotations(self, root: &Path) -> Result<Self> {
        ensure_exists(root)?;
        let filter = IgnoreFilter::new(root, &self.excludes, self.gitignore)?;
        let before = lock(&self.text_annotations).len();

        visit(root, &filter, &|path: &Path| {
            if path.extension().and_then(|e| e.to_str()) != Some(TEXT_EXTENSION) {
                return Ok(());
            }
            let annotation = parse_text_annotation(path)?;
            tracing::debug!("Text annotation `{}` from {}", annotation.id, path.display());
            lock(&self.text_annotations).push(annotation);
            Ok(())
        })?;

        let found = lock(&self.text_annotations).len() - before;
        tracing::info!("Extracted {} text annotations from {}", found, root.display());
        Ok(self)
    }

    /// Parse every source file under `root` that `language` handles
    pub fn extract_code_annotations(self, root: &Path, language: &Language) -> Result<Self> {
        ensure_exists(root)?;
        let filter = IgnoreFilter::new(root, &self.excludes, self.gitignore)?;
        let before = lock(&self.code_annotations).len();

        visit(root, &filter, &|path: &Path| {
            if !language.can_handle(path) {
                return Ok(());
            }
            let source = std::fs::read_to_string(path).map_err(|source| Error::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let relative = relative_path(root, path);
            let annotations = parse_code_annotations(path, &relative, &source, language)?;
            if !annotations.is_empty() {
                lock(&self.code_annotations).extend(annotations);
            }
            Ok(())
        })?;

        let found = lock(&self.code_annotations).len() - before;
        tracing::info!(
            "Extracted {} {} code annotations from {}",
            found,
            language.name(),
            root.display()
        );
        Ok(self)
    }

    /// Finish collection; text annotations are ordered by id, code
    /// annotations by file and line.
    pub fn build(self) -> Annotations {
        let mut text_annotations = self
            .text_annotations
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let mut code_annotations = self
            .code_annotations
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);

        text_annotations.sort_by(|a, b| a.id.cmp(&b.id));
        code_annotations.sort_by(|a, b| (&a.file, a.line).cmp(&(&b.file, b.line)));

        Annotations::new(text_annotations, code_annotations)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn ensure_exists(root: &Path) -> Result<()> {
    std::fs::metadata(root).map_err(|source| Error::Read {
        path: root.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Call `on_file` for every non-excluded file under `path`.
///
/// Symbolic links below `path` are not followed.
fn visit<F>(path: &Path, filter: &IgnoreFilter, on_file: &F) -> Result<()>
where
    F: Fn(&Path) -> Result<()> + Sync,
{
    if !path.is_dir() {
        return on_file(path);
    }

    let entries = std::fs::read_dir(path)
        .and_then(|dir| {
            dir.map(|entry| entry.and_then(|e| Ok((e.path(), e.file_type()?))))
                .collect::<std::io::Result<Vec<(PathBuf, FileType)>>>()
        })
        .map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;

    entries
        .into_par_iter()
        .filter(|(child, file_type)| {
            if file_type.is_symlink() {
                tracing::debug!("Skipping symbolic link {}", child.display());
                return false;
            }
            !filter.is_ignored(child, file_type.is_dir())
        })
        .try_for_each(|(child, _)| visit(&child, filter, on_file))
}

/// `path` relative to `root`, `/`-separated; a file root becomes its name
fn relative_path(root: &Path, path: &Path) -> String {
    let relative = match path.strip_prefix(root) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative,
        _ => path.file_name().map(Path::new).unwrap_or(path),
    };

    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::query_adapter;
    use std::fs;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_collects_nested_text_annotations() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "root.an", "# Root\n\nsee $mid\n");
        write(root, "deep/er/mid.an", "# Mid\n\nsee $leaf\n");
        write(root, "deep/leaf.an", "# Leaf\n\ndone\n");
        write(root, "deep/README.md", "# Not an annotation\n");

        let annotations = AnnotationsBuilder::new()
            .extract_text_annotations(root)
            .unwrap()
            .build();

        let ids: Vec<_> = annotations.text_annotations.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["leaf", "mid", "root"]);
        assert!(annotations.code_annotations.is_empty());
    }

    #[test]
    fn test_single_file_root() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "only.an", "# Only\n\nbody\n");

        let annotations = AnnotationsBuilder::new()
            .extract_text_annotations(&dir.path().join("only.an"))
            .unwrap()
            .build();

        assert_eq!(annotations.text_annotations.len(), 1);
    }

    #[test]
    fn test_error_in_any_branch_fails_collection() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for i in 0..8 {
            write(root, &format!("group-{i}/fine.an"), "# Fine\n\nbody\n");
        }
        write(root, "group-3/nested/broken.an", "no title here\n");

        let err = AnnotationsBuilder::new()
            .extract_text_annotations(root)
            .unwrap_err();

        match err {
            Error::Parse { path, .. } => assert!(path.ends_with("broken.an")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_collects_code_annotations_with_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "src/main.cpp", "// $main-src Entry point\nint main() { return 0; }\n");
        write(root, "src/util/strings.hpp", "// $strings-src Helpers\nint count();\n");
        write(root, "src/notes.txt", "// $ignored-src Not source\nint x;\n");
        write(root, ".git/hooks/pre.cpp", "// $hidden-src Hook\nint hook();\n");

        let cpp = query_adapter::cpp().unwrap();
        let annotations = AnnotationsBuilder::new()
            .extract_code_annotations(root, &cpp)
            .unwrap()
            .build();

        let found: Vec<_> = annotations
            .code_annotations
            .iter()
            .map(|a| (a.id.as_str(), a.file.as_str(), a.line))
            .collect();
        assert_eq!(
            found,
            vec![("main-src", "src/main.cpp", 0), ("strings-src", "src/util/strings.hpp", 0)]
        );
    }

    #[test]
    fn test_configured_excludes() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "keep/a.an", "# A\n\nbody\n");
        write(root, "drafts/b.an", "# B\n\nbody\n");

        let annotations = AnnotationsBuilder::new()
            .with_excludes(vec!["drafts/".to_string()], false)
            .extract_text_annotations(root)
            .unwrap()
            .build();

        assert_eq!(annotations.text_annotations.len(), 1);
        assert_eq!(annotations.text_annotations[0].id, "a");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directories_are_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "real/a.an", "# A\n\nbody\n");
        std::os::unix::fs::symlink(root.join("real"), root.join("alias")).unwrap();
        std::os::unix::fs::symlink(root, root.join("real/loop")).unwrap();

        let annotations = AnnotationsBuilder::new()
            .extract_text_annotations(root)
            .unwrap()
            .build();

        let ids: Vec<_> = annotations.text_annotations.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");

        let err = AnnotationsBuilder::new()
            .extract_text_annotations(&missing)
            .unwrap_err();
        assert!(matches!(err, Error::Read { ref path, .. } if *path == missing));

        let cpp = query_adapter::cpp().unwrap();
        let err = AnnotationsBuilder::new()
            .extract_code_annotations(&missing, &cpp)
            .unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(relative_path(Path::new("/r"), Path::new("/r/a/b.cpp")), "a/b.cpp");
        assert_eq!(relative_path(Path::new("/r/b.cpp"), Path::new("/r/b.cpp")), "b.cpp");
    }
}
