use crate::{Error, Result};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;

/// Paths never worth scanning for annotations
const DEFAULT_EXCLUDES: &[&str] = &[".git/", ".hg/", ".svn/"];

/// Gitignore-style exclusion rules for one scan root
pub struct IgnoreFilter {
    inner: Gitignore,
}

impl IgnoreFilter {
    pub fn new(root: &Path, excludes: &[String], use_gitignore: bool) -> Result<Self> {
        let base = if root.is_dir() {
            root
        } else {
            root.parent().unwrap_or(root)
        };
        let mut builder = GitignoreBuilder::new(base);

        if use_gitignore {
            if let Some(err) = builder.add(base.join(".gitignore")) {
                tracing::debug!("No usable .gitignore in {}: {}", base.display(), err);
            }
        }

        for pattern in DEFAULT_EXCLUDES {
            builder
                .add_line(None, pattern)
                .map_err(|e| Error::Config(format!("Invalid exclude pattern `{}`: {}", pattern, e)))?;
        }

        for pattern in excludes {
            builder
                .add_line(None, pattern)
                .map_err(|e| Error::Config(format!("Invalid exclude pattern `{}`: {}", pattern, e)))?;
        }

        let inner = builder
            .build()
            .map_err(|e| Error::Config(format!("Invalid exclude patterns: {}", e)))?;

        Ok(Self { inner })
    }

    pub fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        self.inner.matched(path, is_dir).is_ignore()
    }
}
