//! Validation pipeline
//!
//! An ordered list of independent checks over the whole annotation set. Each
//! check runs to completion before the next starts; the first failure stops
//! the pipeline. The standard order is:
//! 1. id character set
//! 2. duplicate ids
//! 3. referenced ids exist
//! 4. no reference cycles, at least one root
//!
//! Further checks (such as [`SuffixCheck`]) are appended after those.

pub mod cycle;
pub mod rules;

pub use cycle::CycleCheck;
pub use rules::{DuplicateIdCheck, IdCharsetCheck, ReferenceCheck, SuffixCheck};

use crate::annotation::Annotations;

/// An integrity violation found by a check
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityError {
    #[error("`{id}` isn't a valid id. Only latin letters and hyphens are allowed")]
    InvalidId { id: String },

    #[error("Annotation `{id}` is defined more than once")]
    DuplicateId { id: String },

    #[error("Annotation `{id}` doesn't exist (referenced by `{referenced_by}`)")]
    MissingReference { id: String, referenced_by: String },

    #[error("There is a cycle of referenced annotations: {}", render_path(.path))]
    Cycle { path: Vec<String> },

    #[error("There are no root annotations{}", describe_cycle(.cycle))]
    NoRoots { cycle: Vec<String> },

    #[error("Code annotation `{id}` must end with `{suffix}`")]
    MissingSuffix { id: String, suffix: String },

    #[error("{check}: {message}")]
    Custom { check: String, message: String },
}

/// Render a traversal path as `a > b > c`
pub fn render_path(path: &[String]) -> String {
    path.join(" > ")
}

fn describe_cycle(cycle: &[String]) -> String {
    if cycle.is_empty() {
        String::new()
    } else {
        format!("; every annotation is referenced, e.g. {}", render_path(cycle))
    }
}

/// One integrity check over the full annotation set
pub trait Check: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    fn check(&self, annotations: &Annotations) -> Result<(), IntegrityError>;
}

/// Ordered checks, run with early exit on the first failure
pub struct Pipeline {
    checks: Vec<Box<dyn Check>>,
}

impl Pipeline {
    /// A pipeline without any checks
    pub fn empty() -> Self {
        Self { checks: Vec::new() }
    }

    /// The four standard checks in their standard order
    pub fn standard() -> Self {
        Self::empty()
            .with(IdCharsetCheck)
            .with(DuplicateIdCheck)
            .with(ReferenceCheck)
            .with(CycleCheck)
    }

    /// Append a check to the end of the pipeline
    pub fn with(mut self, check: impl Check + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Names of the checks in execution order
    pub fn names(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    pub fn run(&self, annotations: &Annotations) -> Result<(), IntegrityError> {
        for check in &self.checks {
            tracing::debug!("Running check: {}", check.name());
            check.check(annotations)?;
        }
        tracing::info!(
            "{} annotations passed {} checks",
            annotations.len(),
            self.checks.len()
        );
        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}
