//! Id and reference checks

use super::{Check, IntegrityError};
use crate::annotation::{is_valid_id, Annotations};
use std::collections::HashSet;

/// Every id matches `[A-Za-z-]+`
pub struct IdCharsetCheck;

impl Check for IdCharsetCheck {
    fn name(&self) -> &str {
        "id-charset"
    }

    fn check(&self, annotations: &Annotations) -> Result<(), IntegrityError> {
        match annotations.ids().find(|id| !is_valid_id(id)) {
            Some(id) => Err(IntegrityError::InvalidId { id: id.to_string() }),
            None => Ok(()),
        }
    }
}

/// No id is used twice, across text and code annotations
pub struct DuplicateIdCheck;

impl Check for DuplicateIdCheck {
    fn name(&self) -> &str {
        "duplicate-ids"
    }

    fn check(&self, annotations: &Annotations) -> Result<(), IntegrityError> {
        let mut seen = HashSet::new();
        for id in annotations.ids() {
            if !seen.insert(id) {
                return Err(IntegrityError::DuplicateId { id: id.to_string() });
            }
        }
        Ok(())
    }
}

/// Every reference points at an existing annotation
pub struct ReferenceCheck;

impl Check for ReferenceCheck {
    fn name(&self) -> &str {
        "references"
    }

    fn check(&self, annotations: &Annotations) -> Result<(), IntegrityError> {
        let known: HashSet<&str> = annotations.ids().collect();
        match annotations.edges().find(|(_, to)| !known.contains(to)) {
            Some((from, to)) => Err(IntegrityError::MissingReference {
                id: to.to_string(),
                referenced_by: from.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Every code annotation id ends with a fixed suffix
pub struct SuffixCheck {
    suffix: String,
}

impl SuffixCheck {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self { suffix: suffix.into() }
    }
}

impl Check for SuffixCheck {
    fn name(&self) -> &str {
        "code-suffix"
    }

    fn check(&self, annotations: &Annotations) -> Result<(), IntegrityError> {
        match annotations
            .code_annotations
            .iter()
            .find(|a| !a.id.ends_with(&self.suffix))
        {
            Some(annotation) => Err(IntegrityError::MissingSuffix {
                id: annotation.id.clone(),
                suffix: self.suffix.clone(),
            }),
            None => Ok(()),
        }
    }
}
