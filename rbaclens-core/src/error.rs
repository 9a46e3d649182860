//! Error types for the normalization engine
//!
//! The engine has a single failure mode: an internal contract between the
//! stages was broken. Incomplete reviews are data, not errors, and are
//! reported through [`crate::NormalizedRules::warning`].

use thiserror::Error;

/// Errors raised while compacting atomic rules
///
/// Both variants indicate a bug upstream of the compactor (or in the
/// compactor itself), never a problem with the data returned by the cluster.
/// Callers should surface them verbatim rather than retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompactionError {
    /// A compound rule was offered where a single verb/resource rule was required
    #[error("rule is not atomic: {0}")]
    NotAtomic(String),

    /// The compacted rules do not cover exactly the permissions of the input
    #[error("compacted rules cover {actual} permissions, expected {expected}")]
    CoverageMismatch { expected: usize, actual: usize },
}

impl CompactionError {
    /// Returns true if the error was caused by a non-atomic input rule
    pub fn is_not_atomic(&self) -> bool {
        matches!(self, Self::NotAtomic(_))
    }
}
