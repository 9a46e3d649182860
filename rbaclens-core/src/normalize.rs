//! The full normalization pipeline.
//!
//! Converter → Breakdown → Compactor → Sorter, run once per review. Every
//! stage is a pure function over the previous stage's output.

use crate::breakdown::breakdown;
use crate::compact::compact;
use crate::convert::to_policy_rules;
use crate::display::RuleRow;
use crate::error::CompactionError;
use crate::review::SubjectRulesReviewStatus;
use crate::rule::PolicyRule;
use crate::sort::sort_rules;

/// Prefix of the warning produced for an incomplete review.
pub const INCOMPLETE_WARNING_PREFIX: &str = "warning: the list may be incomplete: ";

/// Output of [`normalize_review`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedRules {
    /// Compacted rules in display order.
    pub rules: Vec<PolicyRule>,

    /// Set exactly when the review was incomplete.
    pub warning: Option<String>,
}

impl NormalizedRules {
    /// Display rows for every rule, in order.
    pub fn rows(&self) -> Vec<RuleRow> {
        self.rules.iter().map(RuleRow::from).collect()
    }

    pub fn is_incomplete(&self) -> bool {
        self.warning.is_some()
    }
}

/// Turn a rules review into a minimal, sorted rule list.
///
/// An incomplete review short-circuits: no rules are computed and the warning
/// carries the authorizer's evaluation error verbatim, even if the review
/// still lists some rules.
pub fn normalize_review(
    status: &SubjectRulesReviewStatus,
) -> Result<NormalizedRules, CompactionError> {
    if status.incomplete {
        log::warn!(
            "rules review is incomplete: {}",
            status.evaluation_error
        );
        return Ok(NormalizedRules {
            rules: Vec::new(),
            warning: Some(format!(
                "{}{}",
                INCOMPLETE_WARNING_PREFIX, status.evaluation_error
            )),
        });
    }

    let rules = normalize_rules(&to_policy_rules(status))?;
    Ok(NormalizedRules {
        rules,
        warning: None,
    })
}

/// Breakdown, compact and sort a list of compound rules.
pub fn normalize_rules(rules: &[PolicyRule]) -> Result<Vec<PolicyRule>, CompactionError> {
    let atoms = breakdown(rules);
    let atom_count = atoms.len();

    let mut compacted = compact(atoms)?;
    sort_rules(&mut compacted);

    log::debug!(
        "normalized {} rules ({} atomic) into {} rules",
        rules.len(),
        atom_count,
        compacted.len()
    );
    Ok(compacted)
}
