//! Error types for guardpatch-core
//!
//! Pattern mismatches are not errors unless the caller asked for the
//! [`MismatchPolicy::Reject`](crate::MismatchPolicy::Reject) policy.

use crate::patcher::PatchOutcome;

/// Errors raised while building targets or applying them
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatchError {
    /// Target has no line position
    #[error("target {target} has no line position")]
    MissingLocator {
        /// Position of the target in the supplied list
        target: usize,
    },

    /// Target has no expected pattern, or an empty one
    #[error("target {target} has an empty expected pattern")]
    EmptyPattern {
        /// Position of the target in the supplied list
        target: usize,
    },

    /// Target template inserts nothing
    #[error("target {target} has an empty guard template")]
    EmptyGuard {
        /// Position of the target in the supplied list
        target: usize,
    },

    /// A target did not apply and the policy forbids skipping
    #[error("target {target}{} rejected: {outcome}", label_suffix(.label))]
    Rejected {
        /// Position of the target in the supplied list
        target: usize,
        /// Target label, if one was configured
        label: Option<String>,
        /// What happened at the target line
        outcome: PatchOutcome,
    },
}

fn label_suffix(label: &Option<String>) -> String {
    label.as_ref().map(|l| format!(" ({l})")).unwrap_or_default()
}
