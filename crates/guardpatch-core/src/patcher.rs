//! Patch application
//!
//! [`Patcher`] resolves every target against the document as loaded, then
//! expands the matched lines bottom-up so that indices computed against the
//! original layout stay valid while the document grows.

use crate::document::{body, indentation, terminator, Document};
use crate::error::PatchError;
use crate::target::{Locator, PatchTarget};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

/// What to do when a target does not apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchPolicy {
    /// Leave the line alone and carry on
    #[default]
    Skip,
    /// Fail the whole run before anything is mutated
    Reject,
}

/// Result of resolving one target
///
/// Line numbers are 0-based indices into the original document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PatchOutcome {
    /// Guard inserted before `line`
    Applied {
        /// Matched line
        line: usize,
        /// Guard lines inserted ahead of it
        inserted: usize,
    },
    /// Pattern present and the guard is already in place above it
    AlreadyGuarded {
        /// Matched line
        line: usize,
    },
    /// Line does not contain the expected pattern
    NoMatch {
        /// Inspected line
        line: usize,
    },
    /// Index lies past the end of the document
    OutOfRange {
        /// Requested line
        line: usize,
        /// Document length
        len: usize,
    },
    /// An earlier target already claimed this line
    Overlapping {
        /// Contested line
        line: usize,
        /// Position of the target that claimed it
        claimed_by: usize,
    },
}

impl PatchOutcome {
    /// Whether the target mutated the document
    #[inline]
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// Whether the target failed its precondition
    ///
    /// An already guarded line is not a failure.
    #[inline]
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::NoMatch { .. } | Self::OutOfRange { .. } | Self::Overlapping { .. }
        )
    }

    /// Line the outcome refers to
    #[inline]
    #[must_use]
    pub fn line(&self) -> usize {
        match *self {
            Self::Applied { line, .. }
            | Self::AlreadyGuarded { line }
            | Self::NoMatch { line }
            | Self::OutOfRange { line, .. }
            | Self::Overlapping { line, .. } => line,
        }
    }
}

impl Display for PatchOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Applied { line, inserted } => {
                write!(f, "applied at line {line} ({inserted} lines inserted)")
            }
            Self::AlreadyGuarded { line } => write!(f, "already guarded at line {line}"),
            Self::NoMatch { line } => write!(f, "pattern not found at line {line}"),
            Self::OutOfRange { line, len } => {
                write!(f, "line {line} out of range (document has {len} lines)")
            }
            Self::Overlapping { line, claimed_by } => {
                write!(f, "line {line} already claimed by target {claimed_by}")
            }
        }
    }
}

/// Outcome for one target, in supplied order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetReport {
    /// Position of the target in the supplied list
    pub target: usize,
    /// Target label, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// What happened
    #[serde(flatten)]
    pub outcome: PatchOutcome,
}

/// Per-target outcomes of one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchReport {
    entries: Vec<TargetReport>,
}

impl PatchReport {
    /// Entries in supplied order
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[TargetReport] {
        &self.entries
    }

    /// Number of targets whose precondition held and were mutated
    #[must_use]
    pub fn applied(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_applied()).count()
    }

    /// Number of targets left alone
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.entries.len() - self.applied()
    }

    /// Total number of targets
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no targets were supplied
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the run leaves the document unchanged
    #[inline]
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.applied() == 0
    }

    /// First target that failed its precondition
    #[must_use]
    pub fn first_failure(&self) -> Option<&TargetReport> {
        self.entries.iter().find(|e| e.outcome.is_failure())
    }
}

/// The patch applier
#[derive(Debug, Clone, Default)]
pub struct Patcher {
    targets: Vec<PatchTarget>,
    policy: MismatchPolicy,
}

impl Patcher {
    /// Create patcher over validated targets
    ///
    /// # Errors
    /// Returns error if any target has an empty pattern or guard
    pub fn new(targets: impl IntoIterator<Item = PatchTarget>) -> Result<Self, PatchError> {
        let targets: Vec<_> = targets.into_iter().collect();
        for (position, target) in targets.iter().enumerate() {
            target.validate(position)?;
        }
        Ok(Self {
            targets,
            policy: MismatchPolicy::Skip,
        })
    }

    /// Set mismatch policy
    #[inline]
    #[must_use]
    pub fn with_policy(mut self, policy: MismatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Current mismatch policy
    #[inline]
    #[must_use]
    pub fn policy(&self) -> MismatchPolicy {
        self.policy
    }

    /// Targets in supplied order
    #[inline]
    #[must_use]
    pub fn targets(&self) -> &[PatchTarget] {
        &self.targets
    }

    /// Resolve all targets without mutating anything
    #[must_use]
    pub fn plan(&self, document: &Document) -> PatchReport {
        let mut claimed: HashMap<usize, usize> = HashMap::new();
        let entries = self
            .targets
            .iter()
            .enumerate()
            .map(|(position, target)| {
                let outcome = resolve(document, position, target, &mut claimed);
                tracing::debug!(
                    target_index = position,
                    label = target.label().unwrap_or(""),
                    "{outcome}"
                );
                TargetReport {
                    target: position,
                    label: target.label().map(str::to_owned),
                    outcome,
                }
            })
            .collect();
        PatchReport { entries }
    }

    /// Apply all targets to `document`
    ///
    /// Targets that match an already claimed line report
    /// [`PatchOutcome::Overlapping`]; see [`apply`] for the rerun rules.
    ///
    /// # Errors
    /// Under [`MismatchPolicy::Reject`], returns [`PatchError::Rejected`] for
    /// the first target that did not apply; `document` is left untouched.
    pub fn apply(&self, document: &mut Document) -> Result<PatchReport, PatchError> {
        let report = self.plan(document);

        if self.policy == MismatchPolicy::Reject {
            if let Some(failed) = report.first_failure() {
                tracing::warn!(target_index = failed.target, "rejecting patch run: {}", failed.outcome);
                return Err(PatchError::Rejected {
                    target: failed.target,
                    label: failed.label.clone(),
                    outcome: failed.outcome.clone(),
                });
            }
        }

        self.expand(document, &report);
        tracing::info!(
            applied = report.applied(),
            skipped = report.skipped(),
            "patched document"
        );
        Ok(report)
    }

    /// Expand applied lines, highest index first
    fn expand(&self, document: &mut Document, report: &PatchReport) {
        let mut applied: Vec<(usize, &PatchTarget)> = report
            .entries
            .iter()
            .filter_map(|entry| match entry.outcome {
                PatchOutcome::Applied { line, .. } => Some((line, &self.targets[entry.target])),
                _ => None,
            })
            .collect();
        applied.sort_by(|a, b| b.0.cmp(&a.0));

        let fallback_eol = document.line_ending().to_owned();
        for (line, target) in applied {
            let Some(matched) = document.get(line) else {
                continue;
            };
            let eol = match terminator(matched) {
                "" => fallback_eol.as_str(),
                own => own,
            };
            let block = target.template().render(matched, eol);
            document.expand_line(line, block);
        }
    }
}

/// Apply `targets` under the skip policy
///
/// Returns the patched document and the number of targets applied.
///
/// A line is patched at most once per run: when several targets match the
/// same line, the first in supplied order applies and the rest report
/// [`PatchOutcome::Overlapping`] and are not counted.
///
/// Running the same targets again is a no-op as long as no fixed index
/// shifts onto an untargeted match; see [`Locator::Line`].
#[must_use]
pub fn apply(mut document: Document, targets: &[PatchTarget]) -> (Document, usize) {
    let patcher = Patcher {
        targets: targets.to_vec(),
        policy: MismatchPolicy::Skip,
    };
    let report = patcher.plan(&document);
    patcher.expand(&mut document, &report);
    (document, report.applied())
}

fn resolve(
    document: &Document,
    position: usize,
    target: &PatchTarget,
    claimed: &mut HashMap<usize, usize>,
) -> PatchOutcome {
    let len = document.len();
    let anchor = target.locator().anchor();
    let mut contested = None;

    for line in target.locator().candidates(len) {
        let Some(text) = document.get(line) else {
            continue;
        };
        if target.expected().is_empty() || !target.matches(text) {
            continue;
        }
        if let Some(&claimed_by) = claimed.get(&line) {
            contested.get_or_insert(PatchOutcome::Overlapping { line, claimed_by });
            continue;
        }
        if is_guarded(document, line, target) {
            return PatchOutcome::AlreadyGuarded { line };
        }
        claimed.insert(line, position);
        return PatchOutcome::Applied {
            line,
            inserted: target.template().guard_len(),
        };
    }

    if let Some(outcome) = contested {
        return outcome;
    }
    match target.locator() {
        Locator::Line(line) if line >= len => PatchOutcome::OutOfRange { line, len },
        Locator::Nearest { hint, radius } if hint.saturating_sub(radius) >= len => {
            PatchOutcome::OutOfRange { line: hint, len }
        }
        _ => PatchOutcome::NoMatch { line: anchor },
    }
}

/// Whether the lines right above `line` already hold the rendered guard
fn is_guarded(document: &Document, line: usize, target: &PatchTarget) -> bool {
    let template = target.template();
    let count = template.guard_len();
    if count == 0 || line < count {
        return false;
    }
    let Some(matched) = document.get(line) else {
        return false;
    };
    let indent = indentation(matched);
    document.lines()[line - count..line]
        .iter()
        .zip(template.guard_bodies(indent))
        .all(|(existing, expected)| body(existing) == expected)
}
