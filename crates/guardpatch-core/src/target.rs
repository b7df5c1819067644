//! Patch targets
//!
//! A [`PatchTarget`] names one line (by position), the literal text that
//! must be on it, and the guard to insert in front of it.

use crate::error::PatchError;
use crate::template::GuardTemplate;
use std::sync::Arc;

/// How a target finds its line in the original document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// Exactly this 0-based index
    ///
    /// Indices are positions in the document as first loaded. After a patch
    /// run the lines below each inserted guard have moved, so rerunning the
    /// same fixed targets is only a no-op when the template rewrites the
    /// matched line, or when every line carrying the pattern is itself
    /// targeted. Otherwise a shifted index can land on an untargeted match
    /// and patch it. Use [`Locator::Nearest`] for plans that are rerun.
    Line(usize),

    /// The matching line closest to `hint` within `radius` lines either side
    ///
    /// Ties go to the lower index.
    Nearest {
        /// Expected 0-based index
        hint: usize,
        /// How far from `hint` to search
        radius: usize,
    },
}

impl Locator {
    /// Index the locator is anchored on
    #[inline]
    #[must_use]
    pub fn anchor(&self) -> usize {
        match *self {
            Self::Line(line) => line,
            Self::Nearest { hint, .. } => hint,
        }
    }

    /// Candidate indices in preference order, clipped to `len`
    pub(crate) fn candidates(&self, len: usize) -> Vec<usize> {
        match *self {
            Self::Line(line) => vec![line],
            Self::Nearest { hint, radius } => {
                if len == 0 {
                    return Vec::new();
                }
                // Distances outside [first, last] reach no index below `len`
                let first = hint.saturating_sub(len - 1);
                let last = radius.min(hint.max(len - 1));
                let mut out = Vec::new();
                for distance in first..=last {
                    if let Some(below) = hint.checked_sub(distance) {
                        if below < len {
                            out.push(below);
                        }
                    }
                    let above = hint.saturating_add(distance);
                    if distance > 0 && above < len {
                        out.push(above);
                    }
                }
                out
            }
        }
    }
}

/// A single requested edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchTarget {
    label: Option<String>,
    locator: Locator,
    expected: String,
    template: Arc<GuardTemplate>,
}

impl PatchTarget {
    /// Target at a fixed index
    ///
    /// Not validated; [`Patcher::new`](crate::Patcher::new) rejects empty
    /// patterns and guards.
    #[must_use]
    pub fn at(line: usize, expected: impl Into<String>, template: Arc<GuardTemplate>) -> Self {
        Self {
            label: None,
            locator: Locator::Line(line),
            expected: expected.into(),
            template,
        }
    }

    /// Start building a target
    #[inline]
    #[must_use]
    pub fn builder() -> PatchTargetBuilder {
        PatchTargetBuilder::new()
    }

    /// Optional human-readable name
    #[inline]
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Where the target looks for its line
    #[inline]
    #[must_use]
    pub fn locator(&self) -> Locator {
        self.locator
    }

    /// Literal text the line must contain
    #[inline]
    #[must_use]
    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// Guard inserted when the pattern matches
    #[inline]
    #[must_use]
    pub fn template(&self) -> &GuardTemplate {
        &self.template
    }

    /// Whether `line` satisfies the precondition
    #[inline]
    #[must_use]
    pub fn matches(&self, line: &str) -> bool {
        line.contains(self.expected.as_str())
    }

    pub(crate) fn validate(&self, position: usize) -> Result<(), PatchError> {
        if self.expected.is_empty() {
            return Err(PatchError::EmptyPattern { target: position });
        }
        if self.template.guard_len() == 0 {
            return Err(PatchError::EmptyGuard { target: position });
        }
        Ok(())
    }
}

/// Builder for [`PatchTarget`]
#[derive(Debug, Default)]
pub struct PatchTargetBuilder {
    label: Option<String>,
    locator: Option<Locator>,
    expected: Option<String>,
    template: Option<Arc<GuardTemplate>>,
}

impl PatchTargetBuilder {
    /// Create new builder
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set label
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Fixed 0-based line index
    #[must_use]
    pub fn line(mut self, line: usize) -> Self {
        self.locator = Some(Locator::Line(line));
        self
    }

    /// Search around `hint` for the pattern
    #[must_use]
    pub fn nearest(mut self, hint: usize, radius: usize) -> Self {
        self.locator = Some(Locator::Nearest { hint, radius });
        self
    }

    /// Set locator directly
    #[must_use]
    pub fn locator(mut self, locator: Locator) -> Self {
        self.locator = Some(locator);
        self
    }

    /// Literal text the line must contain
    #[must_use]
    pub fn expect(mut self, pattern: impl Into<String>) -> Self {
        self.expected = Some(pattern.into());
        self
    }

    /// Guard template
    #[must_use]
    pub fn template(mut self, template: impl Into<Arc<GuardTemplate>>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Build target
    ///
    /// # Errors
    /// Returns error if the locator, pattern or template is missing or empty
    pub fn build(self) -> Result<PatchTarget, PatchError> {
        let locator = self
            .locator
            .ok_or(PatchError::MissingLocator { target: 0 })?;
        let expected = self.expected.unwrap_or_default();
        let template = self
            .template
            .ok_or(PatchError::EmptyGuard { target: 0 })?;

        let target = PatchTarget {
            label: self.label,
            locator,
            expected,
            template,
        };
        target.validate(0)?;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> GuardTemplate {
        GuardTemplate::new(["guard()"])
    }

    #[test]
    fn builder_success() {
        let target = PatchTarget::builder()
            .label("nil check")
            .line(4)
            .expect("if v {")
            .template(template())
            .build()
            .unwrap();

        assert_eq!(target.label(), Some("nil check"));
        assert_eq!(target.locator(), Locator::Line(4));
        assert!(target.matches("    if v {\n"));
        assert!(!target.matches("    if w {\n"));
    }

    #[test]
    fn builder_missing_locator() {
        let result = PatchTarget::builder().expect("x").template(template()).build();
        assert_eq!(result, Err(PatchError::MissingLocator { target: 0 }));
    }

    #[test]
    fn builder_rejects_empty_pattern() {
        let result = PatchTarget::builder().line(0).template(template()).build();
        assert_eq!(result, Err(PatchError::EmptyPattern { target: 0 }));
    }

    #[test]
    fn builder_rejects_empty_guard() {
        let result = PatchTarget::builder()
            .line(0)
            .expect("x")
            .template(GuardTemplate::new(Vec::<String>::new()))
            .build();
        assert_eq!(result, Err(PatchError::EmptyGuard { target: 0 }));
    }

    #[test]
    fn nearest_candidates_alternate_outward() {
        let locator = Locator::Nearest { hint: 5, radius: 2 };
        assert_eq!(locator.candidates(100), vec![5, 4, 6, 3, 7]);
    }

    #[test]
    fn nearest_candidates_clip_to_document() {
        let locator = Locator::Nearest { hint: 1, radius: 3 };
        assert_eq!(locator.candidates(3), vec![1, 0, 2]);
        assert!(Locator::Nearest { hint: 10, radius: 2 }.candidates(5).is_empty());
    }

    #[test]
    fn huge_radius_stays_within_document() {
        let wide = Locator::Nearest { hint: 2, radius: 9_000_000_000_000_000_000 };
        assert_eq!(wide.candidates(5), vec![2, 1, 3, 0, 4]);

        let past_end = Locator::Nearest { hint: 7, radius: usize::MAX };
        assert_eq!(past_end.candidates(5), vec![4, 3, 2, 1, 0]);

        let extreme = Locator::Nearest { hint: usize::MAX, radius: usize::MAX };
        assert_eq!(extreme.candidates(3), vec![2, 1, 0]);
        assert!(extreme.candidates(0).is_empty());
    }
}
