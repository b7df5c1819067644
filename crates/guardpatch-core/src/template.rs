//! Guard templates
//!
//! A [`GuardTemplate`] is the opaque block inserted in front of a matched
//! line. Its only parameter is the indentation found on that line.

use crate::document::{body, indentation, terminator};
use serde::{Deserialize, Serialize};

/// Lines inserted before a matched line, plus an optional rewrite of it
///
/// Guard lines are relative to the matched line's indentation. A guard line
/// that starts with its own whitespace (for example `"\treturn err"`) ends up
/// one level deeper than the matched line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardTemplate {
    guard: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rewrite: Option<String>,
}

impl GuardTemplate {
    /// Template that inserts `guard` and re-emits the matched line as is
    #[must_use]
    pub fn new<I, S>(guard: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            guard: guard.into_iter().map(Into::into).collect(),
            rewrite: None,
        }
    }

    /// Replace the matched line's body (after its indentation) with `line`
    #[must_use]
    pub fn with_rewrite(mut self, line: impl Into<String>) -> Self {
        self.rewrite = Some(line.into());
        self
    }

    /// Guard lines, unindented
    #[inline]
    #[must_use]
    pub fn guard(&self) -> &[String] {
        &self.guard
    }

    /// Rewrite of the matched line, if any
    #[inline]
    #[must_use]
    pub fn rewrite(&self) -> Option<&str> {
        self.rewrite.as_deref()
    }

    /// Number of lines inserted ahead of the matched line
    #[inline]
    #[must_use]
    pub fn guard_len(&self) -> usize {
        self.guard.len()
    }

    /// Guard lines as they would appear above a line indented by `indent`,
    /// without terminators
    pub(crate) fn guard_bodies<'a>(&'a self, indent: &'a str) -> impl Iterator<Item = String> + 'a {
        self.guard.iter().map(move |line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{indent}{line}")
            }
        })
    }

    /// Expand `matched` into the guard block followed by the re-emitted line
    ///
    /// Guard entries end with `eol`; the re-emitted line keeps the matched
    /// line's own terminator.
    #[must_use]
    pub fn render(&self, matched: &str, eol: &str) -> Vec<String> {
        let indent = indentation(matched);
        let mut block: Vec<String> = self
            .guard_bodies(indent)
            .map(|line| line + eol)
            .collect();

        let rest = match &self.rewrite {
            Some(rewrite) => rewrite.as_str(),
            None => &body(matched)[indent.len()..],
        };
        block.push(format!("{indent}{rest}{}", terminator(matched)));
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn nil_guard() -> GuardTemplate {
        GuardTemplate::new(["if v == nil {", "\treturn errNil", "}"])
    }

    #[test]
    fn render_indents_every_line() {
        let block = nil_guard().render("\tif v.Ok() {\n", "\n");
        assert_eq!(
            block,
            vec![
                "\tif v == nil {\n",
                "\t\treturn errNil\n",
                "\t}\n",
                "\tif v.Ok() {\n",
            ]
        );
    }

    #[test]
    fn render_applies_rewrite_at_same_indent() {
        let template = nil_guard().with_rewrite("if w.Ok() {");
        let block = template.render("    if v.Ok() {\r\n", "\r\n");
        assert_eq!(block.last().unwrap(), "    if w.Ok() {\r\n");
        assert_eq!(block[0], "    if v == nil {\r\n");
    }

    #[test]
    fn render_keeps_missing_terminator_on_last_line() {
        let block = nil_guard().render("if v.Ok() {", "\n");
        assert_eq!(block[2], "}\n");
        assert_eq!(block[3], "if v.Ok() {");
    }

    #[test]
    fn blank_guard_lines_carry_no_indent() {
        let template = GuardTemplate::new(["check()", ""]);
        let block = template.render("  run()\n", "\n");
        assert_eq!(block, vec!["  check()\n", "\n", "  run()\n"]);
    }
}
