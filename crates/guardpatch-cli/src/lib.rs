//! guardpatch command line
//!
//! Library half of the `guardpatch` binary so the whole run can be driven
//! from tests: parse an [`Invocation`], [`run`] it, [`render`] the summary.

#![warn(unreachable_pub)]

pub mod cli;
pub mod logging;

pub use cli::{command, Invocation, Mode};
pub use logging::init_tracing;

use anyhow::{Context, Result};
use guardpatch_core::MismatchPolicy;
use guardpatch_io::{FileGateway, FileReport, PatchOptions, PatchPlan};
use std::fmt::Write as _;

/// Exit code when `check` finds pending targets
pub const EXIT_PENDING: u8 = 1;

/// Exit code for any error
pub const EXIT_ERROR: u8 = 2;

/// Result of one invocation
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Subcommand that ran
    pub mode: Mode,
    /// File-level report
    pub file: FileReport,
}

impl RunSummary {
    /// Process exit code
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self.mode {
            Mode::Check if self.file.applied() > 0 => EXIT_PENDING,
            _ => 0,
        }
    }
}

/// Load the plan, patch the file, report
///
/// # Errors
/// Returns error if the plan cannot be loaded or resolved, no file is named,
/// the file cannot be read or written, or a strict run hits a mismatch
pub fn run(invocation: &Invocation) -> Result<RunSummary> {
    let plan = PatchPlan::load(&invocation.plan)
        .with_context(|| format!("loading plan {}", invocation.plan.display()))?;

    let path = invocation
        .file
        .clone()
        .or_else(|| plan.file_relative_to(&invocation.plan))
        .context("no file to patch: pass --file or set `file` in the plan")?;

    tracing::info!(
        plan = %invocation.plan.display(),
        file = %path.display(),
        mode = ?invocation.mode,
        "running plan"
    );

    let mut patcher = plan
        .patcher()
        .with_context(|| format!("resolving plan {}", invocation.plan.display()))?;
    if invocation.strict {
        patcher = patcher.with_policy(MismatchPolicy::Reject);
    }

    let options = PatchOptions {
        dry_run: invocation.dry_run,
    };
    let file = FileGateway::new()
        .patch_file(&path, &patcher, options)
        .with_context(|| format!("patching {}", path.display()))?;

    Ok(RunSummary {
        mode: invocation.mode,
        file,
    })
}

/// Format a summary for stdout
///
/// # Errors
/// Returns error if JSON serialization fails
pub fn render(summary: &RunSummary, json: bool, verbose: u8) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(&summary.file)?);
    }

    let file = &summary.file;
    let total = file.report.len();
    let applied = file.applied();
    let path = file.path.display();

    let mut out = match summary.mode {
        Mode::Apply if file.dry_run => {
            format!("Would apply {applied} of {total} guard patches to {path} (dry run)")
        }
        Mode::Apply => format!("Applied {applied} of {total} guard patches to {path}"),
        Mode::Check if applied == 0 => format!("No pending guard patches in {path} ({total} targets)"),
        Mode::Check => format!("{applied} of {total} guard patches pending in {path}"),
    };

    if verbose > 0 {
        for entry in file.report.entries() {
            let label = entry
                .label
                .as_deref()
                .map(|l| format!(" ({l})"))
                .unwrap_or_default();
            let _ = write!(out, "\n  target {}{label}: {}", entry.target, entry.outcome);
        }
    }
    Ok(out)
}
