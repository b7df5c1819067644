//! Patch plans
//!
//! A [`PatchPlan`] is the configuration value handed to the patcher: which
//! lines to inspect, what each must contain, and which guard to insert.
//! Plans are plain serde structs so they load identically from TOML, YAML
//! and JSON.

use crate::error::PlanError;
use crate::formats::PlanFormat;
use guardpatch_core::{GuardTemplate, Locator, MismatchPolicy, PatchTarget, Patcher};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DEFAULT_RADIUS: usize = 8;

/// Full plan file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchPlan {
    /// File to patch, relative to the plan file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Whether line numbers count from 0 or 1
    #[serde(default)]
    pub index_base: u8,

    /// What to do when a target does not apply
    #[serde(default)]
    pub on_mismatch: MismatchPolicy,

    /// Named guard templates
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub templates: BTreeMap<String, TemplateSpec>,

    /// Targets in application order
    #[serde(default)]
    pub targets: Vec<TargetSpec>,
}

/// Named, reusable guard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateSpec {
    /// Default pattern for targets using this template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect: Option<String>,

    /// Guard lines, relative to the matched line's indentation
    pub guard: Vec<String>,

    /// Replacement for the matched line's body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewrite: Option<String>,
}

/// How a target locates its line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocateMode {
    /// Exact line number
    #[default]
    Fixed,
    /// Closest matching line within `radius`
    Nearest,
}

/// One `[[targets]]` entry; may expand to several patch targets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetSpec {
    /// Label shown in reports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Single line number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,

    /// Several line numbers sharing everything else
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<usize>,

    /// Literal text the line must contain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect: Option<String>,

    /// Name of a template in `[templates]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Inline guard lines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guard: Option<Vec<String>>,

    /// Rewrite of the matched line; replaces a named template's rewrite
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewrite: Option<String>,

    /// Fixed or nearest
    #[serde(default)]
    pub locate: LocateMode,

    /// Search radius for `nearest`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<usize>,
}

impl PatchPlan {
    /// Read and parse a plan file, format chosen by extension
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PlanError> {
        let path = path.as_ref();
        let format = PlanFormat::from_path(path)?;
        let text = std::fs::read_to_string(path).map_err(|source| PlanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let plan = format.parse(&text)?;
        tracing::debug!(plan = %path.display(), targets = plan.targets.len(), "loaded plan");
        Ok(plan)
    }

    /// Target file resolved against the directory holding the plan
    #[must_use]
    pub fn file_relative_to(&self, plan_path: &Path) -> Option<PathBuf> {
        let file = self.file.as_ref()?;
        if file.is_absolute() {
            return Some(file.clone());
        }
        let base = plan_path.parent().unwrap_or_else(|| Path::new(""));
        Some(base.join(file))
    }

    /// Expand entries into patch targets with 0-based indices
    ///
    /// # Errors
    /// Returns error for missing lines, patterns or guards, unknown
    /// templates, or an invalid `index_base`
    pub fn targets(&self) -> Result<Vec<PatchTarget>, PlanError> {
        if self.index_base > 1 {
            return Err(PlanError::InvalidIndexBase(self.index_base));
        }

        let templates: BTreeMap<&str, Arc<GuardTemplate>> = self
            .templates
            .iter()
            .map(|(name, spec)| (name.as_str(), Arc::new(spec.to_template())))
            .collect();

        let mut out = Vec::new();
        for (position, spec) in self.targets.iter().enumerate() {
            let (template, default_expect) = match (&spec.template, &spec.guard) {
                (Some(_), Some(_)) => return Err(PlanError::ConflictingGuard { target: position }),
                (Some(name), None) => {
                    let template = templates.get(name.as_str()).ok_or_else(|| {
                        PlanError::UnknownTemplate {
                            target: position,
                            name: name.clone(),
                        }
                    })?;
                    let template = match &spec.rewrite {
                        Some(rewrite) => {
                            Arc::new(GuardTemplate::clone(template).with_rewrite(rewrite.clone()))
                        }
                        None => Arc::clone(template),
                    };
                    (template, self.templates[name].expect.as_deref())
                }
                (None, Some(guard)) => {
                    let mut template = GuardTemplate::new(guard.iter().cloned());
                    if let Some(rewrite) = &spec.rewrite {
                        template = template.with_rewrite(rewrite.clone());
                    }
                    (Arc::new(template), None)
                }
                (None, None) => return Err(PlanError::MissingGuard { target: position }),
            };

            let expected = spec
                .expect
                .as_deref()
                .or(default_expect)
                .ok_or(PlanError::MissingPattern { target: position })?;

            let lines: Vec<usize> = spec.line.into_iter().chain(spec.lines.iter().copied()).collect();
            if lines.is_empty() {
                return Err(PlanError::MissingLine { target: position });
            }

            for number in lines {
                let index = number
                    .checked_sub(usize::from(self.index_base))
                    .ok_or(PlanError::ZeroLine { target: position })?;
                let locator = match spec.locate {
                    LocateMode::Fixed => Locator::Line(index),
                    LocateMode::Nearest => Locator::Nearest {
                        hint: index,
                        radius: spec.radius.unwrap_or(DEFAULT_RADIUS),
                    },
                };

                let mut builder = PatchTarget::builder()
                    .locator(locator)
                    .expect(expected)
                    .template(Arc::clone(&template));
                if let Some(name) = &spec.name {
                    builder = builder.label(name.clone());
                }
                let expanded = out.len();
                out.push(builder.build().map_err(|err| reposition(err, expanded))?);
            }
        }
        Ok(out)
    }

    /// Build a patcher honoring the plan's mismatch policy
    ///
    /// # Errors
    /// Same as [`PatchPlan::targets`]
    pub fn patcher(&self) -> Result<Patcher, PlanError> {
        Ok(Patcher::new(self.targets()?)?.with_policy(self.on_mismatch))
    }
}

impl TemplateSpec {
    fn to_template(&self) -> GuardTemplate {
        let template = GuardTemplate::new(self.guard.iter().cloned());
        match &self.rewrite {
            Some(rewrite) => template.with_rewrite(rewrite.clone()),
            None => template,
        }
    }
}

/// Builder errors always say target 0; point them at the expanded position
fn reposition(err: guardpatch_core::PatchError, position: usize) -> guardpatch_core::PatchError {
    use guardpatch_core::PatchError;
    match err {
        PatchError::MissingLocator { .. } => PatchError::MissingLocator { target: position },
        PatchError::EmptyPattern { .. } => PatchError::EmptyPattern { target: position },
        PatchError::EmptyGuard { .. } => PatchError::EmptyGuard { target: position },
        other => other,
    }
}
