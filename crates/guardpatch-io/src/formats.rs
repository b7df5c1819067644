//! Plan file formats
//!
//! Plans deserialize through serde from TOML, YAML or JSON, picked by file
//! extension.

use crate::error::PlanError;
use crate::plan::PatchPlan;
use std::path::Path;

/// Supported plan encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanFormat {
    /// `.toml`
    Toml,
    /// `.yaml` / `.yml`
    Yaml,
    /// `.json`
    Json,
}

impl PlanFormat {
    /// Detect format from the path's extension
    ///
    /// # Errors
    /// Returns [`PlanError::UnknownFormat`] for any other extension
    pub fn from_path(path: &Path) -> Result<Self, PlanError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("toml") => Ok(Self::Toml),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(PlanError::UnknownFormat(path.to_path_buf())),
        }
    }

    /// File extensions handled by this format (without dot)
    #[must_use]
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Toml => &["toml"],
            Self::Yaml => &["yaml", "yml"],
            Self::Json => &["json"],
        }
    }

    /// Deserialize a plan
    ///
    /// # Errors
    /// Returns the format's syntax or shape error
    pub fn parse(self, text: &str) -> Result<PatchPlan, PlanError> {
        let plan = match self {
            Self::Toml => toml::from_str(text)?,
            Self::Yaml => serde_yaml::from_str(text)?,
            Self::Json => serde_json::from_str(text)?,
        };
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn detects_by_extension() {
        assert_eq!(PlanFormat::from_path(Path::new("a/plan.toml")).unwrap(), PlanFormat::Toml);
        assert_eq!(PlanFormat::from_path(Path::new("plan.YML")).unwrap(), PlanFormat::Yaml);
        assert_eq!(PlanFormat::from_path(Path::new("plan.json")).unwrap(), PlanFormat::Json);
    }

    #[test]
    fn unknown_extension_is_an_error() {
        let err = PlanFormat::from_path(Path::new("plan.ini")).unwrap_err();
        assert!(matches!(err, PlanError::UnknownFormat(p) if p == PathBuf::from("plan.ini")));
        assert!(PlanFormat::from_path(Path::new("plan")).is_err());
    }

    #[test]
    fn extensions_round_trip_through_detection() {
        for format in [PlanFormat::Toml, PlanFormat::Yaml, PlanFormat::Json] {
            for ext in format.extensions() {
                let path = PathBuf::from(format!("plan.{ext}"));
                assert_eq!(PlanFormat::from_path(&path).unwrap(), format);
            }
        }
    }

    #[test]
    fn same_plan_in_every_format() {
        let toml = "[[targets]]\nline = 3\nexpect = \"if x {\"\nguard = [\"check()\"]\n";
        let yaml = "targets:\n  - line: 3\n    expect: \"if x {\"\n    guard: [\"check()\"]\n";
        let json = r#"{"targets":[{"line":3,"expect":"if x {","guard":["check()"]}]}"#;

        let a = PlanFormat::Toml.parse(toml).unwrap();
        let b = PlanFormat::Yaml.parse(yaml).unwrap();
        let c = PlanFormat::Json.parse(json).unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn syntax_errors_name_their_format() {
        assert!(matches!(PlanFormat::Toml.parse("targets = ["), Err(PlanError::Toml(_))));
        assert!(matches!(PlanFormat::Json.parse("{"), Err(PlanError::Json(_))));
        assert!(matches!(PlanFormat::Yaml.parse("targets: [\n"), Err(PlanError::Yaml(_))));
    }
}
