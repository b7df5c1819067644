//! Error types for guardpatch-io
//!
//! Provides error handling for:
//! - Plan loading and resolution (plan file → targets)
//! - File ingress and egress (source file ↔ document)
//! - Patch sessions combining both

use guardpatch_core::PatchError;
use std::path::PathBuf;

/// Errors while loading or resolving a plan
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// IO error during plan read
    #[error("io error reading plan {path}: {source}")]
    Io {
        /// Plan file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Extension does not name a supported format
    #[error("unsupported plan format: '{0}' (expected toml, yaml, yml or json)")]
    UnknownFormat(PathBuf),

    /// TOML syntax or shape error
    #[error("invalid TOML plan: {0}")]
    Toml(#[from] toml::de::Error),

    /// YAML syntax or shape error
    #[error("invalid YAML plan: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON syntax or shape error
    #[error("invalid JSON plan: {0}")]
    Json(#[from] serde_json::Error),

    /// `index_base` is neither 0 nor 1
    #[error("index_base must be 0 or 1, got {0}")]
    InvalidIndexBase(u8),

    /// Target names neither `line` nor `lines`
    #[error("target {target} has no line")]
    MissingLine {
        /// Position of the target entry in the plan
        target: usize,
    },

    /// Line 0 under a 1-based plan
    #[error("target {target} uses line 0 but the plan is 1-based")]
    ZeroLine {
        /// Position of the target entry in the plan
        target: usize,
    },

    /// Neither the target nor its template gives a pattern
    #[error("target {target} has no expected pattern")]
    MissingPattern {
        /// Position of the target entry in the plan
        target: usize,
    },

    /// Target references an undefined template
    #[error("target {target} references unknown template '{name}'")]
    UnknownTemplate {
        /// Position of the target entry in the plan
        target: usize,
        /// Referenced name
        name: String,
    },

    /// Target has neither a template nor inline guard lines
    #[error("target {target} has no guard")]
    MissingGuard {
        /// Position of the target entry in the plan
        target: usize,
    },

    /// Target has both a template and inline guard lines
    #[error("target {target} sets both a template and an inline guard")]
    ConflictingGuard {
        /// Position of the target entry in the plan
        target: usize,
    },

    /// Resolved targets failed validation
    #[error("invalid target: {0}")]
    Patch(#[from] PatchError),
}

/// Errors reading or writing source files
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Read failed (missing file, permissions, invalid UTF-8)
    #[error("io error reading {path}: {source}")]
    Read {
        /// Source file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Write failed
    #[error("io error writing {path}: {source}")]
    Write {
        /// Source file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the configured limit
    #[error("file too large: {path} is {size} bytes (max: {max})")]
    TooLarge {
        /// Source file
        path: PathBuf,
        /// Actual size
        size: u64,
        /// Configured limit
        max: u64,
    },
}

impl IoError {
    /// Create read error for path
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create write error for path
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

/// Errors during a read → patch → write session
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// File ingress or egress failed
    #[error(transparent)]
    Io(#[from] IoError),

    /// Patch run was rejected
    #[error("patch failed: {0}")]
    Patch(#[from] PatchError),
}
