//! guardpatch I/O layer
//!
//! The boundary between the filesystem and the in-memory patcher.
//!
//! # Core Operations
//!
//! - **Plan**: load a [`PatchPlan`] (TOML, YAML or JSON) and resolve it into
//!   validated targets
//! - **Ingress**: read a source file into a [`Document`](guardpatch_core::Document)
//! - **Egress**: write the patched document back atomically
//!
//! ```text
//! plan file → PatchPlan → Patcher
//!                            ↓
//! source file → Document → apply → Document' → source file
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use guardpatch_io::{FileGateway, PatchOptions, PatchPlan};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let plan = PatchPlan::load("fixes/basis.toml")?;
//! let patcher = plan.patcher()?;
//! let report = FileGateway::new().patch_file("calc.go", &patcher, PatchOptions::default())?;
//! println!("Applied {} of {} guard patches", report.applied(), report.report.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod formats;
pub mod gateway;
pub mod plan;

pub use error::{IoError, PlanError, SessionError};
pub use formats::PlanFormat;
pub use gateway::{FileGateway, FileReport, PatchOptions, SourceFile};
pub use plan::{LocateMode, PatchPlan, TargetSpec, TemplateSpec};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
