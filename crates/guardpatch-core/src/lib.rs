//! guardpatch core
//!
//! Pattern-anchored, position-indexed, indentation-preserving guard
//! insertion over in-memory documents. No I/O happens here.
//!
//! # Core Concepts
//!
//! - [`Document`]: the file under patch as an ordered list of lines
//! - [`PatchTarget`]: a line position, the literal text expected on it, and
//!   the [`GuardTemplate`] to insert before it
//! - [`Patcher`]: resolves targets against the original document and expands
//!   the matched lines, reporting a [`PatchOutcome`] per target
//!
//! # Example
//!
//! ```rust
//! use guardpatch_core::{apply, Document, GuardTemplate, PatchTarget};
//! use std::sync::Arc;
//!
//! let guard = Arc::new(GuardTemplate::new(["if v == nil {", "\treturn errNil", "}"]));
//! let doc = Document::from_text("func f() {\n\tif v.Ok() {\n");
//! let (patched, applied) = apply(doc, &[PatchTarget::at(1, "if v.Ok() {", guard)]);
//!
//! assert_eq!(applied, 1);
//! assert_eq!(
//!     patched.to_text(),
//!     "func f() {\n\tif v == nil {\n\t\treturn errNil\n\t}\n\tif v.Ok() {\n"
//! );
//! ```

#![warn(unreachable_pub)]

mod document;
mod error;
mod hash;
mod patcher;
mod target;
mod template;

pub use document::{body, indentation, terminator, Document};
pub use error::PatchError;
pub use hash::ContentHash;
pub use patcher::{apply, MismatchPolicy, PatchOutcome, PatchReport, Patcher, TargetReport};
pub use target::{Locator, PatchTarget, PatchTargetBuilder};
pub use template::GuardTemplate;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
