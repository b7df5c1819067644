//! Testing utilities for guardpatch workspace
//!
//! Shared test helpers, fixtures, and plan builders.

#![allow(missing_docs)]

use guardpatch_core::{GuardTemplate, PatchTarget};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const BASIS_PATTERN: &str =
    "if basis = argsList.Back().Value.(formulaArg).ToNumber(); basis.Type != ArgNumber {";

pub const BASIS_REWRITE: &str = "if basis = basisArg.ToNumber(); basis.Type != ArgNumber {";

pub const BASIS_GUARD: [&str; 4] = [
    "basisArg := argsList.Back().Value.(formulaArg)",
    "if isLiteralEmptyString(basisArg) {",
    "\treturn newErrorFormulaArg(formulaErrorNUM, formulaErrorNUM)",
    "}",
];

pub fn basis_template() -> Arc<GuardTemplate> {
    Arc::new(GuardTemplate::new(BASIS_GUARD).with_rewrite(BASIS_REWRITE))
}

pub fn simple_guard() -> Arc<GuardTemplate> {
    Arc::new(GuardTemplate::new(["if guard() {", "\treturn", "}"]))
}

pub fn target_at(line: usize, pattern: &str) -> PatchTarget {
    PatchTarget::at(line, pattern, simple_guard())
}

/// Go-like source with `functions` financial functions, each carrying one
/// basis check; returns the text and the 0-based index of every check
pub fn go_source_with_basis_checks(functions: usize) -> (String, Vec<usize>) {
    let mut text = String::from("package excelize\n\n");
    let mut line = 2;
    let mut checks = Vec::with_capacity(functions);

    for n in 0..functions {
        let _ = writeln!(text, "func (fn *formulaFuncs) FIN{n}(argsList *list.List) formulaArg {{");
        text.push_str("\tbasis := newNumberFormulaArg(0)\n");
        text.push_str("\tif argsList.Len() == 4 {\n");
        let _ = writeln!(text, "\t\t{BASIS_PATTERN}");
        text.push_str("\t\t\treturn newErrorFormulaArg(formulaErrorNUM, formulaErrorNUM)\n");
        text.push_str("\t\t}\n");
        text.push_str("\t}\n");
        text.push_str("\treturn basis\n");
        text.push_str("}\n\n");
        checks.push(line + 3);
        line += 10;
    }
    (text, checks)
}

/// TOML plan patching `lines` of `file` with the basis guard
pub fn basis_plan_toml(file: Option<&str>, lines: &[usize]) -> String {
    let mut plan = String::new();
    if let Some(file) = file {
        let _ = writeln!(plan, "file = {file:?}");
    }
    let _ = writeln!(plan, "\n[templates.basis]");
    let _ = writeln!(plan, "expect = {BASIS_PATTERN:?}");
    plan.push_str("guard = [\n");
    for line in BASIS_GUARD {
        let _ = writeln!(plan, "  {line:?},");
    }
    plan.push_str("]\n");
    let _ = writeln!(plan, "rewrite = {BASIS_REWRITE:?}");

    let list: Vec<String> = lines.iter().map(ToString::to_string).collect();
    let _ = writeln!(plan, "\n[[targets]]\nname = \"basis\"\nlines = [{}]\ntemplate = \"basis\"", list.join(", "));
    plan
}

pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

pub fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}
