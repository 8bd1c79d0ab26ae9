//! CLI command for conformance checks

use std::path::Path;

use crate::generator::compare_outputs;

pub fn execute(generated: &Path, expected: &Path) -> anyhow::Result<()> {
    let mismatches = compare_outputs(generated, expected)?;

    if mismatches.is_empty() {
        println!("Records match");
        return Ok(());
    }

    for mismatch in &mismatches {
        println!("  - {mismatch}");
    }
    anyhow::bail!("{} record(s) differ from {}", mismatches.len(), expected.display());
}
