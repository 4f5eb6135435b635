//! Writes the assembled dataset as the metadata-writer handoff
//! document.
//!
//! The document is JSON: variable name → {attributes, dims, values,
//! coordinates}, plus the unknown-ID diagnostic block. File writes go
//! through a temporary file renamed into place, so a crashed run never
//! leaves a truncated document behind.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use record_assembler::AssembledDataset;

/// Serialize `dataset` to `path`, "-" meaning stdout.
pub fn write_dataset(dataset: &AssembledDataset, path: &str) -> Result<()> {
    if path == "-" {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        serde_json::to_writer_pretty(&mut handle, dataset)?;
        writeln!(handle)?;
        return Ok(());
    }

    let target = Path::new(path);
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temporary file in {}", dir.display()))?;
    serde_json::to_writer_pretty(&mut tmp, dataset)?;
    tmp.write_all(b"\n")?;
    tmp.persist(target)
        .map_err(|e| e.error)
        .with_context(|| format!("renaming into {path}"))?;
    Ok(())
}
