//! Write-to-temp-then-rename, shared by every artifact writer (spec §4.10,
//! §9: "contract-validated writes"). A write either lands whole or not at
//! all; no reader ever observes a partially written artifact.

use std::fs;
use std::io::Write;
use std::path::Path;

use sensor_core::errors::{SensorError, SensorResult};

/// Writes `contents` to `path` atomically: write to `<path>.tmp` in the same
/// directory, `fsync`, then `rename` over `path`. The rename is atomic on
/// the same filesystem, which is why the temp file is created as a sibling
/// rather than in a system temp directory.
pub fn write_atomically(path: &Path, contents: &str) -> SensorResult<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|e| SensorError::ContractViolation {
        artifact: path.display().to_string(),
        details: format!("failed to create artifacts directory: {e}"),
    })?;

    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("artifact")
    ));

    let mut file = fs::File::create(&tmp_path).map_err(|e| SensorError::ContractViolation {
        artifact: path.display().to_string(),
        details: format!("failed to create temp file: {e}"),
    })?;
    file.write_all(contents.as_bytes())
        .map_err(|e| SensorError::ContractViolation {
            artifact: path.display().to_string(),
            details: format!("failed to write temp file: {e}"),
        })?;
    file.sync_all().map_err(|e| SensorError::ContractViolation {
        artifact: path.display().to_string(),
        details: format!("failed to fsync temp file: {e}"),
    })?;
    drop(file);

    fs::rename(&tmp_path, path).map_err(|e| SensorError::ContractViolation {
        artifact: path.display().to_string(),
        details: format!("failed to rename temp file into place: {e}"),
    })?;

    Ok(())
}
