use std::fs;
use std::path::Path;

use sensor_core::errors::{SensorError, SensorResult};
use sensor_core::models::ClosureRegistry;

/// Reads `closures.json` (spec §6). The file is authored by the external
/// state kernel; this core only ever reads it. A missing file means no
/// loops have ever been closed yet, not a corpus error.
pub fn read_closure_registry(path: &Path) -> SensorResult<ClosureRegistry> {
    if !path.exists() {
        return Ok(ClosureRegistry::empty());
    }

    let text = fs::read_to_string(path).map_err(|e| SensorError::CorpusError {
        reason: format!("failed to read closure registry {}: {e}", path.display()),
    })?;

    serde_json::from_str(&text).map_err(|e| SensorError::CorpusError {
        reason: format!("failed to parse closure registry {}: {e}", path.display()),
    })
}
