//! Atomic persistence (spec §4.6 "Failure semantics: crash at any point
//! leaves either the old checkpoint or a complete new one, never a
//! half-written file"): write to a sibling temp file, then rename.

use std::path::Path;

use tracing::debug;

use mum_types::CoreError;

use crate::checkpoint::Checkpoint;
use crate::error::{CheckpointError, CheckpointResult};

pub fn write(path: &Path, checkpoint: &Checkpoint) -> CheckpointResult<()> {
    let json = serde_json::to_string_pretty(checkpoint)?;
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())
        .map_err(|e| CoreError::io("write checkpoint temp file", &tmp_path, e))?;
    std::fs::rename(&tmp_path, path)
        .map_err(|e| CoreError::io("rename checkpoint into place", path, e))?;
    debug!(path = %path.display(), "checkpoint flushed");
    Ok(())
}

pub fn read(path: &Path) -> CheckpointResult<Checkpoint> {
    if !path.exists() {
        return Err(CheckpointError::NotFound(path.display().to_string()));
    }
    let bytes =
        std::fs::read(path).map_err(|e| CoreError::io("read checkpoint", path, e))?;
    let checkpoint: Checkpoint = serde_json::from_slice(&bytes)?;
    if checkpoint.version != crate::checkpoint::CHECKPOINT_VERSION {
        return Err(CheckpointError::UnsupportedVersion {
            found: checkpoint.version,
            expected: crate::checkpoint::CHECKPOINT_VERSION,
        });
    }
    Ok(checkpoint)
}

/// Validates that a loaded checkpoint resumes the run it claims to, then
/// hands it back (spec §4.6 "Resume validation").
pub fn resume(path: &Path, dataset_id: &str, model_id: &str) -> CheckpointResult<Checkpoint> {
    let checkpoint = read(path)?;
    if checkpoint.dataset_id != dataset_id {
        return Err(CheckpointError::DatasetMismatch {
            found: checkpoint.dataset_id,
            expected: dataset_id.to_string(),
        });
    }
    if checkpoint.model_id != model_id {
        return Err(CheckpointError::ModelMismatch {
            found: checkpoint.model_id,
            expected: model_id.to_string(),
        });
    }
    Ok(checkpoint)
}

/// Spec §4.6: a checkpoint is deleted once its run exports successfully,
/// so a later resume attempt does not replay completed work.
pub fn delete_if_present(path: &Path) -> CheckpointResult<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CoreError::io("delete checkpoint", path, e).into()),
    }
}
