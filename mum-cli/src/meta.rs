//! `meta.json`/`latest.json` writers (spec §6 "File formats at boundary").

use std::path::Path;

use serde_json::{json, Value};

use crate::error::MumResult;
use mum_types::CoreError;

pub struct TrainingMeta {
    pub engine: String,
    pub dataset_id: String,
    pub model_id: String,
    pub trained_at: chrono::DateTime<chrono::Utc>,
    pub duration_ms: u64,
    pub training: Value,
    pub export: Value,
    pub stats: Value,
    pub compression_ratio: f64,
    pub avg_perplexity: f64,
    pub artifacts: Value,
    pub sequence_count: u64,
    pub total_bytes: u64,
}

impl TrainingMeta {
    pub fn to_json(&self) -> Value {
        json!({
            "engine": self.engine,
            "datasetId": self.dataset_id,
            "modelId": self.model_id,
            "trainedAt": self.trained_at.to_rfc3339(),
            "durationMs": self.duration_ms,
            "training": self.training,
            "export": self.export,
            "stats": self.stats,
            "metrics": {
                "compressionRatio": self.compression_ratio,
                "avgPerplexity": self.avg_perplexity,
            },
            "artifacts": self.artifacts,
            "sequences": {
                "count": self.sequence_count,
                "totalBytes": self.total_bytes,
            },
        })
    }
}

pub fn write_json(path: &Path, value: &Value) -> MumResult<()> {
    let body = serde_json::to_string_pretty(value).expect("Value is always serializable");
    write_json_str(path, &body)
}

pub fn write_json_str(path: &Path, body: &str) -> MumResult<()> {
    std::fs::write(path, body).map_err(|e| CoreError::io("write json artifact", path, e))?;
    Ok(())
}

/// `latest.json` (spec §6): `{modelId | datasetId, updatedAt}`.
pub fn write_latest_pointer(path: &Path, key: &str, value: &str) -> MumResult<()> {
    let body = json!({
        key: value,
        "updatedAt": chrono::Utc::now().to_rfc3339(),
    });
    write_json(path, &body)
}
