//! Model export/import (spec §4.5): deterministic pruning and a compact,
//! human-readable on-disk JSON format.

pub mod error;
pub mod export;
pub mod format;

pub use error::{ExportError, ExportResult};
pub use export::{export, from_json, to_json, to_model, ExportCaps, ExportFormat};
pub use format::{ExportedModel, ExportedNgramTable, FORMAT_VERSION};
