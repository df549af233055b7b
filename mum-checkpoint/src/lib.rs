//! C6: resumable checkpointer for interrupted training runs (spec §4.6).

pub mod checkpoint;
pub mod error;
pub mod io;

pub use checkpoint::{Checkpoint, FlushSchedule, CHECKPOINT_VERSION};
pub use error::{CheckpointError, CheckpointResult};
pub use io::{delete_if_present, read, resume, write};
