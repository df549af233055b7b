//! C3: bounded generator (spec §4.3).

pub mod error;
pub mod generator;
pub mod options;

pub use error::{GenerateError, GenerateResult};
pub use generator::generate;
pub use options::{GenOpts, GenResult, DEFAULT_REPETITION_WINDOW};
