//! C1: streaming subsequence counter and MDL macro-unit selector (spec §4.1).

pub mod config;
pub mod counter;
pub mod error;
pub mod select;
pub mod table;

pub use config::{CountConfig, SelectConfig};
pub use counter::{ingest, CounterState, StreamState, SubsequenceCounter};
pub use error::{SubsequenceError, SubsequenceResult};
pub use select::select_macro_units;
pub use table::SubsequenceTable;
