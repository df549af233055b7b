//! C2: variable-order smoothed n-gram model over the mixed vocabulary
//! (spec §4.2).

pub mod accumulate;
pub mod encode;
pub mod error;
pub mod smoothing;

pub use accumulate::accumulate;
pub use encode::{DictionaryEncoder, Encoder};
pub use error::{NgramError, NgramResult};
pub use smoothing::{next_token_distribution, perplexity, KneserNeySmoother, DEFAULT_DISCOUNT};
