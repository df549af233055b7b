//! CLI flag surface (spec §6): a thin `clap` derive layer. Flags are
//! forwarded essentially as-is into the library crates' config structs;
//! no training/generation logic lives here.

use std::path::PathBuf;

use clap::Parser;
use mum_types::CoreError;

#[derive(Debug, Parser)]
#[command(name = "mum-train", version, about = "Train a macro-unit model from a byte corpus")]
pub struct TrainArgs {
    /// Path to the input corpus; one training sequence per line.
    #[arg(long)]
    pub input: PathBuf,

    /// Dataset identifier. Derived from `--input` and `--tag` when absent.
    #[arg(long)]
    pub dataset_id: Option<String>,

    /// Model identifier. Derived from training parameters when absent.
    #[arg(long)]
    pub model_id: Option<String>,

    /// Free-form tag folded into the derived dataset/model ids.
    #[arg(long, default_value = "default")]
    pub tag: String,

    #[arg(long)]
    pub max_records: Option<usize>,

    /// Caps the total bytes read from `--input` across every sequence,
    /// distinct from `--max-bytes-per-record`'s per-sequence cap.
    #[arg(long)]
    pub max_bytes: Option<u64>,

    #[arg(long)]
    pub max_bytes_per_record: Option<usize>,

    #[arg(long, default_value_t = 2)]
    pub min_frequency: u64,

    #[arg(long, default_value_t = 2)]
    pub min_length: u32,

    #[arg(long, default_value_t = 8)]
    pub max_length: u32,

    /// The n-gram order `K` (spec §4.2).
    #[arg(long, default_value_t = 3)]
    pub context_window: u32,

    /// Synonym for `--context-window`; present for contract completeness.
    /// Must equal `--context-window` when both are given.
    #[arg(long)]
    pub max_ngram_order: Option<u32>,

    #[arg(long, default_value_t = 0.0)]
    pub mdl_threshold: f64,

    #[arg(long)]
    pub max_macro_units: Option<usize>,

    #[arg(long, default_value_t = 8)]
    pub max_subsequence_length: u32,

    #[arg(long, default_value_t = 1_000_000)]
    pub max_subsequence_entries: usize,

    #[arg(long, default_value_t = 1.0)]
    pub subsequence_sample_rate: f64,

    #[arg(long, default_value_t = 1)]
    pub subsequence_prune_threshold: u64,

    #[arg(long, default_value_t = 50_000)]
    pub subsequence_prune_interval: u64,

    #[arg(long)]
    pub export_max_orders: Option<u32>,

    #[arg(long)]
    pub export_max_macro_units: Option<usize>,

    #[arg(long, default_value_t = 0)]
    pub export_min_ngram_count: u64,

    /// Export the full model rather than the pruned compact form.
    #[arg(long)]
    pub export_full: bool,

    /// Resume from an existing checkpoint at `--checkpoint-path` if present.
    #[arg(long)]
    pub resume: bool,

    #[arg(long, default_value_t = 5_000)]
    pub checkpoint_every: u64,

    #[arg(long)]
    pub checkpoint_path: Option<PathBuf>,

    /// Overwrite an existing model directory instead of erroring.
    #[arg(long)]
    pub force: bool,

    /// Cache root; defaults to `./cache` (spec §6 directory layout).
    #[arg(long, default_value = "cache")]
    pub cache_root: PathBuf,

    #[arg(long, default_value = "mum")]
    pub engine: String,
}

impl TrainArgs {
    /// Resolves `--context-window`/`--max-ngram-order` to a single order,
    /// enforcing the doc'd contract that they must agree when both are
    /// given.
    pub fn order(&self) -> Result<u32, CoreError> {
        match self.max_ngram_order {
            Some(order) if order != self.context_window => Err(CoreError::Config(format!(
                "--max-ngram-order ({order}) must equal --context-window ({}) when both are given",
                self.context_window
            ))),
            Some(order) => Ok(order),
            None => Ok(self.context_window),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_with(context_window: u32, max_ngram_order: Option<u32>) -> TrainArgs {
        TrainArgs {
            input: PathBuf::from("corpus.txt"),
            dataset_id: None,
            model_id: None,
            tag: "default".to_string(),
            max_records: None,
            max_bytes: None,
            max_bytes_per_record: None,
            min_frequency: 2,
            min_length: 2,
            max_length: 8,
            context_window,
            max_ngram_order,
            mdl_threshold: 0.0,
            max_macro_units: None,
            max_subsequence_length: 8,
            max_subsequence_entries: 1_000_000,
            subsequence_sample_rate: 1.0,
            subsequence_prune_threshold: 1,
            subsequence_prune_interval: 50_000,
            export_max_orders: None,
            export_max_macro_units: None,
            export_min_ngram_count: 0,
            export_full: false,
            resume: false,
            checkpoint_every: 5_000,
            checkpoint_path: None,
            force: false,
            cache_root: PathBuf::from("cache"),
            engine: "mum".to_string(),
        }
    }

    #[test]
    fn order_defaults_to_context_window_when_max_ngram_order_absent() {
        assert_eq!(args_with(3, None).order().unwrap(), 3);
    }

    #[test]
    fn order_accepts_agreeing_max_ngram_order() {
        assert_eq!(args_with(3, Some(3)).order().unwrap(), 3);
    }

    #[test]
    fn order_rejects_disagreeing_max_ngram_order() {
        assert!(args_with(3, Some(4)).order().is_err());
    }
}

#[derive(Debug, Parser)]
#[command(name = "mum-generate", version, about = "Sample bytes from a trained macro-unit model")]
pub struct GenerateArgs {
    /// Path to a trained `model.json` (spec §4.5 export format).
    #[arg(long)]
    pub model: PathBuf,

    #[arg(long, default_value = "")]
    pub prompt: String,

    #[arg(long, default_value_t = 256)]
    pub max_tokens: usize,

    #[arg(long, default_value_t = 1.0)]
    pub temperature: f64,

    #[arg(long, default_value_t = 0)]
    pub top_k: usize,

    #[arg(long, default_value_t = 1.0)]
    pub repetition_penalty: f64,

    #[arg(long)]
    pub budget_ms: Option<u64>,

    #[arg(long)]
    pub seed: Option<u64>,
}
