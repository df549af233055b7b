//! Top-level error aggregation (spec §7), following the teacher's
//! `HfError`/`LlmModelsError` layering: a thin `#[error(transparent)]`
//! wrapper per collaborator crate, converted to `anyhow` at the binary
//! boundary since the CLI only needs to print and set an exit code.

use mum_types::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum MumError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Subsequence(#[from] mum_subsequence::SubsequenceError),

    #[error(transparent)]
    Ngram(#[from] mum_ngram::NgramError),

    #[error(transparent)]
    Generate(#[from] mum_generate::GenerateError),

    #[error(transparent)]
    Fact(#[from] mum_facts::FactError),

    #[error(transparent)]
    Export(#[from] mum_export::ExportError),

    #[error(transparent)]
    Checkpoint(#[from] mum_checkpoint::CheckpointError),
}

pub type MumResult<T> = std::result::Result<T, MumError>;
