//! Wires the exported model and C3 together behind the `mum-generate`
//! binary (spec §6).

use mum_generate::GenOpts;
use mum_types::{CoreError, Model};

use crate::config::GenerateArgs;
use crate::error::MumResult;

pub fn run(args: &GenerateArgs) -> MumResult<()> {
    let bytes = std::fs::read(&args.model)
        .map_err(|e| CoreError::io("read model file", &args.model, e))?;
    let exported = mum_export::from_json(
        std::str::from_utf8(&bytes)
            .map_err(|_| CoreError::Format("model.json is not valid utf-8".to_string()))?,
    )?;
    let model: Model = mum_export::to_model(exported)?;

    let opts = GenOpts {
        max_tokens: args.max_tokens,
        temperature: args.temperature,
        top_k: args.top_k,
        repetition_penalty: args.repetition_penalty,
        budget_ms: args.budget_ms,
        seed: args.seed,
        ..GenOpts::default()
    };

    let result = mum_generate::generate(args.prompt.as_bytes(), &model, &opts)?;

    use std::io::Write;
    std::io::stdout()
        .write_all(&result.bytes)
        .map_err(|e| CoreError::io("write generated bytes to stdout", "<stdout>", e))?;

    if result.timed_out {
        eprintln!("\n[mum-generate] stopped: budget exhausted");
    }
    Ok(())
}
