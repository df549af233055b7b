//! Wires C1 → C2 → C5 → C6 together behind the `mum-train` binary (spec §6).
//! This module is intentionally thin: every actual algorithm lives in its
//! owning crate; this just sequences calls and writes artefacts.

use std::path::Path;
use std::time::Instant;

use serde_json::json;
use tracing::info;

use mum_checkpoint::{Checkpoint, FlushSchedule};
use mum_export::{ExportCaps, ExportFormat, ExportedModel};
use mum_subsequence::{select_macro_units, CountConfig, SelectConfig, SubsequenceCounter};
use mum_types::{slug, CacheLayout, CoreError};

use crate::config::TrainArgs;
use crate::error::MumResult;
use crate::meta::{write_json, write_json_str, write_latest_pointer, TrainingMeta};

pub fn run(args: &TrainArgs) -> MumResult<()> {
    let start = Instant::now();

    let dataset_id = args.dataset_id.clone().unwrap_or_else(|| {
        slug::derive_id(&[
            ("input", args.input.display().to_string()),
            ("tag", args.tag.clone()),
        ])
    });
    let order = args.order()?;
    let model_id = args.model_id.clone().unwrap_or_else(|| {
        slug::derive_id(&[
            ("k", order.to_string()),
            ("minlen", args.min_length.to_string()),
            ("maxlen", args.max_length.to_string()),
            ("mu", args.max_macro_units.map(|n| n.to_string()).unwrap_or_default()),
        ])
    });

    let layout = CacheLayout::new(&args.cache_root)?;
    let dataset_dir = layout.dataset_dir(&dataset_id)?;
    let model_dir = layout.model_dir(&args.engine, &dataset_id, &model_id)?;

    if model_dir.join("model.json").exists() && !args.force {
        return Err(CoreError::Content(format!(
            "model directory {} already populated; pass --force to overwrite",
            model_dir.as_path().display()
        ))
        .into());
    }

    let count_config = CountConfig {
        min_len: args.min_length,
        max_len: args.max_length,
        max_subseq_len: args.max_subsequence_length,
        min_frequency: args.min_frequency,
        sample_rate: args.subsequence_sample_rate,
        prune_interval: args.subsequence_prune_interval,
        max_entries: args.max_subsequence_entries,
        prune_threshold_start: args.subsequence_prune_threshold,
    };
    let select_config = SelectConfig {
        mdl_threshold: args.mdl_threshold,
        max_macro_units: args.max_macro_units,
    };

    let checkpoint_path = args
        .checkpoint_path
        .clone()
        .unwrap_or_else(|| model_dir.join("checkpoint.json"));

    let (mut counter, already_consumed) = if args.resume && checkpoint_path.exists() {
        let checkpoint = mum_checkpoint::resume(&checkpoint_path, &dataset_id, &model_id)?;
        info!(sequences_consumed = checkpoint.state.sequences_consumed, "resumed from checkpoint");
        let mut counter = SubsequenceCounter::new(checkpoint.subsequence_config)?;
        let already_consumed = checkpoint.state.sequences_consumed as usize;
        counter.table = checkpoint.subsequence_counts;
        counter.state = checkpoint.state;
        (counter, already_consumed)
    } else {
        (SubsequenceCounter::new(count_config.clone())?, 0)
    };

    let sequences = read_sequences(&args.input, args.max_records, args.max_bytes_per_record, args.max_bytes)?;
    let schedule = FlushSchedule::new(args.checkpoint_every);

    // Ingestion order is a deterministic function of `--input` and the
    // record-selection flags (spec §5 "Ordering guarantees"), so skipping
    // the sequences already folded into the restored counter reproduces
    // train-to-completion exactly instead of double-counting them (spec §8
    // invariant 7, scenario S5).
    for seq in sequences.iter().skip(already_consumed) {
        counter.ingest_sequence(seq);
        if schedule.should_flush(counter.state.sequences_consumed) {
            // C2 has not run yet at this point in the pipeline (it runs
            // once, after MDL selection fixes the dictionary), so every
            // checkpoint flushed during C1 carries an empty partial model —
            // see the field doc on `Checkpoint::partial_model`.
            let checkpoint = Checkpoint::new(
                dataset_id.clone(),
                model_id.clone(),
                counter.state.clone(),
                counter.config.clone(),
                counter.table.clone(),
                mum_types::Model::empty(order),
            );
            mum_checkpoint::write(&checkpoint_path, &checkpoint)?;
        }
    }
    counter.finalize();

    let total_bytes: u64 = sequences.iter().map(|s| s.len() as u64).sum();
    let macro_units = select_macro_units(&mut counter, &select_config)?;

    let model = mum_ngram::accumulate(sequences.iter().cloned(), macro_units, order)?;

    let finite_perplexities: Vec<f64> = sequences
        .iter()
        .map(|seq| mum_ngram::perplexity(seq, &model))
        .filter(|p| p.is_finite())
        .collect();
    let avg_perplexity = if finite_perplexities.is_empty() {
        f64::INFINITY
    } else {
        finite_perplexities.iter().sum::<f64>() / finite_perplexities.len() as f64
    };

    let export_format = if args.export_full {
        ExportFormat::Full
    } else {
        ExportFormat::Compact {
            min_count: args.export_min_ngram_count,
        }
    };
    let export_caps = ExportCaps {
        max_macro_units: args.export_max_macro_units,
        max_orders: args.export_max_orders,
    };
    let exported: ExportedModel = mum_export::export(&model, export_format, export_caps);
    let model_json = mum_export::to_json(&exported)?;
    write_json_str(&model_dir.join("model.json"), &model_json)?;

    // No fact-extraction component is in scope; an empty array keeps the
    // directory layout contract satisfied for downstream consumers.
    write_json(&model_dir.join("facts.json"), &json!([]))?;

    let compression_ratio = if total_bytes == 0 {
        0.0
    } else {
        model.stats.token_count as f64 / total_bytes as f64
    };

    let meta = TrainingMeta {
        engine: args.engine.clone(),
        dataset_id: dataset_id.clone(),
        model_id: model_id.clone(),
        trained_at: chrono::Utc::now(),
        duration_ms: start.elapsed().as_millis() as u64,
        training: json!({
            "contextWindow": order,
            "mdlThreshold": args.mdl_threshold,
            "minLength": args.min_length,
            "maxLength": args.max_length,
            "minFrequency": args.min_frequency,
        }),
        export: json!({
            "full": args.export_full,
            "minNgramCount": args.export_min_ngram_count,
            "maxOrders": args.export_max_orders,
            "maxMacroUnits": args.export_max_macro_units,
        }),
        stats: serde_json::to_value(&model.stats).expect("Stats always serializes"),
        compression_ratio,
        avg_perplexity,
        artifacts: json!({
            "model": "model.json",
            "meta": "meta.json",
            "facts": "facts.json",
        }),
        sequence_count: model.stats.seq_count,
        total_bytes,
    };
    write_json(&model_dir.join("meta.json"), &meta.to_json())?;

    write_latest_pointer(
        &layout.engine_dataset_dir(&args.engine, &dataset_id)?.join("latest.json"),
        "modelId",
        &model_id,
    )?;
    write_latest_pointer(&dataset_dir.join("latest.json"), "datasetId", &dataset_id)?;

    mum_checkpoint::delete_if_present(&checkpoint_path)?;

    info!(
        dataset_id = %dataset_id,
        model_id = %model_id,
        duration_ms = meta.duration_ms,
        "training run complete"
    );
    Ok(())
}

/// Reads training sequences from `path`, applying (in order) a per-sequence
/// byte cap, a total-corpus byte cap, and a record-count cap. All three are
/// prefix truncations over the same deterministic line order, so applying
/// them in a single pass is equivalent to applying each independently and
/// keeps a single definition of "sequence order" for resume (spec §5).
fn read_sequences(
    path: &Path,
    max_records: Option<usize>,
    max_bytes_per_record: Option<usize>,
    max_bytes: Option<u64>,
) -> MumResult<Vec<Vec<u8>>> {
    let bytes = std::fs::read(path).map_err(|e| CoreError::io("read training input", path, e))?;
    let mut sequences: Vec<Vec<u8>> = Vec::new();
    let mut total_bytes = 0u64;
    for line in bytes.split(|&b| b == b'\n').filter(|line| !line.is_empty()) {
        if let Some(cap) = max_bytes {
            if total_bytes >= cap {
                break;
            }
        }
        let seq = if let Some(cap) = max_bytes_per_record {
            line[..line.len().min(cap)].to_vec()
        } else {
            line.to_vec()
        };
        total_bytes += seq.len() as u64;
        sequences.push(seq);
        if max_records.is_some_and(|max| sequences.len() >= max) {
            break;
        }
    }
    Ok(sequences)
}
