//! S5 "checkpoint then resume": a partially-ingested subsequence count and
//! a partially-accumulated n-gram model must survive a write/read cycle
//! byte-for-byte, across the `mum-subsequence` and `mum-checkpoint`
//! boundary.

use mum_checkpoint::{resume, write, Checkpoint};
use mum_ngram::accumulate;
use mum_subsequence::{CountConfig, SubsequenceCounter};

fn config() -> CountConfig {
    CountConfig {
        min_len: 2,
        max_len: 6,
        max_subseq_len: 6,
        min_frequency: 1,
        sample_rate: 1.0,
        prune_interval: 1_000,
        max_entries: 10_000,
        prune_threshold_start: 1,
    }
}

#[test]
fn checkpoint_preserves_populated_counts_and_ngrams_across_a_write_read_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checkpoint.json");

    let mut counter = SubsequenceCounter::new(config()).unwrap();
    counter.ingest_sequence(b"the quick brown fox");
    counter.ingest_sequence(b"the quick brown dog");
    let count_before = counter.table.get(b"the ");

    let model = accumulate(vec![b"the quick brown fox".to_vec(), b"the quick brown dog".to_vec()], vec![], 3).unwrap();
    let contexts_before = model.ngrams[1].contexts.len();

    let checkpoint = Checkpoint::new("s5_dataset", "s5_model", counter.state.clone(), counter.config.clone(), counter.table.clone(), model);
    write(&path, &checkpoint).unwrap();

    let resumed = resume(&path, "s5_dataset", "s5_model").unwrap();

    assert_eq!(resumed.state.sequences_consumed, counter.state.sequences_consumed);
    assert_eq!(resumed.state.bytes_consumed, counter.state.bytes_consumed);
    assert_eq!(resumed.subsequence_counts.get(b"the "), count_before);
    assert_eq!(resumed.partial_model.ngrams[1].contexts.len(), contexts_before);
    assert!(resumed.partial_model.vocab_is_consistent());
}

#[test]
fn resume_with_wrong_identity_is_rejected_before_any_ingestion_resumes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("checkpoint.json");

    let mut counter = SubsequenceCounter::new(config()).unwrap();
    counter.ingest_sequence(b"the quick brown fox");
    let model = accumulate(vec![b"the quick brown fox".to_vec()], vec![], 2).unwrap();
    let checkpoint = Checkpoint::new("s5_dataset", "s5_model", counter.state, counter.config, counter.table, model);
    write(&path, &checkpoint).unwrap();

    assert!(resume(&path, "s5_dataset", "different_model").is_err());
}
