use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use crate::cli::ConvertArgs;
use crate::commands::references::ReferenceStore;
use crate::model::{ConvertPaths, ConvertRunManifest};
use crate::util::{now_utc_string, sha256_file, utc_compact_string, write_json_pretty};

use super::baseline::{RandomSpanGenerator, random_baseline_rows};
use super::ingest::{group_records, read_records};
use super::output::write_tsv;
use super::pipeline::{ConversionOutcome, convert_groups};
use super::stats::log_run_counts;

pub fn run(args: ConvertArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("convert-{}", utc_compact_string(started_ts));

    info!(
        run_id = %run_id,
        input = %args.input.display(),
        filter_invalid_spans = args.filter_invalid_spans,
        seed = args.seed,
        "starting conversion"
    );

    let mut generator = args
        .random_baseline_output
        .as_ref()
        .map(|_| RandomSpanGenerator::new(args.seed));

    let store = ReferenceStore::open_read_only(&args.reference_db)?;
    let outcome = convert_file(&args.input, &store, args.filter_invalid_spans)?;
    drop(store);

    log_run_counts(&outcome.counts);

    write_tsv(&args.output, &outcome.rows)?;
    info!(path = %args.output.display(), rows = outcome.rows.len(), "wrote tsv");

    if let (Some(path), Some(generator)) = (&args.random_baseline_output, generator.as_mut()) {
        let baseline = random_baseline_rows(&outcome.rows, generator);
        write_tsv(path, &baseline)?;
        info!(path = %path.display(), rows = baseline.len(), "wrote random-span baseline");
    }

    if let Some(manifest_path) = &args.manifest_path {
        let manifest = ConvertRunManifest {
            manifest_version: 1,
            run_id,
            status: "completed".to_string(),
            started_at,
            updated_at: now_utc_string(),
            input_sha256: sha256_file(&args.input)?,
            filter_invalid_spans: args.filter_invalid_spans,
            seed: args.seed,
            paths: ConvertPaths {
                input_path: args.input.display().to_string(),
                output_path: args.output.display().to_string(),
                reference_db_path: args.reference_db.display().to_string(),
                random_baseline_path: args
                    .random_baseline_output
                    .as_ref()
                    .map(|path| path.display().to_string()),
            },
            counts: outcome.counts,
            language_pairs: outcome.pair_stats,
            unsupported_pairs: outcome.unsupported_pairs,
        };
        write_json_pretty(manifest_path, &manifest)?;
        info!(path = %manifest_path.display(), "wrote run manifest");
    }

    Ok(())
}

pub(super) fn convert_file(
    input: &Path,
    store: &ReferenceStore,
    filter_invalid_spans: bool,
) -> Result<ConversionOutcome> {
    let records = read_records(input)?;
    let ingest = group_records(records)
        .with_context(|| format!("invalid annotation record in {}", input.display()))?;
    convert_groups(&ingest, store, filter_invalid_spans)
        .with_context(|| format!("failed to convert {}", input.display()))
}
