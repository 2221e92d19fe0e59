use std::fs;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::StatusArgs;
use crate::commands::references::ReferenceStore;
use crate::langs::SUPPORTED_PAIRS;
use crate::model::ConvertRunManifest;

pub fn run(args: StatusArgs) -> Result<()> {
    info!(reference_db = %args.reference_db.display(), "status requested");

    if args.reference_db.exists() {
        let store = ReferenceStore::open_read_only(&args.reference_db)?;
        let counts = store.corpus_counts()?;

        for pair in SUPPORTED_PAIRS {
            match counts.iter().find(|(code, _, _)| code == pair.corpus_code()) {
                Some((code, entries, bad_sources)) => info!(
                    langs = %pair,
                    corpus_code = %code,
                    entries,
                    bad_sources,
                    "reference corpus loaded"
                ),
                None => warn!(
                    langs = %pair,
                    corpus_code = pair.corpus_code(),
                    "reference corpus missing"
                ),
            }
        }
    } else {
        warn!(path = %args.reference_db.display(), "reference store missing");
    }

    let Some(manifest_path) = &args.manifest_path else {
        return Ok(());
    };

    if manifest_path.exists() {
        let raw = fs::read(manifest_path)
            .with_context(|| format!("failed to read {}", manifest_path.display()))?;
        let manifest: ConvertRunManifest = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse {}", manifest_path.display()))?;

        info!(
            run_id = %manifest.run_id,
            status = %manifest.status,
            started_at = %manifest.started_at,
            updated_at = %manifest.updated_at,
            input = %manifest.paths.input_path,
            input_sha256 = %manifest.input_sha256,
            filter_invalid_spans = manifest.filter_invalid_spans,
            seed = manifest.seed,
            rows_written = manifest.counts.rows_written,
            target_segment_empty = manifest.counts.target_segment_empty,
            skip_datum_with_invalid_span = manifest.counts.skip_datum_with_invalid_span,
            num_skipped_valid_signatures = manifest.counts.num_skipped_valid_signatures,
            "loaded conversion manifest"
        );
        for stats in &manifest.language_pairs {
            info!(
                langs = %stats.langs,
                rows = stats.rows,
                valid_signatures = stats.valid_signatures,
                skipped_signatures = stats.skipped_signatures(),
                "language pair summary"
            );
        }
    } else {
        warn!(path = %manifest_path.display(), "conversion manifest missing");
    }

    Ok(())
}
