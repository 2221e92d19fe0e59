use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::commands::references::{ReferenceMap, ReferenceStore};
use crate::langs::{LanguagePair, PairSupport, resolve_pair, split_langs};
use crate::model::{ConvertCounts, OutputRow, PairStatistics};

use super::ingest::{IngestOutcome, PairGroups};
use super::rows::{PairLanguages, RecordOutcome, build_row};
use super::stats::{log_pair_statistics, merge_pair, tally_row};

#[derive(Debug, Clone)]
pub(super) struct PairOutcome {
    pub rows: Vec<OutputRow>,
    pub stats: PairStatistics,
    pub invalid_span_skips: usize,
}

#[derive(Debug, Clone, Default)]
pub(super) struct ConversionOutcome {
    pub rows: Vec<OutputRow>,
    pub pair_stats: Vec<PairStatistics>,
    pub counts: ConvertCounts,
    pub unsupported_pairs: Vec<String>,
}

/// Emits at most one row per signature: the first record that joins a reference and passes filtering.
pub(super) fn process_pair(
    pair: &PairGroups,
    references: &ReferenceMap,
    filter_invalid_spans: bool,
) -> Result<PairOutcome> {
    let (source, target) = split_langs(&pair.langs)?;
    let languages = PairLanguages { source, target };

    let mut rows = Vec::new();
    let mut stats = PairStatistics {
        langs: pair.langs.clone(),
        valid_signatures: pair.signature_count(),
        ..PairStatistics::default()
    };
    let mut invalid_span_skips = 0_usize;

    for group in &pair.groups {
        let mut emitted = false;
        for ingested in &group.records {
            let Some(reference) = references.get(&ingested.record.src) else {
                continue;
            };

            match build_row(ingested, reference, &languages, filter_invalid_spans)? {
                RecordOutcome::InvalidSpan => {
                    invalid_span_skips += 1;
                }
                RecordOutcome::Emitted { row, counts } => {
                    stats = tally_row(stats, &counts);
                    rows.push(row);
                    emitted = true;
                    break;
                }
            }
        }

        if !emitted {
            debug!(
                langs = %pair.langs,
                signature = %group.signature,
                records = group.records.len(),
                "no qualifying record for signature"
            );
        }
    }

    Ok(PairOutcome {
        rows,
        stats,
        invalid_span_skips,
    })
}

pub(super) fn convert_groups(
    ingest: &IngestOutcome,
    store: &ReferenceStore,
    filter_invalid_spans: bool,
) -> Result<ConversionOutcome> {
    let mut outcome = ConversionOutcome {
        counts: ConvertCounts {
            records_read: ingest.records_read,
            target_segment_empty: ingest.target_segment_empty,
            ..ConvertCounts::default()
        },
        ..ConversionOutcome::default()
    };

    for pair in &ingest.pairs {
        let language_pair = match resolve_pair(&pair.langs) {
            PairSupport::Supported(language_pair) => language_pair,
            PairSupport::Unsupported => {
                warn!(
                    langs = %pair.langs,
                    signatures = pair.signature_count(),
                    "no reference corpus for language pair; skipping"
                );
                outcome.unsupported_pairs.push(pair.langs.clone());
                continue;
            }
        };

        let references = load_reference_map(store, language_pair)?;
        let pair_outcome = process_pair(pair, &references, filter_invalid_spans)
            .with_context(|| format!("failed to convert language pair {}", pair.langs))?;

        log_pair_statistics(&pair_outcome.stats);
        outcome.counts = merge_pair(
            outcome.counts,
            &pair_outcome.stats,
            pair_outcome.invalid_span_skips,
        );
        outcome.rows.extend(pair_outcome.rows);
        outcome.pair_stats.push(pair_outcome.stats);
    }

    Ok(outcome)
}

fn load_reference_map(store: &ReferenceStore, pair: LanguagePair) -> Result<ReferenceMap> {
    let entries = store
        .entries(pair.corpus_code())
        .with_context(|| format!("failed to load references for {}", pair.corpus_code()))?;
    let total = entries.len();
    let references = ReferenceMap::from_entries(entries);

    if references.is_empty() {
        warn!(langs = %pair, corpus_code = pair.corpus_code(), "reference corpus is empty");
    } else {
        debug!(langs = %pair, entries = total, usable = references.len(), "loaded references");
    }
    Ok(references)
}
