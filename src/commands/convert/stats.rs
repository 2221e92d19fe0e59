use tracing::info;

use crate::model::{ConvertCounts, PairStatistics};

use super::rows::SpanCounts;

pub(super) fn tally_row(stats: PairStatistics, counts: &SpanCounts) -> PairStatistics {
    PairStatistics {
        rows: stats.rows + 1,
        no_error: stats.no_error + usize::from(counts.no_error),
        missing: stats.missing + counts.missing,
        major: stats.major + counts.major,
        minor: stats.minor + counts.minor,
        ..stats
    }
}

/// Folds one finished language pair into the run-wide counters.
pub(super) fn merge_pair(
    counts: ConvertCounts,
    stats: &PairStatistics,
    invalid_span_skips: usize,
) -> ConvertCounts {
    ConvertCounts {
        rows_written: counts.rows_written + stats.rows,
        skip_datum_with_invalid_span: counts.skip_datum_with_invalid_span + invalid_span_skips,
        num_skipped_valid_signatures: counts.num_skipped_valid_signatures
            + stats.skipped_signatures(),
        ..counts
    }
}

pub(super) fn log_pair_statistics(stats: &PairStatistics) {
    info!(
        langs = %stats.langs,
        rows = stats.rows,
        valid_signatures = stats.valid_signatures,
        "language pair converted"
    );
    for (bucket, count) in [
        ("no-error", stats.no_error),
        ("missing", stats.missing),
        ("major", stats.major),
        ("minor", stats.minor),
    ] {
        info!(langs = %stats.langs, bucket, count, "severity bucket");
    }
}

pub(super) fn log_run_counts(counts: &ConvertCounts) {
    info!(
        records_read = counts.records_read,
        rows_written = counts.rows_written,
        target_segment_empty = counts.target_segment_empty,
        skip_datum_with_invalid_span = counts.skip_datum_with_invalid_span,
        num_skipped_valid_signatures = counts.num_skipped_valid_signatures,
        "conversion counters"
    );
}
