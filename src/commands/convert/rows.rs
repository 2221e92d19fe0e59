use anyhow::{Context, Result};

use crate::model::{OutputRow, Severity};

use super::ingest::IngestedRecord;
use super::spans::{SpanBucket, bucket_span, correct_span, ensure_span_structure, is_invalid_span};

pub(super) const SET_ID: &str = "official";
pub(super) const METHOD: &str = "ESA";
pub(super) const NO_ERROR_INDEX: &str = "-1";
pub(super) const NO_ERROR_TYPE: &str = "no-error";

#[derive(Debug, Clone)]
pub(super) struct PairLanguages {
    pub source: String,
    pub target: String,
}

/// Per-row contribution to the severity buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct SpanCounts {
    pub no_error: bool,
    pub missing: usize,
    pub major: usize,
    pub minor: usize,
}

#[derive(Debug, Clone)]
pub(super) enum RecordOutcome {
    Emitted { row: OutputRow, counts: SpanCounts },
    InvalidSpan,
}

pub(super) fn build_row(
    ingested: &IngestedRecord,
    reference: &str,
    languages: &PairLanguages,
    filter_invalid_spans: bool,
) -> Result<RecordOutcome> {
    let record = &ingested.record;

    let mut start_indices = Vec::with_capacity(record.esa_spans.len());
    let mut end_indices = Vec::with_capacity(record.esa_spans.len());
    let mut error_types = Vec::with_capacity(record.esa_spans.len());
    let mut counts = SpanCounts::default();

    for span in &record.esa_spans {
        ensure_span_structure(span)
            .with_context(|| format!("line {}: malformed error span", ingested.line_number))?;

        if filter_invalid_spans && is_invalid_span(span, &record.tgt) {
            return Ok(RecordOutcome::InvalidSpan);
        }

        let corrected = correct_span(span, &record.tgt);
        match bucket_span(&corrected) {
            SpanBucket::Missing => counts.missing += 1,
            SpanBucket::Severity(Severity::Major) => counts.major += 1,
            SpanBucket::Severity(Severity::Minor) => counts.minor += 1,
            // undecided spans are kept in the row but belong to no reported bucket
            SpanBucket::Severity(_) => {}
        }

        start_indices.push(corrected.start_i.to_string());
        end_indices.push(corrected.end_i.to_string());
        error_types.push(corrected.severity.as_str().to_string());
    }

    if error_types.is_empty() {
        start_indices.push(NO_ERROR_INDEX.to_string());
        end_indices.push(NO_ERROR_INDEX.to_string());
        error_types.push(NO_ERROR_TYPE.to_string());
        counts.no_error = true;
    }

    let row = OutputRow {
        doc_id: record.doc_id.clone(),
        segment_id: record.line_id.clone(),
        source_lang: languages.source.clone(),
        target_lang: languages.target.clone(),
        set_id: SET_ID.to_string(),
        system_id: record.system.clone(),
        source_segment: record.src.clone(),
        hypothesis_segment: record.tgt.clone(),
        reference_segment: reference.to_string(),
        domain_name: record.domain.clone(),
        method: METHOD.to_string(),
        start_indices: start_indices.join(" "),
        end_indices: end_indices.join(" "),
        error_types: error_types.join(" "),
    };

    Ok(RecordOutcome::Emitted { row, counts })
}
