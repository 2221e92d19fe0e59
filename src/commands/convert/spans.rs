use anyhow::{Result, bail};

use crate::model::{ErrorSpan, Severity, SpanBound};

/// Statistics bucket a normalized span falls into.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(super) enum SpanBucket {
    Missing,
    Severity(Severity),
}

/// Span offsets count Unicode scalar values, not bytes.
pub(super) fn hypothesis_length(hypothesis: &str) -> i64 {
    hypothesis.chars().count() as i64
}

/// Rejects spans where exactly one bound is the `missing` sentinel.
pub(super) fn ensure_span_structure(span: &ErrorSpan) -> Result<()> {
    match (&span.start_i, &span.end_i) {
        (SpanBound::Missing, SpanBound::Missing) => Ok(()),
        (SpanBound::Missing, _) | (_, SpanBound::Missing) => {
            bail!(
                "only one span bound is the missing sentinel: start_i={} end_i={} severity={}",
                span.start_i,
                span.end_i,
                span.severity.as_str()
            )
        }
        _ => Ok(()),
    }
}

pub(super) fn correct_span(span: &ErrorSpan, hypothesis: &str) -> ErrorSpan {
    let mut corrected = span.clone();
    if corrected.severity == Severity::Critical {
        corrected.severity = Severity::Major;
    }

    if let (Some(start), Some(end)) = (corrected.start_i.index(), corrected.end_i.index()) {
        let length = hypothesis_length(hypothesis);
        let start = start.clamp(0, length);
        let end = end.clamp(0, length);
        let (start, end) = if start > end { (end, start) } else { (start, end) };
        corrected.start_i = SpanBound::Index(start);
        corrected.end_i = SpanBound::Index(end);
    }

    if corrected.start_i == corrected.end_i {
        corrected.start_i = SpanBound::Missing;
        corrected.end_i = SpanBound::Missing;
    }

    corrected
}

/// Checks a raw span; `undecided` is deliberately not in the accepted severity set.
pub(super) fn is_invalid_span(span: &ErrorSpan, hypothesis: &str) -> bool {
    let length = hypothesis_length(hypothesis);
    let out_of_range = |bound: &SpanBound| match bound {
        SpanBound::Index(index) => *index < 0 || *index > length,
        SpanBound::Missing => false,
        SpanBound::Malformed(_) => true,
    };

    if out_of_range(&span.start_i) || out_of_range(&span.end_i) {
        return true;
    }

    if let (Some(start), Some(end)) = (span.start_i.index(), span.end_i.index()) {
        if start > end {
            return true;
        }
    }

    !matches!(
        span.severity,
        Severity::Major | Severity::Minor | Severity::Critical
    )
}

pub(super) fn bucket_span(corrected: &ErrorSpan) -> SpanBucket {
    if corrected.start_i == SpanBound::Missing && corrected.end_i == SpanBound::Missing {
        SpanBucket::Missing
    } else {
        SpanBucket::Severity(corrected.severity)
    }
}
