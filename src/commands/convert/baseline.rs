use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::{OutputRow, Severity};

use super::spans::hypothesis_length;

/// Seeded source of random, well-formed spans for a chance-level annotator baseline.
pub(super) struct RandomSpanGenerator {
    rng: StdRng,
}

impl RandomSpanGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Returns `(start, end, severity)` with `0 <= start < end <= len`, or `None` for an empty hypothesis.
    pub fn random_valid_span(&mut self, hypothesis: &str) -> Option<(i64, i64, Severity)> {
        let length = hypothesis_length(hypothesis);
        if length == 0 {
            return None;
        }

        let start = self.rng.gen_range(0..=length);
        let mut end = self.rng.gen_range(0..=length);
        while start == end {
            end = self.rng.gen_range(0..=length);
        }
        let (start, end) = if end < start { (end, start) } else { (start, end) };

        let severity = if self.rng.gen_range(0..2) == 0 {
            Severity::Major
        } else {
            Severity::Minor
        };
        Some((start, end, severity))
    }
}

/// Copies `rows`, replacing each row's spans with a single random span.
pub(super) fn random_baseline_rows(
    rows: &[OutputRow],
    generator: &mut RandomSpanGenerator,
) -> Vec<OutputRow> {
    rows.iter()
        .filter_map(|row| {
            let (start, end, severity) = generator.random_valid_span(&row.hypothesis_segment)?;
            Some(OutputRow {
                start_indices: start.to_string(),
                end_indices: end.to_string(),
                error_types: severity.as_str().to_string(),
                ..row.clone()
            })
        })
        .collect()
}
