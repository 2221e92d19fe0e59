use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::model::{AnnotationRecord, Signature};

#[derive(Debug, Clone)]
pub(super) struct IngestedRecord {
    pub line_number: usize,
    pub record: AnnotationRecord,
}

/// All records sharing one signature, in input order.
#[derive(Debug, Clone)]
pub(super) struct SignatureGroup {
    pub signature: Signature,
    pub records: Vec<IngestedRecord>,
}

#[derive(Debug, Clone)]
pub(super) struct PairGroups {
    pub langs: String,
    pub groups: Vec<SignatureGroup>,
    index: HashMap<Signature, usize>,
}

impl PairGroups {
    fn new(langs: String) -> Self {
        Self {
            langs,
            groups: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn push(&mut self, ingested: IngestedRecord) {
        let signature = ingested.record.signature();
        match self.index.get(&signature) {
            Some(&position) => self.groups[position].records.push(ingested),
            None => {
                self.index.insert(signature.clone(), self.groups.len());
                self.groups.push(SignatureGroup {
                    signature,
                    records: vec![ingested],
                });
            }
        }
    }

    pub fn signature_count(&self) -> usize {
        self.groups.len()
    }
}

#[derive(Debug, Clone, Default)]
pub(super) struct IngestOutcome {
    pub pairs: Vec<PairGroups>,
    pub records_read: usize,
    pub target_segment_empty: usize,
}

pub(super) fn read_records(path: &Path) -> Result<Vec<IngestedRecord>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (offset, line) in reader.lines().enumerate() {
        let line_number = offset + 1;
        let line = line.with_context(|| {
            format!("failed to read line {line_number} of {}", path.display())
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let record: AnnotationRecord = serde_json::from_str(&line).with_context(|| {
            format!("failed to parse line {line_number} of {}", path.display())
        })?;
        records.push(IngestedRecord {
            line_number,
            record,
        });
    }

    Ok(records)
}

/// Groups records by language pair and signature, dropping empty hypotheses.
pub(super) fn group_records(
    records: impl IntoIterator<Item = IngestedRecord>,
) -> Result<IngestOutcome> {
    let mut outcome = IngestOutcome::default();
    let mut pair_positions = HashMap::<String, usize>::new();

    for ingested in records {
        outcome.records_read += 1;

        if ingested.record.src.is_empty() {
            bail!("line {}: source segment is empty", ingested.line_number);
        }
        if ingested.record.tgt.is_empty() {
            outcome.target_segment_empty += 1;
            continue;
        }

        let langs = ingested.record.langs.clone();
        let position = *pair_positions.entry(langs.clone()).or_insert_with(|| {
            outcome.pairs.push(PairGroups::new(langs));
            outcome.pairs.len() - 1
        });
        outcome.pairs[position].push(ingested);
    }

    Ok(outcome)
}
