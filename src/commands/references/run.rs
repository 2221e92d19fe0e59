use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::ImportReferencesArgs;
use crate::langs::SUPPORTED_PAIRS;
use crate::model::{ReferenceEntry, ReferenceImportRecord};

use super::store::ReferenceStore;

pub fn run(args: ImportReferencesArgs) -> Result<()> {
    info!(reference_db = %args.reference_db.display(), files = args.inputs.len(), "starting reference import");

    let mut entries = Vec::<(String, ReferenceEntry)>::new();
    for input in &args.inputs {
        let loaded = read_reference_file(input)?;
        info!(path = %input.display(), entries = loaded.len(), "read reference corpus");
        entries.extend(loaded);
    }

    for code in unknown_corpus_codes(&entries) {
        warn!(corpus_code = %code, "corpus code has no matching language pair and will never be joined");
    }

    let mut store = ReferenceStore::open(&args.reference_db)?;
    let inserted = store.insert_entries(
        entries.iter().map(|(code, entry)| (code.as_str(), entry)),
        args.replace,
    )?;

    info!(inserted, replace = args.replace, "reference import completed");
    Ok(())
}

pub(super) fn read_reference_file(path: &Path) -> Result<Vec<(String, ReferenceEntry)>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut out = Vec::new();
    for (offset, line) in reader.lines().enumerate() {
        let line_number = offset + 1;
        let line = line.with_context(|| {
            format!("failed to read line {line_number} of {}", path.display())
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let record: ReferenceImportRecord = serde_json::from_str(&line).with_context(|| {
            format!("failed to parse line {line_number} of {}", path.display())
        })?;
        out.push((
            record.lp,
            ReferenceEntry {
                source: record.source,
                target: record.target,
                is_bad_source: record.is_bad_source,
            },
        ));
    }

    Ok(out)
}

fn unknown_corpus_codes(entries: &[(String, ReferenceEntry)]) -> Vec<String> {
    let mut codes = entries
        .iter()
        .map(|(code, _)| code.as_str())
        .filter(|code| !SUPPORTED_PAIRS.iter().any(|pair| pair.corpus_code() == *code))
        .map(ToOwned::to_owned)
        .collect::<Vec<_>>();
    codes.sort();
    codes.dedup();
    codes
}
