use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::model::{OutputRow, TSV_COLUMNS};
use crate::util::ensure_parent_directory;

pub(super) fn write_tsv(path: &Path, rows: &[OutputRow]) -> Result<()> {
    ensure_parent_directory(path)?;
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;

    let mut output = BufWriter::new(file);
    write_rows(&mut output, rows)
        .with_context(|| format!("failed to write {}", path.display()))?;
    output
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    Ok(())
}

pub(super) fn write_rows<W: Write>(output: &mut W, rows: &[OutputRow]) -> io::Result<()> {
    write_record(output, TSV_COLUMNS)?;
    for row in rows {
        write_record(output, row.fields())?;
    }
    Ok(())
}

fn write_record<W: Write>(output: &mut W, fields: [&str; 14]) -> io::Result<()> {
    for (position, field) in fields.iter().enumerate() {
        if position > 0 {
            output.write_all(b"\t")?;
        }
        output.write_all(quote_field(field).as_bytes())?;
    }
    output.write_all(b"\n")
}

/// Quotes a field only when it would otherwise break the tab/line structure.
pub(super) fn quote_field(field: &str) -> Cow<'_, str> {
    if field.contains(['\t', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
