use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// One annotator's judgment of one hypothesis, as read from the input JSON lines.
#[derive(Debug, Clone, Deserialize)]
pub struct AnnotationRecord {
    pub src: String,
    pub tgt: String,
    pub langs: String,
    #[serde(deserialize_with = "scalar_as_string")]
    pub doc_id: String,
    #[serde(deserialize_with = "scalar_as_string")]
    pub line_id: String,
    pub system: String,
    pub domain: String,
    pub esa_spans: Vec<ErrorSpan>,
}

impl AnnotationRecord {
    pub fn signature(&self) -> Signature {
        Signature {
            doc_id: self.doc_id.clone(),
            line_id: self.line_id.clone(),
            system: self.system.clone(),
        }
    }
}

fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Integer(i64),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(value) => value,
        Scalar::Integer(value) => value.to_string(),
    })
}

/// Repeated annotations of the same (segment, system) pair share a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub doc_id: String,
    pub line_id: String,
    pub system: String,
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.doc_id, self.line_id, self.system)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorSpan {
    pub start_i: SpanBound,
    pub end_i: SpanBound,
    pub severity: Severity,
}

/// A span offset: a character index, the `"missing"` sentinel, or any other string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawBound")]
pub enum SpanBound {
    Index(i64),
    Missing,
    Malformed(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBound {
    Index(i64),
    Unsigned(u64),
    Text(String),
}

impl From<RawBound> for SpanBound {
    fn from(raw: RawBound) -> Self {
        match raw {
            RawBound::Index(index) => Self::Index(index),
            // beyond i64::MAX; any hypothesis length clamps it anyway
            RawBound::Unsigned(index) => Self::Index(i64::try_from(index).unwrap_or(i64::MAX)),
            RawBound::Text(text) if text == MISSING_BOUND => Self::Missing,
            RawBound::Text(text) => Self::Malformed(text),
        }
    }
}

pub const MISSING_BOUND: &str = "missing";

impl SpanBound {
    pub fn index(&self) -> Option<i64> {
        match self {
            Self::Index(index) => Some(*index),
            _ => None,
        }
    }
}

impl fmt::Display for SpanBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Missing => f.write_str(MISSING_BOUND),
            Self::Malformed(text) => f.write_str(text),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Major,
    Minor,
    Undecided,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Undecided => "undecided",
            Self::Critical => "critical",
        }
    }
}

pub const TSV_COLUMNS: [&str; 14] = [
    "doc_id",
    "segment_id",
    "source_lang",
    "target_lang",
    "set_id",
    "system_id",
    "source_segment",
    "hypothesis_segment",
    "reference_segment",
    "domain_name",
    "method",
    "start_indices",
    "end_indices",
    "error_types",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub doc_id: String,
    pub segment_id: String,
    pub source_lang: String,
    pub target_lang: String,
    pub set_id: String,
    pub system_id: String,
    pub source_segment: String,
    pub hypothesis_segment: String,
    pub reference_segment: String,
    pub domain_name: String,
    pub method: String,
    pub start_indices: String,
    pub end_indices: String,
    pub error_types: String,
}

impl OutputRow {
    /// Field values in `TSV_COLUMNS` order.
    pub fn fields(&self) -> [&str; 14] {
        [
            self.doc_id.as_str(),
            self.segment_id.as_str(),
            self.source_lang.as_str(),
            self.target_lang.as_str(),
            self.set_id.as_str(),
            self.system_id.as_str(),
            self.source_segment.as_str(),
            self.hypothesis_segment.as_str(),
            self.reference_segment.as_str(),
            self.domain_name.as_str(),
            self.method.as_str(),
            self.start_indices.as_str(),
            self.end_indices.as_str(),
            self.error_types.as_str(),
        ]
    }
}

/// One line of a bilingual reference corpus dump.
#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceImportRecord {
    pub lp: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub is_bad_source: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    pub source: String,
    pub target: String,
    pub is_bad_source: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertPaths {
    pub input_path: String,
    pub output_path: String,
    pub reference_db_path: String,
    pub random_baseline_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertCounts {
    pub records_read: usize,
    pub rows_written: usize,
    pub target_segment_empty: usize,
    pub skip_datum_with_invalid_span: usize,
    pub num_skipped_valid_signatures: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairStatistics {
    pub langs: String,
    pub valid_signatures: usize,
    pub rows: usize,
    pub no_error: usize,
    pub missing: usize,
    pub major: usize,
    pub minor: usize,
}

impl PairStatistics {
    pub fn skipped_signatures(&self) -> usize {
        self.valid_signatures.saturating_sub(self.rows)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub input_sha256: String,
    pub filter_invalid_spans: bool,
    pub seed: u64,
    pub paths: ConvertPaths,
    pub counts: ConvertCounts,
    pub language_pairs: Vec<PairStatistics>,
    pub unsupported_pairs: Vec<String>,
}
