use std::fmt;

use anyhow::{Context, Result};
use regex::Regex;

/// Language pairs that have a reference corpus.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum LanguagePair {
    EnCs,
    EnJa,
    EnZh,
    EnIs,
    EnUk,
    EnRu,
}

pub const SUPPORTED_PAIRS: [LanguagePair; 6] = [
    LanguagePair::EnCs,
    LanguagePair::EnJa,
    LanguagePair::EnZh,
    LanguagePair::EnIs,
    LanguagePair::EnUk,
    LanguagePair::EnRu,
];

impl LanguagePair {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EnCs => "en-cs",
            Self::EnJa => "en-ja",
            Self::EnZh => "en-zh",
            Self::EnIs => "en-is",
            Self::EnUk => "en-uk",
            Self::EnRu => "en-ru",
        }
    }

    /// Locale-qualified code the reference corpus is keyed by.
    pub fn corpus_code(self) -> &'static str {
        match self {
            Self::EnCs => "en-cs_CZ",
            Self::EnJa => "en-ja_JP",
            Self::EnZh => "en-zh_CN",
            Self::EnIs => "en-is_IS",
            Self::EnUk => "en-uk_UA",
            Self::EnRu => "en-ru_RU",
        }
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PairSupport {
    Supported(LanguagePair),
    Unsupported,
}

pub fn resolve_pair(langs: &str) -> PairSupport {
    SUPPORTED_PAIRS
        .iter()
        .copied()
        .find(|pair| pair.as_str() == langs)
        .map(PairSupport::Supported)
        .unwrap_or(PairSupport::Unsupported)
}

/// Splits `"<src>-<tgt>"` into its two language codes.
pub fn split_langs(langs: &str) -> Result<(String, String)> {
    let pattern =
        Regex::new(r"^([^-\s]+)-([^-\s]+)$").context("failed to compile language pair regex")?;

    let captures = pattern
        .captures(langs)
        .with_context(|| format!("language pair is not of the form <src>-<tgt>: {langs:?}"))?;

    let source = captures
        .get(1)
        .map(|m| m.as_str().to_string())
        .context("missing source language capture")?;
    let target = captures
        .get(2)
        .map(|m| m.as_str().to_string())
        .context("missing target language capture")?;

    Ok((source, target))
}
