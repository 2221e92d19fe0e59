use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub const DEFAULT_SEED: u64 = 42;

#[derive(Parser, Debug)]
#[command(
    name = "esa-tsv",
    version,
    about = "Flatten ESA error-span judgments into a reference-joined TSV"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Convert(ConvertArgs),
    ImportReferences(ImportReferencesArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// ESA judgments, one JSON object per line.
    #[arg(short = 'i', long)]
    pub input: PathBuf,

    #[arg(short = 'o', long)]
    pub output: PathBuf,

    #[arg(long, default_value = ".cache/esa-tsv/references.sqlite")]
    pub reference_db: PathBuf,

    /// Drop records that carry any out-of-range, inverted or non-major/minor/critical span.
    #[arg(long, default_value_t = false)]
    pub filter_invalid_spans: bool,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    /// Also write a copy of the output where every row carries one random span.
    #[arg(long)]
    pub random_baseline_output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ImportReferencesArgs {
    #[arg(long, default_value = ".cache/esa-tsv/references.sqlite")]
    pub reference_db: PathBuf,

    /// Bilingual corpus files with `lp`, `source`, `target` and `is_bad_source` per line.
    #[arg(short = 'i', long = "input", required = true)]
    pub inputs: Vec<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub replace: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = ".cache/esa-tsv/references.sqlite")]
    pub reference_db: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}
