mod baseline;
mod ingest;
mod output;
mod pipeline;
mod rows;
mod run;
mod spans;
mod stats;

pub use run::run;
