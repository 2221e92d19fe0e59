pub mod convert;
pub mod references;
pub mod status;
