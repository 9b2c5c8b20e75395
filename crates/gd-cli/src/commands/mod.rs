//! CLI command implementations.

mod serve;

pub use serve::{prepare_database, run_server};
