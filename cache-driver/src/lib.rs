//! Driver for the chain-cache cache manager
//!
//! Runs operation scripts against a [`CacheManager`](chain_cache::CacheManager),
//! renders the list and table through an [`OutputSink`], generates random
//! scripts, and exports run summaries as CSV.

pub mod error;
pub mod generator;
pub mod printer;
pub mod runner;
pub mod script;
pub mod sink;
pub mod summary;

pub use error::{DriverError, Result};
pub use runner::{RunOptions, ScriptRunner};
pub use sink::{ConsoleSink, FileSink, MemorySink, OutputSink, TeeSink};
pub use summary::RunSummary;
