// Run summary and CSV export

use crate::error::Result;
use crate::sink::OutputSink;
use chain_cache::{CacheManager, CacheMetrics};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

/// One CSV row describing a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub script: String,
    pub algorithm: String,
    pub buckets: usize,
    pub capacity: usize,
    pub commands: usize,
    pub final_size: usize,
    pub requests: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub hit_rate: f64,
    pub insertions: u64,
    pub replacements: u64,
    pub removals: u64,
    pub evictions: u64,
    pub clears: u64,
}

impl RunSummary {
    /// Captures the counters of `cache` after running `commands` commands
    /// from `script`.
    pub fn from_cache<V>(script: &str, commands: usize, cache: &CacheManager<V>) -> Self {
        let metrics = cache.core_metrics();
        Self {
            script: script.to_string(),
            algorithm: cache.algorithm_name().to_string(),
            buckets: cache.bucket_count(),
            capacity: cache.max_cache_size(),
            commands,
            final_size: cache.len(),
            requests: metrics.requests,
            cache_hits: metrics.cache_hits,
            cache_misses: metrics.cache_misses(),
            hit_rate: metrics.hit_rate(),
            insertions: metrics.insertions,
            replacements: metrics.replacements,
            removals: metrics.removals,
            evictions: metrics.evictions,
            clears: metrics.clears,
        }
    }

    /// Writes a header and this row as CSV.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.serialize(self)?;
        writer.flush()?;
        Ok(())
    }

    /// Writes the CSV to a new file at `path`.
    pub fn export_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.serialize(self)?;
        writer.flush()?;
        Ok(())
    }
}

/// Writes the cache's metrics, one `name: value` line each, sorted by name.
pub fn write_metrics<C, S>(sink: &mut S, cache: &C) -> io::Result<()>
where
    C: CacheMetrics,
    S: OutputSink + ?Sized,
{
    sink.line(&format!("{} metrics:", cache.algorithm_name()))?;
    for (name, value) in cache.metrics() {
        if name.ends_with("_rate") {
            sink.line(&format!("  {name}: {value:.3}"))?;
        } else {
            sink.line(&format!("  {name}: {value}"))?;
        }
    }
    Ok(())
}
