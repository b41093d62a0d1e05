//! Script execution
//!
//! [`ScriptRunner`] owns a `CacheManager<String>` and the output sink, and
//! applies script commands to the cache one at a time. User-visible results
//! go to the sink; diagnostics go to `tracing`.

use crate::error::Result;
use crate::printer::{self, Direction};
use crate::script::{Command, ScriptLine};
use crate::sink::OutputSink;
use crate::summary::{self, RunSummary};
use chain_cache::{AddOutcome, CacheManager, CacheManagerConfig};
use std::io;
use tracing::{debug, info};

/// Display options for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Report runs of empty buckets on one line.
    pub compress_empty: bool,
}

/// Runs script commands against a cache, writing results to a sink.
pub struct ScriptRunner<S: OutputSink> {
    cache: CacheManager<String>,
    sink: S,
    options: RunOptions,
    executed: usize,
}

impl<S: OutputSink> ScriptRunner<S> {
    pub fn new(config: CacheManagerConfig, sink: S, options: RunOptions) -> Self {
        info!(
            buckets = config.bucket_count.get(),
            capacity = config.capacity.get(),
            "cache created"
        );
        Self {
            cache: CacheManager::init(config),
            sink,
            options,
            executed: 0,
        }
    }

    /// The cache the commands run against.
    pub fn cache(&self) -> &CacheManager<String> {
        &self.cache
    }

    /// Number of commands executed so far.
    pub fn executed(&self) -> usize {
        self.executed
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Executes every line in order, then flushes the sink.
    pub fn run(&mut self, lines: &[ScriptLine]) -> Result<()> {
        info!(commands = lines.len(), "running script");
        for line in lines {
            debug!(line = line.line, command = %line.command, "executing");
            self.execute(&line.command)?;
        }
        self.sink.flush()?;
        info!(
            executed = self.executed,
            size = self.cache.len(),
            evictions = self.cache.core_metrics().evictions,
            "script finished"
        );
        Ok(())
    }

    /// Executes a single command.
    pub fn execute(&mut self, command: &Command) -> io::Result<()> {
        self.executed += 1;
        match command {
            Command::Add { key, payload } => match self.cache.add(*key, payload.clone()) {
                AddOutcome::Inserted => debug!(key, "inserted"),
                AddOutcome::Replaced(old) => debug!(key, old = %old, "replaced"),
                AddOutcome::Evicted { key: oldest, .. } => {
                    info!(evicted = oldest, "cache full");
                    self.sink.line(&format!(
                        "Cache is full. Removed oldest entry with key: {oldest}"
                    ))?;
                }
            },
            Command::Get(key) => {
                let line = match self.cache.get_item(*key) {
                    Some(payload) => format!("Key {key}: {payload}"),
                    None => format!("Key {key} not found"),
                };
                self.sink.line(&line)?;
            }
            Command::Contains(key) => {
                let found = self.cache.contains(*key);
                self.sink.line(&format!("Contains key {key}: {found}"))?;
            }
            Command::Remove(key) => {
                let line = match self.cache.remove(*key) {
                    Some(_) => format!("Removed key {key}"),
                    None => format!("Key {key} not found"),
                };
                self.sink.line(&line)?;
            }
            Command::Touch(key) => {
                if !self.cache.touch(*key) {
                    self.sink.line(&format!("Key {key} not found"))?;
                }
            }
            Command::Clear => {
                self.cache.clear();
                self.sink.line("Cache cleared")?;
            }
            Command::Size => {
                self.sink.line(&format!(
                    "Cache size: {} of {}",
                    self.cache.len(),
                    self.cache.max_cache_size()
                ))?;
            }
            Command::Print => {
                printer::write_cache(&mut self.sink, &self.cache, self.options.compress_empty)?
            }
            Command::PrintList => {
                printer::write_list(&mut self.sink, self.cache.list(), Direction::HeadToTail)?
            }
            Command::PrintReverse => {
                printer::write_list(&mut self.sink, self.cache.list(), Direction::TailToHead)?
            }
            Command::PrintTable => printer::write_table(
                &mut self.sink,
                self.cache.table(),
                self.options.compress_empty,
            )?,
        }
        debug_assert!(self.cache.is_consistent());
        Ok(())
    }

    /// Writes the metrics report and returns the summary row.
    pub fn finish(&mut self, script: &str) -> Result<RunSummary> {
        self.sink.line("")?;
        summary::write_metrics(&mut self.sink, &self.cache)?;
        self.sink.flush()?;
        Ok(RunSummary::from_cache(script, self.executed, &self.cache))
    }
}
