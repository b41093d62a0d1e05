//! Random script generation
//!
//! Produces workloads for the runner: mostly adds and lookups over a bounded
//! key space, with occasional removals, touches and prints. A fixed seed
//! yields the same script every time.

use crate::error::{DriverError, Result};
use crate::script::Command;
use chain_cache::Key;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Parameters for generating a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptConfig {
    /// Number of commands before the closing `print`.
    pub ops: usize,
    /// Keys are drawn uniformly from `0..key_space`.
    pub key_space: u32,
    /// Seed for the generator, or `None` for a random seed.
    pub seed: Option<u64>,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            ops: 1_000,
            key_space: 64,
            seed: None,
        }
    }
}

/// Generator for random operation scripts
pub struct ScriptGenerator {
    config: ScriptConfig,
    rng: StdRng,
    next_payload: u64,
}

impl ScriptGenerator {
    pub fn new(config: ScriptConfig) -> Result<Self> {
        if config.key_space == 0 {
            return Err(DriverError::Config("key space must be at least 1".into()));
        }
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            config,
            rng,
            next_payload: 0,
        })
    }

    /// Generates `ops` commands followed by a final `print`.
    pub fn generate(&mut self) -> Vec<Command> {
        let mut commands: Vec<Command> = (0..self.config.ops).map(|_| self.next_command()).collect();
        commands.push(Command::Print);
        commands
    }

    fn next_command(&mut self) -> Command {
        let key = self.key();
        // Weights out of 100: add 45, get 25, contains 10, remove 10, touch 5, print 5
        match self.rng.gen_range(0..100u32) {
            0..=44 => {
                self.next_payload += 1;
                Command::Add {
                    key,
                    payload: format!("value-{}", self.next_payload),
                }
            }
            45..=69 => Command::Get(key),
            70..=79 => Command::Contains(key),
            80..=89 => Command::Remove(key),
            90..=94 => Command::Touch(key),
            95..=96 => Command::PrintList,
            97..=98 => Command::PrintReverse,
            _ => Command::Size,
        }
    }

    fn key(&mut self) -> Key {
        Key::from(self.rng.gen_range(0..self.config.key_space))
    }
}

/// Writes `commands` one per line, in script syntax.
pub fn write_script<W: Write>(writer: &mut W, commands: &[Command]) -> std::io::Result<()> {
    writeln!(writer, "# generated script: {} commands", commands.len())?;
    for command in commands {
        writeln!(writer, "{command}")?;
    }
    writer.flush()
}

/// Generates a script and writes it to `path`.
pub fn generate_to_file(config: ScriptConfig, path: &Path) -> Result<usize> {
    let commands = ScriptGenerator::new(config)?.generate();
    let file = File::create(path).map_err(|e| DriverError::file(path, e))?;
    let mut writer = BufWriter::new(file);
    write_script(&mut writer, &commands)?;
    Ok(commands.len())
}
