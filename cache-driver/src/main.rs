use cache_driver::generator::{self, ScriptConfig};
use cache_driver::script::load_script;
use cache_driver::{
    ConsoleSink, DriverError, FileSink, OutputSink, RunOptions, ScriptRunner, TeeSink,
};
use chain_cache::CacheManagerConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Script runner for the chain-cache cache manager
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the CLI
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run an operation script against a fresh cache
    Run {
        /// Script file, one command per line
        #[arg(short, long, value_name = "FILE")]
        script: PathBuf,

        /// Number of hash buckets
        #[arg(short, long, default_value = "11")]
        buckets: usize,

        /// Maximum number of cache entries
        #[arg(short, long, default_value = "10")]
        capacity: usize,

        /// Also write the transcript to this file
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Report runs of empty buckets on one line
        #[arg(long)]
        compress_empty: bool,

        /// Export the run summary to a CSV file
        #[arg(long, value_name = "PATH")]
        summary_csv: Option<PathBuf>,
    },

    /// Generate a random operation script
    Generate {
        /// Number of commands
        #[arg(long, default_value = "1000")]
        ops: usize,

        /// Keys are drawn from 0..KEY_SPACE
        #[arg(long, default_value = "64")]
        key_space: u32,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Seed for reproducible scripts
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Diagnostics go to stderr so they never mix with the transcript.
    // Defaults to "warn", can be overridden with RUST_LOG.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cache_driver=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    match args.command {
        Commands::Run {
            script,
            buckets,
            capacity,
            output,
            compress_empty,
            summary_csv,
        } => {
            let config = CacheManagerConfig::new(buckets, capacity).ok_or_else(|| {
                DriverError::Config(format!(
                    "buckets ({buckets}) and capacity ({capacity}) must be at least 1"
                ))
            })?;
            let lines = load_script(&script)?;
            info!(script = %script.display(), commands = lines.len(), "script loaded");

            let sink: Box<dyn OutputSink> = match &output {
                Some(path) => Box::new(TeeSink::new(ConsoleSink, FileSink::create(path)?)),
                None => Box::new(ConsoleSink),
            };
            let options = RunOptions { compress_empty };

            let mut runner = ScriptRunner::new(config, sink, options);
            runner.run(&lines)?;
            let summary = runner.finish(&script.display().to_string())?;

            if let Some(csv_path) = summary_csv {
                summary.export_csv(&csv_path)?;
                info!(path = %csv_path.display(), "summary exported");
            }
            Ok(())
        }

        Commands::Generate {
            ops,
            key_space,
            output,
            seed,
        } => {
            let config = ScriptConfig {
                ops,
                key_space,
                seed,
            };
            let written = generator::generate_to_file(config, &output)?;
            println!("Wrote {written} commands to {}", output.display());
            Ok(())
        }
    }
}
