use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::Level;

use crate::cipher::KdfParams;
use crate::compression::Compression;
use crate::config::{ARGON_MEMORY, ARGON_THREADS, ARGON_TIME, MAX_KDF_MEMORY, MAX_KDF_TIME};
use crate::processor::{self, SplitOptions};

#[derive(Args)]
pub struct KdfArgs {
    /// Argon2id memory cost in KiB.
    #[arg(long, default_value_t = ARGON_MEMORY, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_KDF_MEMORY)))]
    kdf_memory: u32,

    /// Argon2id passes.
    #[arg(long, default_value_t = ARGON_TIME, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_KDF_TIME)))]
    kdf_time: u32,

    /// Argon2id lanes.
    #[arg(long, default_value_t = ARGON_THREADS)]
    kdf_parallelism: u32,
}

impl From<&KdfArgs> for KdfParams {
    fn from(args: &KdfArgs) -> Self {
        Self::new(args.kdf_memory, args.kdf_time, args.kdf_parallelism)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split a file into shares.
    Split {
        file: PathBuf,

        /// Number of shares to produce.
        #[arg(short = 'n', long)]
        shares: usize,

        /// Shares needed to rebuild the file (defaults to all of them).
        #[arg(short = 'r', long)]
        required: Option<usize>,

        #[command(flatten)]
        kdf: KdfArgs,

        /// Store the file uncompressed.
        #[arg(long)]
        no_compress: bool,

        /// Directory to write the shares to.
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Rebuild a file from its shares.
    Merge {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output path (defaults to the share name without its index).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Decrypt every complete group and require them to agree.
        #[arg(long)]
        verify: bool,
    },

    /// Show what a set of share files contains.
    Inspect {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Parser)]
#[command(name = "splitbyte", version = "26.1.0", about = "Split a file into encrypted shares so that any R of N rebuild it.")]
pub struct App {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Log warnings and errors only.
    #[arg(short, long, global = true)]
    quiet: bool,
}

impl App {
    pub fn init() -> Result<Self> {
        let app = Self::parse();

        let subscriber = tracing_subscriber::fmt().with_max_level(app.log_level()).with_writer(std::io::stderr).with_file(true).with_line_number(true).finish();
        tracing::subscriber::set_global_default(subscriber)?;

        Ok(app)
    }

    const fn log_level(&self) -> Level {
        match (self.verbose, self.quiet) {
            (true, _) => Level::DEBUG,
            (_, true) => Level::WARN,
            _ => Level::INFO,
        }
    }

    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Split { file, shares, required, kdf, no_compress, output_dir } => {
                let options = SplitOptions {
                    share_count: shares,
                    threshold: required.unwrap_or(shares),
                    kdf: KdfParams::from(&kdf),
                    compression: if no_compress { Compression::None } else { Compression::Zstd },
                    output_dir,
                    show_progress: true,
                };

                let outcome = processor::split_file(&file, &options).await.with_context(|| format!("split failed: {}", file.display()))?;
                crate::ui::show_split_success(&outcome.paths, options.threshold, outcome.groups);
            }

            Commands::Merge { files, output, verify } => {
                let output = match output {
                    Some(output) => output,
                    None => processor::default_output(&files)?,
                };

                let outcome = processor::merge_files(&files, &output, verify).await.with_context(|| format!("merge failed: {}", output.display()))?;
                crate::ui::show_merge_success(&output, outcome.bytes, outcome.shares);
            }

            Commands::Inspect { files } => {
                let infos = processor::inspect_files(&files).await?;
                crate::ui::show_share_info(&infos);
            }
        }

        Ok(())
    }
}
