use aidx_core::{index_dir, unindex_dir, verify_file_name, LogNotifier};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// aidx - asset index toolkit for game distribution servers
#[derive(Parser)]
#[command(name = "aidx")]
#[command(about = "Index and unindex game asset directories", long_about = None)]
#[command(version)]
struct Cli {
    /// Updates root directory (defaults to AIDX_UPDATES_DIR env var or .)
    #[arg(short, long, global = true)]
    updates_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index an asset dir into manifest + object store
    Index {
        /// Source directory name (named-file tree)
        source_dir: String,

        /// Output indexed asset directory name (must not exist)
        output_dir: String,

        /// Manifest file name to write inside the output dir
        manifest_name: String,
    },

    /// Unindex an asset dir back into a named-file tree
    Unindex {
        /// Input indexed asset directory name
        input_dir: String,

        /// Manifest file name inside the input dir
        manifest_name: String,

        /// Output directory name (must not exist)
        output_dir: String,

        /// Verify recorded entry sizes against copied objects
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Determine updates root: CLI arg > AIDX_UPDATES_DIR env var > . default
    let root = cli
        .updates_dir
        .or_else(|| std::env::var("AIDX_UPDATES_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));

    match cli.command {
        Commands::Index {
            source_dir,
            output_dir,
            manifest_name,
        } => cmd_index(&root, &source_dir, &output_dir, &manifest_name),
        Commands::Unindex {
            input_dir,
            manifest_name,
            output_dir,
            strict,
        } => cmd_unindex(&root, &input_dir, &manifest_name, &output_dir, strict),
    }
}

fn cmd_index(root: &Path, source_dir: &str, output_dir: &str, manifest_name: &str) -> Result<()> {
    let source_dir = verify_file_name(source_dir)?;
    let output_dir = verify_file_name(output_dir)?;
    let manifest_name = verify_file_name(manifest_name)?;

    let source = root.join(source_dir);
    let output = root.join(output_dir);

    let stats = index_dir(&source, &output, manifest_name, &LogNotifier)
        .with_context(|| format!("Failed to index asset dir '{}'", source_dir))?;

    println!(
        "Indexed '{}' into '{}': {} files, {} objects, {} bytes",
        source_dir, output_dir, stats.files, stats.objects, stats.bytes
    );

    Ok(())
}

fn cmd_unindex(
    root: &Path,
    input_dir: &str,
    manifest_name: &str,
    output_dir: &str,
    strict: bool,
) -> Result<()> {
    let input_dir = verify_file_name(input_dir)?;
    let manifest_name = verify_file_name(manifest_name)?;
    let output_dir = verify_file_name(output_dir)?;

    let input = root.join(input_dir);
    let output = root.join(output_dir);

    let stats = unindex_dir(&input, manifest_name, &output, strict, &LogNotifier)
        .with_context(|| format!("Failed to unindex asset dir '{}'", input_dir))?;

    println!(
        "Unindexed '{}' into '{}': {} files, {} bytes",
        input_dir, output_dir, stats.files, stats.bytes
    );

    Ok(())
}
