//! # Kindle Clippings CLI (`kclip`)
//!
//! Splits an e-reader clippings export into one text file per book.
//!
//! ## Usage
//!
//! ```bash
//! kclip --config ./config/kclip.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `kclip init` | Write a starter configuration file |
//! | `kclip append` | Append unseen highlights to stored files, create files for new books |
//! | `kclip create` | Write a fresh file for every book into the output folder |
//! | `kclip show` | Print the overview table without writing anything |
//!
//! Every run command accepts `--filter-date` to only consider clippings newer
//! than the last exported one.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kindle_clippings::config;
use kindle_clippings::models::RunMode;
use kindle_clippings::run;

/// kclip: export e-reader highlights into per-book text files.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. Run `kclip init` to create one.
#[derive(Parser)]
#[command(
    name = "kclip",
    about = "Export e-reader highlights into per-book text files",
    version,
    long_about = "kclip reads a \"My Clippings.txt\" export, groups highlights by book, \
    skips highlights already present in previously exported files and writes the rest, \
    logging every file it creates or extends."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/kclip.toml")]
    config: PathBuf,

    /// Increase diagnostic output on stderr (-v debug, -vv trace).
    /// `RUST_LOG` takes precedence when set.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a commented starter configuration to the `--config` path.
    ///
    /// Refuses to overwrite an existing file.
    Init,

    /// Append new highlights to existing files; create files for new books.
    ///
    /// Highlights whose text already occurs in the stored file are skipped,
    /// so running this twice on the same export writes nothing the second time.
    Append(RunArgs),

    /// Create a new file for every book in the output folder.
    ///
    /// Overwrites any file of the same name in the output folder.
    Create(RunArgs),

    /// Show the per-book overview without creating or modifying any file.
    Show(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Only consider clippings newer than the last exported one
    /// (`state.last_exported` in the config).
    #[arg(long)]
    filter_date: bool,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("kindle_clippings={},warn", default_level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let (mode, args) = match cli.command {
        Commands::Init => {
            config::scaffold_config(&cli.config)?;
            return Ok(());
        }
        Commands::Append(args) => (RunMode::Append, args),
        Commands::Create(args) => (RunMode::Create, args),
        Commands::Show(args) => (RunMode::Show, args),
    };

    let mut cfg = config::load_config(&cli.config)?;
    run::run(&cli.config, &mut cfg, mode, args.filter_date)?;

    Ok(())
}
