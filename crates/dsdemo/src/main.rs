//! dsdemo - walkthrough of the LRU cache and AVL tree engines

mod demo;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay the LRU cache walkthrough
    Lru {
        /// Cache capacity (number of entries)
        #[arg(short, long, default_value_t = 3)]
        capacity: usize,

        /// Threads hammering the shared cache afterwards
        #[arg(short, long, default_value_t = 4)]
        threads: usize,
    },

    /// Replay the AVL tree walkthrough
    Avl {
        /// Values inserted in the sequential balancing demo
        #[arg(short = 'n', long, default_value_t = 10)]
        count: u32,
    },

    /// Run every walkthrough with default settings
    All,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    info!("Starting dsdemo v{}", env!("CARGO_PKG_VERSION"));

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command.unwrap_or(Command::All) {
        Command::Lru { capacity, threads } => {
            demo::lru_walkthrough(&mut out, capacity)?;
            demo::shared_cache_workload(&mut out, capacity, threads)?;
        }
        Command::Avl { count } => demo::avl_walkthrough(&mut out, count)?,
        Command::All => {
            demo::lru_walkthrough(&mut out, 3)?;
            demo::shared_cache_workload(&mut out, 3, 4)?;
            writeln!(out)?;
            demo::avl_walkthrough(&mut out, 10)?;
        }
    }

    out.flush()?;
    info!("Done");
    Ok(())
}
