//! Command-line interface for strictly_sim.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Strictly SIM - play SIM against a remote arbiter
#[derive(Parser, Debug)]
#[command(name = "strictly_sim")]
#[command(about = "Play the SIM line-drawing game against a remote AI", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a match in the terminal
    Play {
        /// Arbiter URL (overrides config and SIM_ARBITER_URL)
        #[arg(long)]
        url: Option<String>,

        /// Difficulty from 1 (easiest) to 8
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=8))]
        difficulty: Option<u8>,

        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Check that the arbiter is reachable
    Ping {
        /// Arbiter URL (overrides config and SIM_ARBITER_URL)
        #[arg(long)]
        url: Option<String>,

        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
