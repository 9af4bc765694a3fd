//! Quantum networking command-line client.
//!
//! The binary wires these modules together: [`config`] turns the global
//! options into an API client, [`commands`] runs a subcommand against it
//! and [`output`] renders the result.

pub mod commands;
pub mod config;
pub mod output;
pub mod specs;

use clap::Parser;

use commands::NetworkCommand;
use config::ConnectionArgs;

/// Top-level command line.
#[derive(Parser, Debug)]
#[command(
    name = "quantum",
    version,
    about = "Command-line interface to the Quantum networking API"
)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Output as JSON
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: NetworkCommand,
}
