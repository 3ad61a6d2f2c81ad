//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Persona the process runs as
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Role {
    /// Decomposes high-level tickets into technical tasks
    Manager,
    /// Implements the technical tickets the manager produces
    Developer,
}

/// CLI arguments for crewboard
#[derive(Parser, Debug)]
#[command(name = "crewboard")]
#[command(author, version, about = "AI agent crew coordinated over a shared ticket board")]
#[command(long_about = r#"
Crewboard runs AI agent personas that collaborate through a shared ticket
board and a mirror of the project repository.

Configuration files are loaded from (in priority order):
1. CREWBOARD_* environment variables
2. --config <path>     Explicit config file
3. ./crewboard.toml    Project-level config
4. ~/.config/crewboard/config.toml   Global config

Example:
  crewboard run --role manager
  crewboard decompose 64f1c2
  crewboard assign 64f1c2 backenddev
  crewboard answer 64f1c2 --to EngManager
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan the board for assigned tickets and run the full lifecycle on each
    Run {
        /// Persona to run as
        #[arg(long, value_enum, default_value = "manager")]
        role: Role,
    },
    /// Decompose one ticket directly, without a clarification round
    Decompose {
        /// Id of the ticket to decompose
        ticket_id: String,
    },
    /// Assign a ticket to a board member by name
    Assign {
        /// Id of the ticket to assign
        ticket_id: String,
        /// Username or full name of the member
        member: String,
    },
    /// Answer the pending clarification question on a ticket
    Answer {
        /// Id of the ticket carrying the question
        ticket_id: String,
        /// Persona name the answer is addressed to (defaults to the
        /// configured manager)
        #[arg(long, value_name = "NAME")]
        to: Option<String>,
    },
}
