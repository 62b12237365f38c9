//! CLI argument definitions and parsing structures
//!
//! This module defines the command-line interface structure using clap,
//! including the main `Cli` struct and the subcommand enum.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use chempilot_phases::PhaseId;
use chempilot_utils::types::Role;

/// chempilot - phase-gated industrial project audits
#[derive(Parser, Debug)]
#[command(name = "chempilot")]
#[command(about = "Phase-gated industrial project audits backed by a text-generation service")]
#[command(long_about = r#"
chempilot walks a chemical project through eight fixed phases, from
techno-economic feasibility to operations. Every phase report comes from a
text-generation service; paid phases need verified payment or a super-user.

EXAMPLES:
  # Offline dry run through the free phases
  chempilot --provider stub run --chemical Methanol --capacity 100000 \
      --location "Dahej, Gujarat" --budget 5000000 --through research

  # Full audit as a super-user, signing the final phase
  chempilot run --chemical "Acetic Acid" --capacity 250000 --location Jamnagar \
      --budget 12000000 --role super-user --sign

  # Interactive session
  chempilot session --role entrepreneur

  # Show the phase registry and the vendor marketplace
  chempilot phases
  chempilot vendors --location Gujarat

CONFIGURATION:
  Configuration is loaded with precedence: CLI flags > config file > defaults
  Config file is discovered by searching upward from CWD for .chempilot/config.toml,
  then ~/.config/chempilot/config.toml. Use --config to specify an explicit path.

EXIT CODES:
  0 success, 2 config/arguments, 3 not permitted, 65 invalid input,
  69 engine offline, 70 generation failure, 75 busy (try again later)
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Generation provider: gemini or stub
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Backoff schedule in seconds, comma separated (e.g. 1,5,20,60)
    #[arg(long, global = true, value_delimiter = ',')]
    pub backoff: Option<Vec<u64>>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the phase registry
    Phases {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the registered vendor marketplace
    ///
    /// EXAMPLES:
    ///   chempilot vendors
    ///   chempilot vendors --location "Hazira, Gujarat" --json
    Vendors {
        /// Rank vendors serving this location first
        #[arg(long)]
        location: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run an audit non-interactively
    ///
    /// Executes the current phase, prints its report and advances, until the
    /// `--through` phase is reached or a gate refuses.
    ///
    /// EXAMPLES:
    ///   chempilot run --chemical Methanol --capacity 100000 --location Dahej --budget 5000000
    ///   chempilot run ... --paid design,feed --through feed
    Run {
        /// Chemical name or CAS number
        #[arg(long)]
        chemical: String,

        /// Capacity in tonnes per annum
        #[arg(long)]
        capacity: u64,

        /// Deployment hub
        #[arg(long)]
        location: String,

        /// Budget in rupees
        #[arg(long)]
        budget: u64,

        /// Session role: entrepreneur, bank-manager, vendor, super-user
        #[arg(long, default_value = "entrepreneur")]
        role: Role,

        /// Last phase to execute (id or 0-based index); defaults to the final phase
        #[arg(long)]
        through: Option<PhaseId>,

        /// Phases with verified payment, comma separated
        #[arg(long, value_delimiter = ',')]
        paid: Vec<PhaseId>,

        /// Sign and release the last executed phase (super-user only)
        #[arg(long)]
        sign: bool,

        /// Output the final status and reports as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start an interactive line-oriented session on stdin
    ///
    /// Type `help` inside the session for the command list.
    Session {
        /// Initial session role
        #[arg(long, default_value = "entrepreneur")]
        role: Role,
    },

    /// Show the effective configuration and where each value came from
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Operation name used in error reports.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Phases { .. } => "phases",
            Self::Vendors { .. } => "vendors",
            Self::Run { .. } => "run",
            Self::Session { .. } => "session",
            Self::Config { .. } => "config",
        }
    }
}
