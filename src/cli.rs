//! CLI definitions for heist
//!
//! The clap structure lives here, apart from main.rs, so command handlers and
//! tests can reach it.

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell as CompletionShell;
use std::path::PathBuf;

/// Version string: the package version, plus the git commit for dev builds.
#[cfg(feature = "release")]
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
#[cfg(not(feature = "release"))]
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("VERGEN_GIT_SHA"), ")");

/// Build clap styles.
pub fn build_cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::White.on_default())
        .valid(AnsiColor::White.on_default())
        .invalid(AnsiColor::Red.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
}

#[derive(Parser)]
#[command(name = "heist")]
#[command(about = "Inspect art event files: list records, loop over events, scan tags")]
#[command(
    long_about = "heist - typed record lookup and filtered event loops over art event files.

Records are named by quicktags of the form TYPE_MODULE[_INSTANCE[_PROCESS]],
the same spelling as the record names in a file. A type ending in 's' is read
as a collection of the singular type (except art::TriggerResults).

QUICK START:
    heist ls run42.events                      List records in a file
    heist events run42.events --max 10         Print the first 10 event labels
    heist scan run42.events --tag gm2calo::CrystalHitArtRecords_islandFitterDAQ_fitter

Named tags from ~/.config/heist/config.toml are used as @name."
)]
#[command(version = VERSION)]
#[command(styles = build_cli_styles())]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Use this config file instead of ~/.config/heist/config.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the records stored in event files
    #[command(long_about = "List the records stored in event files.

With --counts, also prints the element count of each record at the first
event; empty records are skipped, missing ones are shown as ???? when
show_failed is set in the config.

EXAMPLES:
    heist ls run42.events
    heist ls run42.events --pattern crystal
    heist ls run42.events --counts")]
    Ls {
        /// Event files, read in order
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Only records containing this text (case-insensitive)
        #[arg(long, short)]
        pattern: Option<String>,
        /// Only records matching this regular expression (not implemented)
        #[arg(long)]
        regex: Option<String>,
        /// Print element counts at the first event
        #[arg(long)]
        counts: bool,
    },

    /// Print the label of each event
    #[command(long_about = "Print the run/subrun/event label of each event.

EXAMPLES:
    heist events run42.events
    heist events run42.events run43.events --max 100
    heist events run42.events --select 0,5,9 --short")]
    Events {
        /// Event files, read in order
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[command(flatten)]
        selection: Selection,
        /// Print labels as r<run>s<subrun>e<event>
        #[arg(long)]
        short: bool,
    },

    /// Print the element count of one record at each event
    #[command(long_about = "Print the element count of one record at each event.

The tag is a quicktag or @name for a tag in the config file. Events where the
record is missing or empty print '-'.

EXAMPLES:
    heist scan run42.events --tag gm2calo::CrystalHitArtRecords_islandFitterDAQ_fitter
    heist scan run42.events --tag @xtal --max 20")]
    Scan {
        /// Event files, read in order
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Quicktag or @name of the record to scan
        #[arg(long, short)]
        tag: String,
        #[command(flatten)]
        selection: Selection,
    },

    /// Show size, event count and process of each file
    Info {
        /// Event files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

/// Event selection shared by the looping commands.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct Selection {
    /// Stop after this many events
    #[arg(long, short = 'n')]
    pub max: Option<usize>,
    /// Only these zero-based event positions (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub select: Vec<usize>,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration as TOML
    Show,
    /// Print the config file location
    Path,
}
