//! heist - CLI entry point

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, ConfigCommands};
use heist::Config;

#[cfg(not(tarpaulin_include))]
fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    init_tracing(cli.verbose, &config);

    match cli.command {
        Commands::Ls {
            files,
            pattern,
            regex,
            counts,
        } => commands::ls::handle(&files, pattern, regex, counts, &config),
        Commands::Events {
            files,
            selection,
            short,
        } => commands::events::handle(&files, &selection, short, &config),
        Commands::Scan {
            files,
            tag,
            selection,
        } => commands::scan::handle(&files, &tag, &selection, &config),
        Commands::Info { files } => commands::info::handle(&files, &config),
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(&config),
            ConfigCommands::Path => commands::config::handle_path(cli.config.as_deref()),
        },
        Commands::Completions { shell } => commands::completions::handle::<Cli>(shell),
    }
}

/// Install the stderr log subscriber.
///
/// RUST_LOG wins, then `-v`/`-vv`, then `[log] filter`, then "warn".
fn init_tracing(verbose: u8, config: &Config) {
    let fallback = match verbose {
        0 => config.log.filter.clone().unwrap_or_else(|| "warn".to_string()),
        1 => "heist=debug".to_string(),
        _ => "heist=trace".to_string(),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
