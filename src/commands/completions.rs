//! Completions command handler

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{generate, Shell as CompletionShell};
use std::io;

/// Generate a shell completion script on stdout.
#[cfg(not(tarpaulin_include))]
pub fn handle<C: CommandFactory>(shell: CompletionShell) -> Result<()> {
    let mut out = io::stdout();
    write_completions::<C>(shell, &mut out);
    Ok(())
}

pub(crate) fn write_completions<C: CommandFactory>(shell: CompletionShell, out: &mut dyn io::Write) {
    let mut cmd = C::command();
    generate(shell, &mut cmd, "heist", out);
}
