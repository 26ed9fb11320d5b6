//! Chat command handler (the default when no subcommand is given).

use std::io::{IsTerminal, Read};

use anyhow::Result;
use ask_core::config::Config;

use super::exec;

pub async fn run(config: &Config) -> Result<()> {
    // Piped stdin is treated as a single question.
    if !std::io::stdin().is_terminal() {
        let mut prompt = String::new();
        std::io::stdin().lock().read_to_string(&mut prompt)?;
        let prompt = prompt.trim();
        if prompt.is_empty() {
            anyhow::bail!("No input provided via pipe");
        }
        return exec::run(prompt, config).await;
    }

    run_tui(config)
}

#[cfg(feature = "tui")]
fn run_tui(config: &Config) -> Result<()> {
    use anyhow::Context;

    let provider = ask_core::providers::from_config(config).context("configure provider")?;
    ask_tui::run_interactive_chat(config, provider).context("interactive chat failed")
}

#[cfg(not(feature = "tui"))]
fn run_tui(_config: &Config) -> Result<()> {
    anyhow::bail!(
        "This build has no interactive mode.\n\
         Use `ask exec --prompt '...'` instead."
    )
}
