//! Exec command handler: one question, one answer, then exit.

use anyhow::{Context, Result};
use ask_core::config::Config;
use ask_core::providers;
use ask_core::transcript::{self, Answer, Controller, ERROR_SENTINEL};

pub async fn run(prompt: &str, config: &Config) -> Result<()> {
    let mut controller = Controller::new(config.answer_routing);
    controller.input_mut().push_str(prompt);
    let Some(query) = controller.submit() else {
        anyhow::bail!("Prompt is empty");
    };

    let provider = providers::from_config(config).context("configure provider")?;
    tracing::info!(model = %provider.model(), "exec");

    let settled = transcript::ask(provider.as_ref(), query).await;
    let Some(id) = controller.settle(settled) else {
        anyhow::bail!(ERROR_SENTINEL);
    };

    match controller.transcript().get(id).map(|exchange| exchange.answer()) {
        Some(Answer::Resolved(text)) => {
            println!("{text}");
            Ok(())
        }
        // The raw cause is already in the log file.
        _ => anyhow::bail!(ERROR_SENTINEL),
    }
}
