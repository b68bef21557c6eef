use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt};
use tracing::{info, instrument};

use crate::config::ClientConfig;
use crate::providers::{CommandRunner, Invocation};

/// Whether an answer to the confirmation prompt means yes
pub fn is_confirmation(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Delete the app, asking for confirmation on `input` unless `force` is set
#[instrument(skip(runner, config, input))]
pub async fn execute<R>(
    runner: &impl CommandRunner,
    config: &ClientConfig,
    force: bool,
    mut input: R,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    if !force {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(b"Are you sure you want to delete the application? (y/N): ")
            .await?;
        stdout.flush().await?;

        let mut answer = String::new();
        input
            .read_line(&mut answer)
            .await
            .context("Failed to read confirmation")?;

        if !is_confirmation(&answer) {
            println!("Deletion cancelled");
            return Ok(());
        }
    }

    println!("Deleting application...");
    runner
        .run(&Invocation::capture(
            &config.cf_binary,
            ["delete", config.app_name.as_str(), "-f"],
        ))
        .await?;

    info!("Deleted app '{}'", config.app_name);
    println!("Application deleted");

    Ok(())
}
