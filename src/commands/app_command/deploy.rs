use anyhow::{anyhow, Context, Result};
use tracing::{info, instrument};

use crate::commands::app_command::status;
use crate::config::ClientConfig;
use crate::providers::{CommandRunner, Invocation};

/// Build locally, push to the platform, then report where the app lives
#[instrument(skip_all, fields(app = %config.app_name))]
pub async fn execute(runner: &impl CommandRunner, config: &ClientConfig) -> Result<()> {
    println!("Starting deployment...");

    if let Some((program, args)) = config.build_command.split_first() {
        println!("Building application...");
        runner
            .run(&Invocation::capture(program, args.iter().cloned()))
            .await
            .context("Build failed")?;
    } else {
        return Err(anyhow!("Build command is empty"));
    }

    println!("Pushing to Cloud Foundry...");
    runner
        .run(&Invocation::capture(&config.cf_binary, ["push"]))
        .await
        .context("Push failed")?;

    info!("Deployed app '{}'", config.app_name);
    println!("Deployment complete!");

    status::get_app_info(runner, config).await;

    Ok(())
}
