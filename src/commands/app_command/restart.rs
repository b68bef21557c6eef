use anyhow::Result;
use tracing::{info, instrument};

use crate::commands::app_command::status;
use crate::config::ClientConfig;
use crate::providers::{CommandRunner, Invocation};

#[instrument(skip_all, fields(app = %config.app_name))]
pub async fn execute(runner: &impl CommandRunner, config: &ClientConfig) -> Result<()> {
    println!("Restarting application...");
    runner
        .run(&Invocation::capture(
            &config.cf_binary,
            ["restart", config.app_name.as_str()],
        ))
        .await?;
    info!("Restarted app '{}'", config.app_name);

    status::get_app_info(runner, config).await;

    Ok(())
}
