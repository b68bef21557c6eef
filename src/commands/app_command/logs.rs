use anyhow::Result;
use tracing::instrument;

use crate::config::ClientConfig;
use crate::providers::{CommandRunner, Invocation};

/// View app logs: recent lines by default, streaming with `follow`
#[instrument(skip(runner, config))]
pub async fn execute(runner: &impl CommandRunner, config: &ClientConfig, follow: bool) -> Result<()> {
    let mut args = vec!["logs".to_string(), config.app_name.clone()];
    if !follow {
        args.push("--recent".to_string());
    }

    runner
        .run(&Invocation::inherit(&config.cf_binary, args))
        .await?;

    Ok(())
}
