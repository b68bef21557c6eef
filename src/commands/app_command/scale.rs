use anyhow::Result;
use tracing::{info, instrument};

use crate::commands::app_command::status;
use crate::config::ClientConfig;
use crate::providers::{CommandRunner, Invocation};

/// Scale instances and/or memory, then show the new status
#[instrument(skip(runner, config))]
pub async fn execute(
    runner: &impl CommandRunner,
    config: &ClientConfig,
    instances: Option<u32>,
    memory: Option<&str>,
) -> Result<()> {
    let mut args = vec!["scale".to_string(), config.app_name.clone()];

    if let Some(instances) = instances {
        args.push("-i".to_string());
        args.push(instances.to_string());
    }

    if let Some(memory) = memory {
        args.push("-m".to_string());
        args.push(memory.to_string());
    }

    runner
        .run(&Invocation::capture(&config.cf_binary, args))
        .await?;
    info!("Scaled app '{}'", config.app_name);

    status::get_app_info(runner, config).await;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::providers::test::{Reply, TestRunner};

    #[tokio::test]
    async fn test_scale_instances_and_memory() {
        let runner = TestRunner::default();
        execute(&runner, &ClientConfig::default(), Some(3), Some("1G"))
            .await
            .unwrap();

        assert_eq!(
            runner.command_lines()[0],
            "cf scale playwright-mcp-server -i 3 -m 1G"
        );
    }

    #[tokio::test]
    async fn test_scale_without_options() {
        let runner = TestRunner::default();
        execute(&runner, &ClientConfig::default(), None, None)
            .await
            .unwrap();

        assert_eq!(runner.command_lines()[0], "cf scale playwright-mcp-server");
    }

    #[tokio::test]
    async fn test_scale_failure_propagates() {
        let runner = TestRunner::new(vec![Reply::Exit(1)]);
        assert!(execute(&runner, &ClientConfig::default(), Some(2), None)
            .await
            .is_err());
        assert_eq!(runner.calls().len(), 1);
    }
}
