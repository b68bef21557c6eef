use tracing::{debug, error, instrument};

use crate::config::ClientConfig;
use crate::errors::CfManageResult;
use crate::models::{AppDescriptor, ConnectionInfo, ResourceList, RouteDescriptor};
use crate::providers::{CommandRunner, Invocation};

/// Show app status and, when the app has a route, how to connect to it.
///
/// Best effort: failures are logged and swallowed so they never abort the command that
/// asked for the report. Output already printed before a failure stays printed.
#[instrument(skip_all, fields(app = %config.app_name))]
pub async fn get_app_info(
    runner: &impl CommandRunner,
    config: &ClientConfig,
) -> Option<ConnectionInfo> {
    match connection_info(runner, config).await {
        Ok(info) => info,
        Err(e) => {
            error!("Failed to get app info: {}", e);
            eprintln!("Failed to get app info: {}", e);
            None
        }
    }
}

async fn connection_info(
    runner: &impl CommandRunner,
    config: &ClientConfig,
) -> CfManageResult<Option<ConnectionInfo>> {
    let cf = config.cf_binary.as_str();

    println!("Application Status:");
    runner
        .run(&Invocation::inherit(cf, ["app", config.app_name.as_str()]))
        .await?;

    let names = urlencoding::encode(&config.app_name);
    let apps = runner
        .run(&Invocation::capture(
            cf,
            ["curl".to_string(), format!("/v3/apps?names={}", names)],
        ))
        .await?;
    let app = match serde_json::from_str::<ResourceList<AppDescriptor>>(&apps)?.into_first() {
        Some(app) => app,
        None => {
            debug!("No app named '{}' on the platform", config.app_name);
            return Ok(None);
        }
    };

    let routes = runner
        .run(&Invocation::capture(
            cf,
            ["curl".to_string(), format!("/v3/apps/{}/routes", app.guid)],
        ))
        .await?;
    let route = match serde_json::from_str::<ResourceList<RouteDescriptor>>(&routes)?.into_first() {
        Some(route) => route,
        None => {
            debug!("App '{}' ({}) has no routes", app.name, app.guid);
            return Ok(None);
        }
    };

    let info = ConnectionInfo::new(&route.hostname()?, &config.service_key);
    println!("{}", info.render());

    Ok(Some(info))
}
