use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::io::BufReader;

use crate::commands::{
    app_command::{delete, deploy, logs, restart, scale, status},
    server_command::serve,
};
use crate::config::{ClientConfig, ServerConfig};
use crate::providers::cmd::CmdProvider;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and push the app to Cloud Foundry
    Deploy,

    /// Show app status and connection info
    Status,

    /// Show app logs
    Logs {
        /// Stream logs instead of printing recent ones
        #[arg(short, long)]
        follow: bool,
    },

    /// Scale the app
    Scale {
        /// Number of instances
        #[arg(short, long)]
        instances: Option<u32>,

        /// Memory limit (e.g. 512M, 1G)
        #[arg(short, long)]
        memory: Option<String>,
    },

    /// Restart the app
    Restart,

    /// Delete the app
    Delete {
        /// Delete without asking for confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Serve a health endpoint in front of an upstream
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// URL that non-health requests are proxied to
        #[arg(short, long)]
        upstream: Option<String>,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let runner = CmdProvider::new();

    match cli.command {
        Commands::Deploy => deploy::execute(&runner, &ClientConfig::load()?).await,
        Commands::Status => {
            status::get_app_info(&runner, &ClientConfig::load()?).await;
            Ok(())
        }
        Commands::Logs { follow } => logs::execute(&runner, &ClientConfig::load()?, follow).await,
        Commands::Scale { instances, memory } => {
            scale::execute(&runner, &ClientConfig::load()?, instances, memory.as_deref()).await
        }
        Commands::Restart => restart::execute(&runner, &ClientConfig::load()?).await,
        Commands::Delete { force } => {
            let stdin = BufReader::new(tokio::io::stdin());
            delete::execute(&runner, &ClientConfig::load()?, force, stdin).await
        }
        Commands::Serve {
            host,
            port,
            upstream,
        } => {
            let mut config = ServerConfig::load()?;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if upstream.is_some() {
                config.upstream = upstream;
            }
            serve::execute(config).await
        }
    }
}
