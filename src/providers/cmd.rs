use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::errors::{CfManageError, CfManageResult};
use crate::providers::{CommandRunner, Invocation, OutputMode};

/// Spawns real OS processes
#[derive(Debug, Clone)]
pub struct CmdProvider {
    echo: bool,
}

impl Default for CmdProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CmdProvider {
    /// Echo captured output to our own stdout/stderr as it arrives
    pub fn new() -> Self {
        Self { echo: true }
    }

    /// Capture without echoing
    pub fn quiet() -> Self {
        Self { echo: false }
    }
}

#[async_trait]
impl CommandRunner for CmdProvider {
    #[instrument(skip(self, invocation), fields(cmd = %invocation))]
    async fn run(&self, invocation: &Invocation) -> CfManageResult<String> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);

        match invocation.mode {
            OutputMode::Inherit => {
                cmd.stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit());
            }
            OutputMode::Capture => {
                cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
            }
        }

        let mut child = cmd.spawn().map_err(|source| CfManageError::Launch {
            program: invocation.program.clone(),
            source,
        })?;

        let stdout_task = child.stdout.take().map(|stdout| {
            let sink = self.echo.then(tokio::io::stdout);
            tokio::spawn(pump(stdout, sink, true))
        });
        let stderr_task = child.stderr.take().map(|stderr| {
            let sink = self.echo.then(tokio::io::stderr);
            tokio::spawn(pump(stderr, sink, false))
        });

        let status = child.wait().await?;

        let captured = join_pump(stdout_task).await;
        join_pump(stderr_task).await;

        debug!("`{}` exited with {}", invocation.program, status);

        if status.success() {
            return Ok(String::from_utf8_lossy(&captured).into_owned());
        }

        match status.code() {
            Some(code) => Err(CfManageError::ExternalCommand {
                program: invocation.program.clone(),
                code,
            }),
            None => Err(CfManageError::Terminated {
                program: invocation.program.clone(),
            }),
        }
    }
}

/// Copy a child stream chunk by chunk into an optional sink, keeping the bytes if asked to
async fn pump<R, W>(mut reader: R, mut sink: Option<W>, keep: bool) -> Vec<u8>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut kept = Vec::new();
    let mut buf = [0u8; 8192];

    loop {
        let n = match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                warn!("Error reading child output: {}", e);
                break;
            }
        };

        if keep {
            kept.extend_from_slice(&buf[..n]);
        }

        if let Some(out) = sink.as_mut() {
            // A closed parent stream must not stop the capture
            if out.write_all(&buf[..n]).await.is_err() || out.flush().await.is_err() {
                sink = None;
            }
        }
    }

    kept
}

async fn join_pump(task: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    match task {
        Some(handle) => handle.await.unwrap_or_else(|e| {
            warn!("Output task failed: {}", e);
            Vec::new()
        }),
        None => Vec::new(),
    }
}
