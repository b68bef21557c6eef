pub mod cmd;

use async_trait::async_trait;

use crate::errors::CfManageResult;

/// How a child's output is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Pipe stdout (accumulated and echoed) and stderr (echoed only)
    Capture,
    /// Connect the child directly to our own stdio
    Inherit,
}

/// A single external command call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub mode: OutputMode,
}

impl Invocation {
    pub fn new<I, S>(program: &str, args: I, mode: OutputMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            mode,
        }
    }

    pub fn capture<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(program, args, OutputMode::Capture)
    }

    pub fn inherit<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(program, args, OutputMode::Inherit)
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Runs external commands.
///
/// Resolves with captured stdout on exit code 0 (empty in inherit mode).
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, invocation: &Invocation) -> CfManageResult<String>;
}

#[cfg(test)]
pub mod test {
    use super::*;
    use crate::errors::CfManageError;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Canned outcome for one expected call
    pub enum Reply {
        Output(String),
        Exit(i32),
        NotFound,
    }

    /// Replays scripted replies in order and records every invocation
    #[derive(Default)]
    pub struct TestRunner {
        replies: Mutex<VecDeque<Reply>>,
        calls: Mutex<Vec<Invocation>>,
    }

    impl TestRunner {
        pub fn new(replies: Vec<Reply>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<Invocation> {
            self.calls.lock().unwrap().clone()
        }

        pub fn command_lines(&self) -> Vec<String> {
            self.calls().iter().map(ToString::to_string).collect()
        }
    }

    #[async_trait]
    impl CommandRunner for TestRunner {
        async fn run(&self, invocation: &Invocation) -> CfManageResult<String> {
            self.calls.lock().unwrap().push(invocation.clone());

            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Reply::Output(String::new()));

            match reply {
                Reply::Output(_) if invocation.mode == OutputMode::Inherit => Ok(String::new()),
                Reply::Output(out) => Ok(out),
                Reply::Exit(code) => Err(CfManageError::ExternalCommand {
                    program: invocation.program.clone(),
                    code,
                }),
                Reply::NotFound => Err(CfManageError::Launch {
                    program: invocation.program.clone(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                }),
            }
        }
    }

    #[test]
    fn test_invocation_display() {
        let inv = Invocation::capture("cf", ["curl", "/v3/apps"]);
        assert_eq!(inv.to_string(), "cf curl /v3/apps");
        assert_eq!(inv.mode, OutputMode::Capture);
    }
}
