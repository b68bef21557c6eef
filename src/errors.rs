use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for cf-manage
#[derive(Error, Debug)]
pub enum CfManageError {
    #[error("Command `{program}` failed with exit code {code}")]
    ExternalCommand { program: String, code: i32 },

    #[error("Command `{program}` was terminated by a signal")]
    Terminated { program: String },

    #[error("Failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected API response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Route has no usable `{0}` field")]
    MissingField(&'static str),

    #[error("Configuration load failed: {}: {source}", path.display())]
    ConfigLoadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML deserialization error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl CfManageError {
    /// Exit code of the external process, when it exited on its own
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            CfManageError::ExternalCommand { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Result type alias for cf-manage errors
pub type CfManageResult<T> = Result<T, CfManageError>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_exit_code_only_for_external_command() {
        let err = CfManageError::ExternalCommand {
            program: "cf".to_string(),
            code: 3,
        };
        assert_eq!(err.exit_code(), Some(3));
        assert_eq!(format!("{}", err), "Command `cf` failed with exit code 3");

        let err = CfManageError::Terminated {
            program: "cf".to_string(),
        };
        assert_eq!(err.exit_code(), None);
    }
}
