//! Error types for spinup-rs

use thiserror::Error;

/// Errors that can occur when invoking the external tools
#[derive(Error, Debug)]
pub enum SpinupError {
    /// One or more required tools are not on the execution path
    #[error("Missing required tools: {}", .0.join(", "))]
    MissingTools(Vec<String>),

    /// The process could not be started at all
    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// An empty argument vector was handed to the runner
    #[error("Cannot run an empty command line")]
    EmptyCommand,

    /// The process ran but exited non-zero
    #[error("`{command}` exited with status {code}")]
    CommandFailed {
        /// Command line, with secrets redacted
        command: String,
        /// Exit code reported by the tool
        code: i32,
        /// Output captured from the tool
        output: String,
    },

    /// IO error while reading process output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpinupError {
    /// Process exit status this error should terminate the program with
    pub fn exit_code(&self) -> i32 {
        match self {
            SpinupError::CommandFailed { code, .. } if *code != 0 => *code,
            _ => 1,
        }
    }

    /// Diagnostic output captured from the failing tool, if any
    pub fn output(&self) -> Option<&str> {
        match self {
            SpinupError::CommandFailed { output, .. } if !output.trim().is_empty() => {
                Some(output.as_str())
            }
            _ => None,
        }
    }
}
