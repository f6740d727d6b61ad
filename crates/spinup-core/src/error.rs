//! Error types for spinup-core

use spinup_rs::SpinupError;
use thiserror::Error;

/// Errors that stop a deployment
#[derive(Error, Debug)]
pub enum DeployError {
    /// The chosen flow is missing required inputs; nothing has been executed
    #[error("{flow} deployment requires {}", .missing.join(", "))]
    MissingFields {
        flow: &'static str,
        missing: Vec<&'static str>,
    },

    /// An external tool failed or could not be run
    #[error(transparent)]
    Tool(#[from] SpinupError),
}

impl DeployError {
    pub fn exit_code(&self) -> i32 {
        match self {
            DeployError::MissingFields { .. } => 1,
            DeployError::Tool(err) => err.exit_code(),
        }
    }
}
