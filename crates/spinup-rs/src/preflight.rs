//! Preflight checks for the external tools the deployment drives

use crate::error::SpinupError;
use crate::runner::Runner;

/// Tools that must be resolvable before anything is touched
pub const REQUIRED_TOOLS: [&str; 3] = ["k3d", "helm", "kubectl"];

/// Verify every required tool is on the execution path
pub fn preflight(runner: &dyn Runner) -> Result<(), SpinupError> {
    check_tools(runner, &REQUIRED_TOOLS)?;
    tracing::info!("Preflight checks passed");
    Ok(())
}

/// Look up each of `tools`, reporting all missing ones at once
pub fn check_tools(runner: &dyn Runner, tools: &[&str]) -> Result<(), SpinupError> {
    let mut missing = Vec::new();

    for tool in tools {
        match runner.locate(tool) {
            Some(path) => {
                tracing::info!("Found {}", tool);
                tracing::debug!("{} resolved to {}", tool, path.display());
            }
            None => {
                tracing::error!("Need to install {}", tool);
                missing.push(tool.to_string());
            }
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SpinupError::MissingTools(missing))
    }
}
