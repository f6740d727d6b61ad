//! spinup-core: deployment pipeline for local Anchore clusters
//!
//! Reconciles a k3d cluster, provisions registry and license secrets, and
//! installs the Anchore chart, in that order, stopping at the first failure.

pub mod error;
pub mod install;
pub mod orchestrator;
pub mod reconcile;
pub mod secrets;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use error::DeployError;
pub use orchestrator::{Orchestrator, Outcome, kubeconfig_hint};
pub use types::*;
