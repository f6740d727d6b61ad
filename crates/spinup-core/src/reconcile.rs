//! Cluster reconciliation
//!
//! Decides whether the requested cluster can be created, needs replacing, or
//! already exists and should be left alone.

use crate::types::{ClusterCredential, RunOptions};
use spinup_rs::SpinupError;
use spinup_rs::k3d::{self, ClusterSpec};
use spinup_rs::runner::Runner;

/// What to do about the requested cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// No cluster of that name is left; go ahead and create it
    Proceed,
    /// The cluster exists and replacement was not requested
    AlreadyExists,
}

/// Bring the cluster name to a state where it can be created
///
/// | exists | fresh | action |
/// |---|---|---|
/// | no | - | proceed |
/// | yes | true | delete, then proceed |
/// | yes | false | warn and stop |
pub fn reconcile(runner: &dyn Runner, options: &RunOptions) -> Result<Reconciliation, SpinupError> {
    let name = options.cluster_name.as_str();

    if !k3d::cluster_exists(runner, name)? {
        return Ok(Reconciliation::Proceed);
    }

    if options.fresh {
        tracing::info!("{} cluster exists. Deleting it..", name);
        k3d::delete_cluster(runner, name)?;
        return Ok(Reconciliation::Proceed);
    }

    tracing::warn!("{} already exists.", name);
    tracing::warn!("Use --fresh if you want to replace it.");
    Ok(Reconciliation::AlreadyExists)
}

/// Create the cluster and fetch the kubeconfig for it
pub fn create_cluster(
    runner: &dyn Runner,
    options: &RunOptions,
) -> Result<ClusterCredential, SpinupError> {
    let name = options.cluster_name.as_str();
    tracing::info!("Creating cluster {}", name);

    let spec = ClusterSpec {
        name,
        agents: &options.agent_count,
        loadbalancer_port: &options.loadbalancer_port,
    };
    k3d::create_cluster(runner, &spec)?;

    let credential = ClusterCredential::new(k3d::write_kubeconfig(runner, name)?);
    tracing::debug!("Using kubeconfig {}", credential);
    Ok(credential)
}
