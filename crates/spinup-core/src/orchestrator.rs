//! Deployment orchestration
//!
//! Runs the full pipeline for one flavor:
//!
//! 1. Validate the flavor request (no external calls before this passes)
//! 2. Check `k3d`, `helm`, and `kubectl` are installed
//! 3. Reconcile the cluster name (create, replace, or stop)
//! 4. Create the cluster and fetch its kubeconfig
//! 5. Create the application namespace
//! 6. Create the pull secret (and the license secret for enterprise)
//! 7. Install or upgrade the chart
//!
//! Every step blocks until its tool exits. The first failure ends the run and
//! nothing already created is rolled back.

use crate::error::DeployError;
use crate::install;
use crate::reconcile::{self, Reconciliation};
use crate::secrets;
use crate::types::{ClusterCredential, Flavor, FlavorRequest, RunOptions};
use spinup_rs::preflight;
use spinup_rs::runner::Runner;
use std::time::Instant;

/// How a run ended, short of an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The chart was installed into a new cluster
    Deployed { credential: ClusterCredential },
    /// A cluster of that name already exists and `fresh` was not set
    ClusterExists { name: String },
}

/// Shell command that points an operator's `KUBECONFIG` at the cluster
pub fn kubeconfig_hint(cluster_name: &str) -> String {
    format!("export KUBECONFIG=$(k3d kubeconfig write {})", cluster_name)
}

/// Drives one deployment run
pub struct Orchestrator<'a> {
    runner: &'a dyn Runner,
    options: &'a RunOptions,
}

impl<'a> Orchestrator<'a> {
    pub fn new(runner: &'a dyn Runner, options: &'a RunOptions) -> Self {
        Self { runner, options }
    }

    /// Run the pipeline for `request`
    pub fn run(&self, request: FlavorRequest) -> Result<Outcome, DeployError> {
        let start = Instant::now();
        let flavor = request.validate(self.options.hardened)?;

        tracing::info!("Spinning up {}", flavor.name());
        preflight(self.runner)?;

        if reconcile::reconcile(self.runner, self.options)? == Reconciliation::AlreadyExists {
            return Ok(Outcome::ClusterExists {
                name: self.options.cluster_name.clone(),
            });
        }

        let credential = reconcile::create_cluster(self.runner, self.options)?;
        secrets::create_namespace(self.runner, &credential)?;
        self.provision_secrets(&credential, &flavor)?;

        install::install_or_upgrade(
            self.runner,
            &credential,
            &self.options.values,
            self.options.hardened,
            flavor.enterprise_mode(),
        )?;

        tracing::info!("{}", kubeconfig_hint(&self.options.cluster_name));
        tracing::info!("Finished {} in {:?}", flavor.name(), start.elapsed());

        Ok(Outcome::Deployed { credential })
    }

    fn provision_secrets(
        &self,
        credential: &ClusterCredential,
        flavor: &Flavor,
    ) -> Result<(), DeployError> {
        let hardened = self.options.hardened;
        match flavor {
            Flavor::Standard { pull: None } => {}
            Flavor::Standard { pull: Some(pull) } => {
                secrets::create_pull_credential(self.runner, credential, pull, hardened)?;
            }
            // Enterprise always gets a pull secret; its registry still follows `hardened`
            Flavor::Licensed { pull, license } => {
                secrets::create_pull_credential(self.runner, credential, pull, hardened)?;
                secrets::create_license_secret(self.runner, credential, license)?;
            }
        }
        Ok(())
    }
}
