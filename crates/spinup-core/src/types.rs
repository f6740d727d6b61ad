//! Domain types for spinup
//!
//! These types describe one deployment run. Nothing here outlives the
//! process; all durable state lives in k3d and the cluster itself.

use crate::error::DeployError;
use std::path::PathBuf;

/// Namespace the application and its secrets live in
pub const NAMESPACE: &str = "anchore";
/// Helm release name
pub const RELEASE: &str = "anchore";
/// Helm chart reference
pub const CHART: &str = "anchore/anchore-engine";
/// Image pull secret name
pub const PULL_SECRET: &str = "anchore-enterprise-pullcreds";
/// License secret name
pub const LICENSE_SECRET: &str = "anchore-enterprise-license";
/// Key the license file is stored under in [`LICENSE_SECRET`]
pub const LICENSE_KEY: &str = "license.yaml";

/// Registry for hardened (Iron Bank) images
pub const HARDENED_REGISTRY: &str = "registry1.dso.mil";
/// Public default registry
pub const DEFAULT_REGISTRY: &str = "docker.io";

pub const DEFAULT_CLUSTER_NAME: &str = "anchore";
pub const DEFAULT_AGENT_COUNT: &str = "3";
pub const DEFAULT_LOADBALANCER_PORT: &str = "8080";

/// Options shared by every step of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Pull images from the hardened registry
    pub hardened: bool,
    /// Replace an existing cluster of the same name
    pub fresh: bool,
    pub cluster_name: String,
    pub agent_count: String,
    pub loadbalancer_port: String,
    /// Chart values file
    pub values: PathBuf,
}

#[cfg(test)]
impl Default for RunOptions {
    fn default() -> Self {
        Self {
            hardened: false,
            fresh: false,
            cluster_name: DEFAULT_CLUSTER_NAME.to_string(),
            agent_count: DEFAULT_AGENT_COUNT.to_string(),
            loadbalancer_port: DEFAULT_LOADBALANCER_PORT.to_string(),
            values: PathBuf::from("values.yaml"),
        }
    }
}

/// Deployment flavor as requested on the command line, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlavorRequest {
    /// Anchore Engine
    Standard {
        username: Option<String>,
        email: Option<String>,
    },
    /// Anchore Enterprise, which needs a license
    Licensed {
        username: Option<String>,
        email: Option<String>,
        license: Option<PathBuf>,
    },
}

/// Registry account used for the image pull secret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullCredentials {
    pub username: String,
    pub email: String,
}

/// A validated deployment flavor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flavor {
    Standard {
        /// Present only for hardened installs
        pull: Option<PullCredentials>,
    },
    Licensed {
        pull: PullCredentials,
        license: PathBuf,
    },
}

impl Flavor {
    pub fn name(&self) -> &'static str {
        match self {
            Flavor::Standard { .. } => "engine",
            Flavor::Licensed { .. } => "enterprise",
        }
    }

    /// Whether the chart's enterprise features are switched on
    pub fn enterprise_mode(&self) -> bool {
        matches!(self, Flavor::Licensed { .. })
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl FlavorRequest {
    /// Check the request carries everything its flow needs.
    ///
    /// All missing fields are reported together.
    pub fn validate(self, hardened: bool) -> Result<Flavor, DeployError> {
        match self {
            FlavorRequest::Standard { username, email } => {
                if !hardened {
                    return Ok(Flavor::Standard { pull: None });
                }
                match (present(username), present(email)) {
                    (Some(username), Some(email)) => Ok(Flavor::Standard {
                        pull: Some(PullCredentials { username, email }),
                    }),
                    (username, email) => {
                        let mut missing = Vec::new();
                        if username.is_none() {
                            missing.push("username");
                        }
                        if email.is_none() {
                            missing.push("email");
                        }
                        Err(DeployError::MissingFields {
                            flow: "hardened engine",
                            missing,
                        })
                    }
                }
            }
            FlavorRequest::Licensed {
                username,
                email,
                license,
            } => {
                let license = license.filter(|p| !p.as_os_str().is_empty());
                match (present(username), present(email), license) {
                    (Some(username), Some(email), Some(license)) => Ok(Flavor::Licensed {
                        pull: PullCredentials { username, email },
                        license,
                    }),
                    (username, email, license) => {
                        let mut missing = Vec::new();
                        if username.is_none() {
                            missing.push("username");
                        }
                        if email.is_none() {
                            missing.push("email");
                        }
                        if license.is_none() {
                            missing.push("license");
                        }
                        Err(DeployError::MissingFields {
                            flow: "enterprise",
                            missing,
                        })
                    }
                }
            }
        }
    }
}

/// Path to the kubeconfig written for the cluster
///
/// Every command after cluster creation is pinned to this file rather than
/// the operator's default kubeconfig.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterCredential(String);

impl ClusterCredential {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClusterCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
