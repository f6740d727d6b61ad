//! k3d command execution
//!
//! Cluster lifecycle and kubeconfig extraction. Cluster creation never
//! touches the operator's default kubeconfig or current context; callers get
//! an explicit kubeconfig path from [`write_kubeconfig`] instead.

use crate::error::SpinupError;
use crate::runner::{Runner, run_checked};

pub const K3D: &str = "k3d";

/// Parameters for `k3d cluster create`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSpec<'a> {
    pub name: &'a str,
    /// Number of agent (worker) nodes
    pub agents: &'a str,
    /// Local port mapped to port 80 of the cluster load balancer
    pub loadbalancer_port: &'a str,
}

impl ClusterSpec<'_> {
    pub fn create_args(&self) -> Vec<String> {
        vec![
            K3D.to_string(),
            "cluster".to_string(),
            "create".to_string(),
            self.name.to_string(),
            "--agents".to_string(),
            self.agents.to_string(),
            "--update-default-kubeconfig=false".to_string(),
            "--switch-context=false".to_string(),
            "--port".to_string(),
            format!("{}:80@loadbalancer", self.loadbalancer_port),
            "--wait=true".to_string(),
        ]
    }
}

pub fn cluster_get_args(name: &str) -> Vec<String> {
    vec![K3D.into(), "cluster".into(), "get".into(), name.into()]
}

pub fn cluster_delete_args(name: &str) -> Vec<String> {
    vec![K3D.into(), "cluster".into(), "delete".into(), name.into()]
}

pub fn kubeconfig_write_args(name: &str) -> Vec<String> {
    vec![K3D.into(), "kubeconfig".into(), "write".into(), name.into()]
}

/// Whether a cluster called `name` exists
///
/// Executes: k3d cluster get <name>
///
/// Only the exit status matters; a non-zero exit means "no such cluster".
pub fn cluster_exists(runner: &dyn Runner, name: &str) -> Result<bool, SpinupError> {
    let result = runner.stream(&cluster_get_args(name), None)?;
    Ok(result.success())
}

/// Executes: k3d cluster delete <name>
pub fn delete_cluster(runner: &dyn Runner, name: &str) -> Result<(), SpinupError> {
    run_checked(runner, &cluster_delete_args(name), None)?;
    Ok(())
}

/// Create a cluster and block until it is ready
pub fn create_cluster(runner: &dyn Runner, spec: &ClusterSpec<'_>) -> Result<(), SpinupError> {
    run_checked(runner, &spec.create_args(), None)?;
    Ok(())
}

/// Write the cluster's kubeconfig and return its path
///
/// Executes: k3d kubeconfig write <name>
pub fn write_kubeconfig(runner: &dyn Runner, name: &str) -> Result<String, SpinupError> {
    let argv = kubeconfig_write_args(name);
    let output = runner.capture(&argv)?;

    if !output.success() {
        return Err(SpinupError::CommandFailed {
            command: argv.join(" "),
            code: output.exit_code,
            output: format!("{}{}", output.stdout, output.stderr),
        });
    }

    Ok(output.stdout.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingCapture, capture_logs};

    #[test]
    fn test_create_args_disable_context_mutation() {
        let spec = ClusterSpec {
            name: "anchore",
            agents: "3",
            loadbalancer_port: "8080",
        };
        assert_eq!(
            spec.create_args().join(" "),
            "k3d cluster create anchore --agents 3 --update-default-kubeconfig=false \
             --switch-context=false --port 8080:80@loadbalancer --wait=true"
        );
    }

    #[test]
    fn test_query_args() {
        assert_eq!(cluster_get_args("dev").join(" "), "k3d cluster get dev");
        assert_eq!(cluster_delete_args("dev").join(" "), "k3d cluster delete dev");
        assert_eq!(
            kubeconfig_write_args("dev").join(" "),
            "k3d kubeconfig write dev"
        );
    }

    #[test]
    fn test_kubeconfig_failure_carries_output_without_logging_it() {
        let runner = FailingCapture {
            exit_code: 1,
            stdout: "partial\n",
            stderr: "cluster 'dev' not found\n",
        };
        let (result, logged) = capture_logs(|| write_kubeconfig(&runner, "dev"));

        match result {
            Err(SpinupError::CommandFailed { command, code, output }) => {
                assert_eq!(command, "k3d kubeconfig write dev");
                assert_eq!(code, 1);
                assert_eq!(output, "partial\ncluster 'dev' not found\n");
            }
            other => panic!("expected CommandFailed, got {:?}", other),
        }
        assert!(!logged.contains("not found"));
    }
}
