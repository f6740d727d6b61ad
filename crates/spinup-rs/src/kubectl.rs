//! kubectl command execution
//!
//! Every command is pinned to an explicit kubeconfig path.

use crate::error::SpinupError;
use crate::runner::{Runner, run_checked};
use std::path::Path;

pub const KUBECTL: &str = "kubectl";

fn kubectl_args(kubeconfig: &str) -> Vec<String> {
    vec![
        KUBECTL.to_string(),
        "--kubeconfig".to_string(),
        kubeconfig.to_string(),
    ]
}

pub fn create_namespace_args(kubeconfig: &str, namespace: &str) -> Vec<String> {
    let mut args = kubectl_args(kubeconfig);
    args.extend(["create".to_string(), "ns".to_string(), namespace.to_string()]);
    args
}

/// `kubectl create secret docker-registry` parameters
#[derive(Debug, Clone)]
pub struct DockerRegistrySecret<'a> {
    pub name: &'a str,
    pub namespace: &'a str,
    pub server: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub email: &'a str,
}

impl DockerRegistrySecret<'_> {
    pub fn create_args(&self, kubeconfig: &str) -> Vec<String> {
        let mut args = kubectl_args(kubeconfig);
        args.extend([
            "create".to_string(),
            "secret".to_string(),
            "docker-registry".to_string(),
            self.name.to_string(),
            "--docker-server".to_string(),
            self.server.to_string(),
            "--docker-username".to_string(),
            self.username.to_string(),
            "--docker-password".to_string(),
            self.password.to_string(),
            "--docker-email".to_string(),
            self.email.to_string(),
            "--namespace".to_string(),
            self.namespace.to_string(),
        ]);
        args
    }
}

/// Args for a generic secret holding one file under `key`
pub fn file_secret_args(
    kubeconfig: &str,
    name: &str,
    key: &str,
    path: &Path,
    namespace: &str,
) -> Vec<String> {
    let mut args = kubectl_args(kubeconfig);
    args.extend([
        "create".to_string(),
        "secret".to_string(),
        "generic".to_string(),
        name.to_string(),
        format!("--from-file={}={}", key, path.display()),
        "--namespace".to_string(),
        namespace.to_string(),
    ]);
    args
}

/// Executes: kubectl --kubeconfig <kubeconfig> create ns <namespace>
pub fn create_namespace(
    runner: &dyn Runner,
    kubeconfig: &str,
    namespace: &str,
) -> Result<(), SpinupError> {
    run_checked(runner, &create_namespace_args(kubeconfig, namespace), None)?;
    Ok(())
}

/// Create an image pull secret; the password never reaches the log
pub fn create_docker_registry_secret(
    runner: &dyn Runner,
    kubeconfig: &str,
    secret: &DockerRegistrySecret<'_>,
) -> Result<(), SpinupError> {
    run_checked(runner, &secret.create_args(kubeconfig), Some(secret.password))?;
    Ok(())
}

pub fn create_file_secret(
    runner: &dyn Runner,
    kubeconfig: &str,
    name: &str,
    key: &str,
    path: &Path,
    namespace: &str,
) -> Result<(), SpinupError> {
    run_checked(
        runner,
        &file_secret_args(kubeconfig, name, key, path, namespace),
        None,
    )?;
    Ok(())
}
