//! Namespace and secret provisioning inside the new cluster

use crate::types::{
    ClusterCredential, DEFAULT_REGISTRY, HARDENED_REGISTRY, LICENSE_KEY, LICENSE_SECRET,
    NAMESPACE, PULL_SECRET, PullCredentials,
};
use spinup_rs::SpinupError;
use spinup_rs::keychain;
use spinup_rs::kubectl::{self, DockerRegistrySecret};
use spinup_rs::runner::Runner;
use std::path::Path;

/// Registry the pull secret authenticates against
pub fn registry_host(hardened: bool) -> &'static str {
    if hardened {
        HARDENED_REGISTRY
    } else {
        DEFAULT_REGISTRY
    }
}

/// Create the application namespace
pub fn create_namespace(
    runner: &dyn Runner,
    credential: &ClusterCredential,
) -> Result<(), SpinupError> {
    kubectl::create_namespace(runner, credential.as_str(), NAMESPACE)
}

/// Create the image pull secret, reading the password from the keychain
pub fn create_pull_credential(
    runner: &dyn Runner,
    credential: &ClusterCredential,
    pull: &PullCredentials,
    hardened: bool,
) -> Result<(), SpinupError> {
    let server = registry_host(hardened);
    let password = keychain::find_internet_password(runner, &pull.username)?;

    tracing::info!("Creating pull secret for {} on {}", pull.username, server);
    let secret = DockerRegistrySecret {
        name: PULL_SECRET,
        namespace: NAMESPACE,
        server,
        username: &pull.username,
        password: &password,
        email: &pull.email,
    };
    kubectl::create_docker_registry_secret(runner, credential.as_str(), &secret)
}

/// Store the license file as a secret
pub fn create_license_secret(
    runner: &dyn Runner,
    credential: &ClusterCredential,
    license: &Path,
) -> Result<(), SpinupError> {
    kubectl::create_file_secret(
        runner,
        credential.as_str(),
        LICENSE_SECRET,
        LICENSE_KEY,
        license,
        NAMESPACE,
    )
}
