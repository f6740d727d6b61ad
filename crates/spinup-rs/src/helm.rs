//! helm command execution

use crate::error::SpinupError;
use crate::runner::{Runner, run_checked};
use std::path::Path;

pub const HELM: &str = "helm";

/// `helm upgrade --install` parameters
#[derive(Debug, Clone)]
pub struct UpgradeInstall<'a> {
    pub namespace: &'a str,
    pub release: &'a str,
    pub chart: &'a str,
    pub values: &'a Path,
    /// `--set` overrides, applied in order
    pub overrides: Vec<(String, String)>,
}

impl UpgradeInstall<'_> {
    pub fn args(&self, kubeconfig: &str) -> Vec<String> {
        let mut args = vec![
            HELM.to_string(),
            "--kubeconfig".to_string(),
            kubeconfig.to_string(),
            "upgrade".to_string(),
            "--namespace".to_string(),
            self.namespace.to_string(),
            "--install".to_string(),
            self.release.to_string(),
            self.chart.to_string(),
            "--values".to_string(),
            self.values.display().to_string(),
        ];
        for (key, value) in &self.overrides {
            args.push("--set".to_string());
            args.push(format!("{}={}", key, value));
        }
        args
    }
}

/// Executes: helm --kubeconfig <kubeconfig> upgrade --install ...
pub fn upgrade_install(
    runner: &dyn Runner,
    kubeconfig: &str,
    install: &UpgradeInstall<'_>,
) -> Result<(), SpinupError> {
    run_checked(runner, &install.args(kubeconfig), None)?;
    Ok(())
}
