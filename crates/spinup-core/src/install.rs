//! Chart installation

use crate::types::{CHART, ClusterCredential, NAMESPACE, RELEASE};
use spinup_rs::SpinupError;
use spinup_rs::helm::{self, UpgradeInstall};
use spinup_rs::runner::Runner;
use std::path::Path;

/// Switches on the chart's enterprise components
pub const ENTERPRISE_OVERRIDE: (&str, &str) = ("anchoreEnterpriseGlobal.enabled", "true");

/// Image overrides pointing at the hardened registry
pub const HARDENED_IMAGES: [(&str, &str); 3] = [
    (
        "anchoreEnterpriseGlobal.image",
        "registry1.dso.mil/anchore/enterprise/enterprise:3.0.0",
    ),
    (
        "anchoreEnterpriseUi.image",
        "registry1.dso.mil/anchore/enterpriseui/enterpriseui:3.0.0",
    ),
    (
        "anchoreGlobal.image",
        "registry1.dso.mil/anchore/engine/engine:0.9.0",
    ),
];

/// `--set` overrides for a flavor; each flag only ever adds entries
pub fn chart_overrides(hardened: bool, enterprise: bool) -> Vec<(String, String)> {
    let mut overrides = Vec::new();
    if enterprise {
        overrides.push(ENTERPRISE_OVERRIDE);
    }
    if hardened {
        overrides.extend(HARDENED_IMAGES);
    }
    overrides
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Install the chart, or upgrade the release if it is already there
pub fn install_or_upgrade(
    runner: &dyn Runner,
    credential: &ClusterCredential,
    values: &Path,
    hardened: bool,
    enterprise: bool,
) -> Result<(), SpinupError> {
    let install = UpgradeInstall {
        namespace: NAMESPACE,
        release: RELEASE,
        chart: CHART,
        values,
        overrides: chart_overrides(hardened, enterprise),
    };
    helm::upgrade_install(runner, credential.as_str(), &install)
}
