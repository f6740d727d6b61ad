//! spinup: spin up local k3d clusters running Anchore

use clap::{Parser, Subcommand};
use color_eyre::Result;
use spinup_core::{
    DEFAULT_AGENT_COUNT, DEFAULT_CLUSTER_NAME, DEFAULT_LOADBALANCER_PORT, DeployError,
    FlavorRequest, Orchestrator, Outcome, RunOptions,
};
use spinup_rs::SystemRunner;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::{EnvFilter, prelude::*};

/// spinup: CLI to spin up k3d Anchore clusters locally
#[derive(Parser, Debug)]
#[command(name = "spinup")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Use Iron Bank containers
    #[arg(long)]
    hardened: bool,

    /// Overwrite any existing cluster of the same name
    #[arg(long)]
    fresh: bool,

    /// Cluster name
    #[arg(long, default_value = DEFAULT_CLUSTER_NAME)]
    cluster_name: String,

    /// Number of worker nodes
    #[arg(long, default_value = DEFAULT_AGENT_COUNT)]
    agent_count: String,

    /// Local port for accessing the loadbalancer
    #[arg(long, default_value = DEFAULT_LOADBALANCER_PORT)]
    loadbalancer_port: String,

    /// Path to values.yaml
    #[arg(long)]
    values: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Write logs to this file instead of stdout
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Spin up a deployment of engine. Username and email are required with --hardened
    Engine {
        /// Username for pullcred secret
        #[arg(long)]
        username: Option<String>,

        /// Email for pullcred secret
        #[arg(long)]
        email: Option<String>,
    },
    /// Spin up a deployment of enterprise. Username, email, and a license are required
    Enterprise {
        /// Path to license file
        #[arg(long)]
        license: Option<PathBuf>,

        /// Username for pullcred secret
        #[arg(long)]
        username: Option<String>,

        /// Email for pullcred secret
        #[arg(long)]
        email: Option<String>,
    },
}

impl Cli {
    fn run_options(&self) -> RunOptions {
        RunOptions {
            hardened: self.hardened,
            fresh: self.fresh,
            cluster_name: self.cluster_name.clone(),
            agent_count: self.agent_count.clone(),
            loadbalancer_port: self.loadbalancer_port.clone(),
            values: self.values.clone(),
        }
    }
}

impl Commands {
    fn into_request(self) -> FlavorRequest {
        match self {
            Commands::Engine { username, email } => FlavorRequest::Standard { username, email },
            Commands::Enterprise {
                license,
                username,
                email,
            } => FlavorRequest::Licensed {
                username,
                email,
                license,
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    color_eyre::install()?;
    init_logging(cli.debug, cli.log_file.as_deref())?;

    let options = cli.run_options();
    tracing::debug!("{:?}", options);

    let runner = SystemRunner::new();
    match Orchestrator::new(&runner, &options).run(cli.command.into_request()) {
        Ok(Outcome::Deployed { credential }) => {
            tracing::debug!("Kubeconfig at {}", credential);
            Ok(())
        }
        Ok(Outcome::ClusterExists { .. }) => Ok(()),
        Err(err) => {
            report(&err);
            std::process::exit(err.exit_code());
        }
    }
}

/// Lines of a failed tool's output repeated at error level
const REPORT_TAIL: usize = 10;

/// Log a pipeline failure along with the end of what the failing tool printed
fn report(err: &DeployError) {
    tracing::error!("{}", err);
    if let DeployError::Tool(tool) = err
        && let Some(output) = tool.output()
    {
        for line in output_tail(output, REPORT_TAIL) {
            tracing::error!("{}", line);
        }
    }
}

/// Last `n` non-blank lines of `output`, trimmed
///
/// Streamed steps have already logged their output in full, so only the end
/// is repeated.
fn output_tail(output: &str, n: usize) -> Vec<&str> {
    let lines: Vec<&str> = output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    lines[lines.len().saturating_sub(n)..].to_vec()
}

fn init_logging(debug: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::from_default_env().add_directive(level.into());
    let layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .without_time();

    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::registry()
                .with(layer.with_writer(Mutex::new(file)).with_ansi(false))
                .with(filter)
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(layer.with_writer(std::io::stdout))
                .with(filter)
                .init();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("spinup").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_match_documented_values() {
        let cli = parse(&["--values", "values.yaml", "engine"]);
        let options = cli.run_options();
        assert!(!options.hardened);
        assert!(!options.fresh);
        assert_eq!(options.cluster_name, "anchore");
        assert_eq!(options.agent_count, "3");
        assert_eq!(options.loadbalancer_port, "8080");
        assert_eq!(options.values, PathBuf::from("values.yaml"));
    }

    #[test]
    fn failure_report_repeats_only_the_tail() {
        let output = "line 1\n\n  line 2  \nline 3\n";
        assert_eq!(output_tail(output, 2), vec!["line 2", "line 3"]);
        assert_eq!(output_tail(output, 10), vec!["line 1", "line 2", "line 3"]);
        assert!(output_tail("", 10).is_empty());
    }

    #[test]
    fn global_flags_map_to_run_options() {
        let cli = parse(&[
            "--hardened",
            "--fresh",
            "--cluster-name",
            "dev",
            "--agent-count",
            "1",
            "--loadbalancer-port",
            "9090",
            "--values",
            "/tmp/v.yaml",
            "engine",
            "--username",
            "u",
            "--email",
            "e@x.com",
        ]);
        let options = cli.run_options();
        assert!(options.hardened);
        assert!(options.fresh);
        assert_eq!(options.cluster_name, "dev");
        assert_eq!(options.agent_count, "1");
        assert_eq!(options.loadbalancer_port, "9090");
        assert_eq!(options.values, PathBuf::from("/tmp/v.yaml"));
        assert_eq!(
            cli.command.into_request(),
            FlavorRequest::Standard {
                username: Some("u".to_string()),
                email: Some("e@x.com".to_string()),
            }
        );
    }

    #[test]
    fn enterprise_fields_are_left_to_validation() {
        let cli = parse(&["--values", "v.yaml", "enterprise", "--username", "u"]);
        assert_eq!(
            cli.command.into_request(),
            FlavorRequest::Licensed {
                username: Some("u".to_string()),
                email: None,
                license: None,
            }
        );
    }

    #[test]
    fn values_is_required() {
        assert!(Cli::try_parse_from(["spinup", "engine"]).is_err());
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["spinup", "--values", "v.yaml"]).is_err());
    }
}
