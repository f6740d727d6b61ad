//! Scripted [`Runner`] for exercising the pipeline without spawning processes

use spinup_rs::runner::display_command;
use spinup_rs::{CapturedOutput, CommandResult, Runner, SpinupError};
use std::cell::RefCell;
use std::path::PathBuf;

/// One recorded invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Call {
    pub argv: Vec<String>,
    pub redact: Option<String>,
}

impl Call {
    pub fn line(&self) -> String {
        self.argv.join(" ")
    }

    /// The command line as the real runner would log it
    pub fn logged(&self) -> String {
        display_command(&self.argv, self.redact.as_deref())
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeRunner {
    cluster_exists: bool,
    kubeconfig: String,
    password: String,
    missing_tools: Vec<&'static str>,
    /// Command-line prefixes that exit with the given code
    failures: Vec<(String, i32)>,
    calls: RefCell<Vec<Call>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            kubeconfig: "/home/me/.k3d/kubeconfig-anchore.yaml\n".to_string(),
            password: "hunter2\n".to_string(),
            ..Default::default()
        }
    }

    pub fn with_existing_cluster(mut self) -> Self {
        self.cluster_exists = true;
        self
    }

    pub fn without_tool(mut self, tool: &'static str) -> Self {
        self.missing_tools.push(tool);
        self
    }

    pub fn failing(mut self, prefix: &str, code: i32) -> Self {
        self.failures.push((prefix.to_string(), code));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.calls().iter().map(Call::line).collect()
    }

    fn record(&self, argv: &[String], redact: Option<&str>) -> String {
        let call = Call {
            argv: argv.to_vec(),
            redact: redact.map(String::from),
        };
        let line = call.line();
        self.calls.borrow_mut().push(call);
        line
    }

    fn scripted_failure(&self, line: &str) -> Option<i32> {
        self.failures
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, code)| *code)
    }
}

impl Runner for FakeRunner {
    fn stream(&self, argv: &[String], redact: Option<&str>) -> Result<CommandResult, SpinupError> {
        let line = self.record(argv, redact);
        let exit_code = match self.scripted_failure(&line) {
            Some(code) => code,
            None if line.starts_with("k3d cluster get") && !self.cluster_exists => 1,
            None => 0,
        };
        Ok(CommandResult {
            exit_code,
            output: if exit_code == 0 {
                String::new()
            } else {
                "scripted failure\n".to_string()
            },
        })
    }

    fn capture(&self, argv: &[String]) -> Result<CapturedOutput, SpinupError> {
        let line = self.record(argv, None);
        if let Some(code) = self.scripted_failure(&line) {
            return Ok(CapturedOutput {
                exit_code: code,
                stdout: String::new(),
                stderr: "scripted failure\n".to_string(),
            });
        }
        let stdout = if line.starts_with("k3d kubeconfig write") {
            self.kubeconfig.clone()
        } else if line.starts_with("security find-internet-password") {
            self.password.clone()
        } else {
            String::new()
        };
        Ok(CapturedOutput {
            exit_code: 0,
            stdout,
            stderr: String::new(),
        })
    }

    fn locate(&self, tool: &str) -> Option<PathBuf> {
        if self.missing_tools.iter().any(|missing| *missing == tool) {
            None
        } else {
            Some(PathBuf::from("/usr/local/bin").join(tool))
        }
    }
}
