//! External process execution
//!
//! Long-running tools (cluster creation can take minutes) are streamed: their
//! combined stdout/stderr is logged line by line as it is produced. Queries
//! whose output may be sensitive are captured instead and never logged.

use crate::error::SpinupError;
use std::borrow::Cow;
use std::ffi::OsString;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Command, ExitStatus};

/// Placeholder logged in place of a redacted secret
pub const REDACTED: &str = "<redacted>";

/// Asks interpreter-based tools to flush output line by line
const UNBUFFERED_ENV: &str = "PYTHONUNBUFFERED";

/// Result of a streamed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// Exit code (1 if the process was killed by a signal)
    pub exit_code: i32,
    /// Combined stdout and stderr
    pub output: String,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Turn a non-zero exit into [`SpinupError::CommandFailed`]
    pub fn check(self, argv: &[String], redact: Option<&str>) -> Result<Self, SpinupError> {
        if self.success() {
            return Ok(self);
        }
        Err(SpinupError::CommandFailed {
            command: display_command(argv, redact),
            code: self.exit_code,
            output: redact_line(&self.output, redact).into_owned(),
        })
    }
}

/// Result of a captured command, with the two streams kept apart
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Seam between the deployment pipeline and the operating system
pub trait Runner {
    /// Run `argv`, logging the command line and each output line as it arrives.
    ///
    /// Every occurrence of `redact` is replaced with [`REDACTED`] in what is logged.
    ///
    /// Output is read until the pipe closes, not until the child exits: a
    /// background process that inherits the pipe holds the call open until it
    /// exits too.
    fn stream(&self, argv: &[String], redact: Option<&str>) -> Result<CommandResult, SpinupError>;

    /// Run `argv` to completion and capture stdout and stderr without logging them
    fn capture(&self, argv: &[String]) -> Result<CapturedOutput, SpinupError>;

    /// Resolve `tool` on the execution path
    fn locate(&self, tool: &str) -> Option<PathBuf>;
}

/// Stream a command and fail on a non-zero exit
pub fn run_checked(
    runner: &dyn Runner,
    argv: &[String],
    redact: Option<&str>,
) -> Result<CommandResult, SpinupError> {
    runner.stream(argv, redact)?.check(argv, redact)
}

/// Render a command line for the log
pub fn display_command(argv: &[String], redact: Option<&str>) -> String {
    argv.iter()
        .map(|arg| redact_line(arg, redact))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Replace every occurrence of `redact` in `line` with [`REDACTED`]
pub fn redact_line<'a>(line: &'a str, redact: Option<&str>) -> Cow<'a, str> {
    match redact {
        Some(secret) if !secret.is_empty() && line.contains(secret) => {
            Cow::Owned(line.replace(secret, REDACTED))
        }
        _ => Cow::Borrowed(line),
    }
}

/// Read `reader` until EOF, handing each non-empty trimmed line to `sink`.
///
/// Returns everything that was read, lossily decoded.
pub fn drain_lines<R: BufRead>(mut reader: R, mut sink: impl FnMut(&str)) -> io::Result<String> {
    let mut output = String::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let chunk = String::from_utf8_lossy(&buf);
        let line = chunk.trim();
        if !line.is_empty() {
            sink(line);
        }
        output.push_str(&chunk);
    }
    Ok(output)
}

fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

/// [`Runner`] backed by real processes
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    /// Overrides `PATH` for tool lookup
    search_path: Option<OsString>,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve tools against `path` instead of the process `PATH`
    #[cfg(test)]
    pub fn with_search_path(path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(path.into()),
        }
    }
}

impl Runner for SystemRunner {
    fn stream(&self, argv: &[String], redact: Option<&str>) -> Result<CommandResult, SpinupError> {
        let (program, args) = argv.split_first().ok_or(SpinupError::EmptyCommand)?;
        let command = display_command(argv, redact);
        tracing::info!("{}", command);

        let spawn_err = |source| SpinupError::Spawn {
            command: command.clone(),
            source,
        };

        // One pipe for both streams keeps stdout and stderr interleaved as written
        let (reader, writer) = io::pipe().map_err(spawn_err)?;
        let stderr = writer.try_clone().map_err(spawn_err)?;

        // The temporary Command owns the write ends and is dropped here,
        // so the reader sees EOF once every holder of the pipe has exited
        let mut child = Command::new(program)
            .args(args)
            .env(UNBUFFERED_ENV, "1")
            .stdout(writer)
            .stderr(stderr)
            .spawn()
            .map_err(spawn_err)?;

        let output = drain_lines(BufReader::new(reader), |line| {
            tracing::info!("{}", redact_line(line, redact));
        });
        let status = child.wait()?;

        Ok(CommandResult {
            exit_code: exit_code(status),
            output: output?,
        })
    }

    fn capture(&self, argv: &[String]) -> Result<CapturedOutput, SpinupError> {
        let (program, args) = argv.split_first().ok_or(SpinupError::EmptyCommand)?;
        let command = display_command(argv, None);
        tracing::info!("{}", command);

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| SpinupError::Spawn { command, source })?;

        Ok(CapturedOutput {
            exit_code: exit_code(output.status),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn locate(&self, tool: &str) -> Option<PathBuf> {
        match &self.search_path {
            Some(paths) => {
                let cwd = std::env::current_dir().ok()?;
                which::which_in(tool, Some(paths), cwd).ok()
            }
            None => which::which(tool).ok(),
        }
    }
}
