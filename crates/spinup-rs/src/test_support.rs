//! Shared helpers for unit tests

use crate::error::SpinupError;
use crate::runner::{CapturedOutput, CommandResult, Runner};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Collects formatted log output
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a subscriber that records every event, returning its log text
pub(crate) fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish();
    let value = tracing::subscriber::with_default(subscriber, f);
    let text = String::from_utf8_lossy(&logs.0.lock().unwrap()).into_owned();
    (value, text)
}

/// Runner whose captured commands all fail with fixed output
pub(crate) struct FailingCapture {
    pub exit_code: i32,
    pub stdout: &'static str,
    pub stderr: &'static str,
}

impl Runner for FailingCapture {
    fn stream(&self, _argv: &[String], _redact: Option<&str>) -> Result<CommandResult, SpinupError> {
        unreachable!("only captured commands are expected")
    }

    fn capture(&self, _argv: &[String]) -> Result<CapturedOutput, SpinupError> {
        Ok(CapturedOutput {
            exit_code: self.exit_code,
            stdout: self.stdout.to_string(),
            stderr: self.stderr.to_string(),
        })
    }

    fn locate(&self, _tool: &str) -> Option<PathBuf> {
        None
    }
}
