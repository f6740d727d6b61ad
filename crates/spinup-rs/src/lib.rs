//! spinup-rs: Rust wrappers for the k3d, kubectl, and helm CLIs
//!
//! Every external invocation goes through the [`Runner`] trait so the
//! deployment pipeline can be driven by a scripted runner in tests.

pub mod error;
pub mod helm;
pub mod k3d;
pub mod keychain;
pub mod kubectl;
pub mod preflight;
pub mod runner;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::SpinupError;
pub use preflight::{REQUIRED_TOOLS, preflight};
pub use runner::{CapturedOutput, CommandResult, REDACTED, Runner, SystemRunner};
