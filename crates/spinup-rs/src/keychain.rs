//! Registry password lookup in the OS credential store
//!
//! Uses the macOS `security` tool; the entry is an internet password keyed
//! by account name.

use crate::error::SpinupError;
use crate::runner::Runner;

pub const SECURITY: &str = "security";

pub fn find_internet_password_args(account: &str) -> Vec<String> {
    vec![
        SECURITY.to_string(),
        "find-internet-password".to_string(),
        "-a".to_string(),
        account.to_string(),
        "-gw".to_string(),
    ]
}

/// Fetch the password stored for `account`
///
/// Executes: security find-internet-password -a <account> -gw
pub fn find_internet_password(runner: &dyn Runner, account: &str) -> Result<String, SpinupError> {
    let argv = find_internet_password_args(account);
    let output = runner.capture(&argv)?;

    if !output.success() {
        return Err(SpinupError::CommandFailed {
            command: argv.join(" "),
            code: output.exit_code,
            output: output.stderr,
        });
    }

    Ok(strip_terminator(output.stdout))
}

/// Drop the single newline `security` appends to the secret
fn strip_terminator(mut secret: String) -> String {
    secret.pop();
    secret
}
