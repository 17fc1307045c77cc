use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// - `Success` (0): the command did its work
/// - `Failure` (1): `update --check` found a stale translations file
/// - `Error` (2): the command failed (usage error, corrupt translations file, config error)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    /// A check ran to completion and did not pass.
    Failure,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
