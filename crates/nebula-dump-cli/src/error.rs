//! Process exit codes.
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Success |
//! | 1 | Environment or usage error (bad flags, store or meta unreachable) |
//! | 2 | The data itself failed to decode |

use nebula_dump_core::DumpError;
use tracing::error;

/// Exit codes returned by every command handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum CliExitCode {
    Success = 0,
    Error = 1,
    Malformed = 2,
}

impl From<CliExitCode> for i32 {
    fn from(code: CliExitCode) -> Self {
        code as i32
    }
}

/// Map a core error to its exit code.
pub fn exit_code_for_error(e: &DumpError) -> CliExitCode {
    if e.is_malformed() {
        CliExitCode::Malformed
    } else {
        CliExitCode::Error
    }
}

/// Log `e` and return its exit code.
pub fn report(context: &str, e: &DumpError) -> i32 {
    error!("{}: {}", context, e);
    exit_code_for_error(e).into()
}
