//! DEBUG-gated diagnostics
//!
//! Follows the `DEBUG` environment variable convention: diagnostics are
//! emitted when `DEBUG` is `*` or lists `github-app-pool` among its
//! comma-separated tokens. The variable is read fresh on every call, never
//! cached, so callers can toggle it between selections within one process.

use std::fmt::Arguments;

/// Token that enables this crate's diagnostics in `DEBUG`.
pub const DEBUG_TOKEN: &str = "github-app-pool";

/// Environment variable consulted for the diagnostic switch.
pub const DEBUG_VAR: &str = "DEBUG";

/// Whether a given `DEBUG` value enables diagnostics.
///
/// Pure function over an environment snapshot, so tests can drive it
/// without mutating process state.
pub fn enabled_in(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        v.split(',')
            .map(str::trim)
            .any(|token| token == "*" || token == DEBUG_TOKEN)
    })
}

/// Whether diagnostics are currently enabled, per the live environment.
pub fn enabled() -> bool {
    enabled_in(std::env::var(DEBUG_VAR).ok().as_deref())
}

/// Render one diagnostic line with the fixed tag prefix.
fn line(args: Arguments<'_>) -> String {
    format!("[{DEBUG_TOKEN}] {args}")
}

/// Emit one diagnostic line to stderr if enabled; inert otherwise.
pub fn log(args: Arguments<'_>) {
    if enabled() {
        eprintln!("{}", line(args));
    }
}

/// Diagnostic line with `format!` syntax, gated on the live `DEBUG` value.
#[macro_export]
macro_rules! pool_debug {
    ($($arg:tt)*) => {
        $crate::debug::log(format_args!($($arg)*))
    };
}
