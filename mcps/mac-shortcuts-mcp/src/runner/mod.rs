//! Shortcuts CLI runner
//!
//! Launches `shortcuts run <name> [--input <text>]` as a child process and
//! reports how it finished.

pub mod error;
pub mod executor;

pub use error::{RunnerError, RunnerResult};
pub use executor::{ShortcutExecutor, ShortcutRunner, DEFAULT_PROGRAM};
