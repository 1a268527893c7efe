//! Two small plain-text utilities with no ties to the room core: an
//! arithmetic evaluator for command-line arguments and a slash-command
//! dispatcher for line-based input. The binaries under `src/bin/` are
//! thin I/O shells over the pure functions here.

pub mod calc;
pub mod dispatch;
