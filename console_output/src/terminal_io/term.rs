// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Answers the question: is this process attached to a real terminal on the
//! output side, or is it running headless (piped, redirected, CI/CD)?
//!
//! The dispatcher checks this once, when it is constructed, and degrades to
//! silent no-ops when there is no terminal to write to. See
//! [`crate::ConsoleOutput::new_with_devices`].

use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TTYResult {
    /// The stream is connected to a terminal.
    IsInteractive,
    /// The stream is piped, redirected, or otherwise not a terminal.
    IsNotInteractive,
}

#[must_use]
pub fn is_stdout_interactive() -> TTYResult {
    if std::io::stdout().is_terminal() {
        TTYResult::IsInteractive
    } else {
        TTYResult::IsNotInteractive
    }
}

#[must_use]
pub fn is_stderr_interactive() -> TTYResult {
    if std::io::stderr().is_terminal() {
        TTYResult::IsInteractive
    } else {
        TTYResult::IsNotInteractive
    }
}

/// Returns [`TTYResult::IsInteractive`] when either `stdout` or `stderr` is a
/// terminal. Writing colored output to one real stream is still useful when
/// the other is redirected.
#[must_use]
pub fn is_output_interactive() -> TTYResult {
    if std::io::stdout().is_terminal() || std::io::stderr().is_terminal() {
        TTYResult::IsInteractive
    } else {
        TTYResult::IsNotInteractive
    }
}
