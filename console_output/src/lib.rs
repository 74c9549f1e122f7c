// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # r3bl_console_output
//!
//! <!-- R3BL TUI library & suite of apps focused on developer productivity -->
//!
//! Thread-safe terminal output dispatcher: any number of concurrent tasks
//! can write colored text, whole lines, and in-place progress updates to
//! `stdout` and `stderr` without their output ever interleaving
//! character-by-character.
//!
//! Interleaving is what you get when concurrent tasks write to a terminal
//! through [`println!`] and friends directly: two half-written lines braided
//! together, or a color code from one task bleeding into another task's
//! text. This crate routes every write through one dispatcher, which
//! guarantees:
//!
//! 1. **Atomicity**: each write request (including a line's text plus its
//!    newline) reaches the stream whole.
//! 2. **Ordering**: requests come out in submission order.
//! 3. **Color hygiene**: the foreground color is applied before a request's
//!    text and the stream's prior color is restored after it, so color never
//!    leaks into output produced outside the dispatcher.
//!
//! # Two dispatch strategies
//!
//! Both live behind the same [`ConsoleOutput`] API and honor the same
//! guarantees; pick with [`OutputConfig::strategy`]:
//!
//! - [`StrategyChoice::Direct`]: the calling task renders synchronously
//!   under a lock. Simple, no runtime needed.
//! - [`StrategyChoice::Pumped`]: requests go over a bounded channel to a
//!   single spawned pump task that owns all terminal I/O. Callers return as
//!   soon as the request is queued.
//!
//! # Example
//!
//! ```
//! use crossterm::style::Color;
//! use r3bl_console_output::{ConsoleOutput, TargetStream};
//!
//! #[tokio::main]
//! async fn main() -> miette::Result<()> {
//!     let console = ConsoleOutput::try_new_pumped()?;
//!
//!     // Spawned tasks share the dispatcher by cloning it.
//!     let console_clone = console.clone();
//!     let worker = tokio::spawn(async move {
//!         console_clone
//!             .write_line(Some("from the worker"), Some(Color::Cyan), TargetStream::StdOut)
//!             .await;
//!     });
//!
//!     console
//!         .write_line(Some("from main"), None, TargetStream::StdOut)
//!         .await;
//!
//!     worker.await.ok();
//!     console.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! # Progress lines
//!
//! [`ConsoleOutput::overwrite_line`] redraws the current line in place
//! (carriage return + text, flush, cursor parked at column 0) for progress
//! indicators, without clearing to end of line.
//!
//! # Logging through the dispatcher
//!
//! [`init_tracing`] installs a [`tracing_subscriber`] stack, and
//! [`DisplayPreference::ConsoleWriter`] routes its log lines through a
//! [`ConsoleOutput`], so log output obeys the same ordering and atomicity
//! guarantees as everything else instead of racing it.
//!
//! # Headless environments
//!
//! When neither `stdout` nor `stderr` is an interactive terminal (pipes,
//! CI/CD), every operation is a cheap silent no-op: nothing is encoded,
//! nothing is written, nothing errors. Tests swap in a [`StdoutMock`] via
//! [`OutputDeviceExt::new_mock`] to capture output in memory.

#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach modules (re-exported below to provide clean public API).
pub mod dispatch_impl;
pub mod public_api;
pub mod terminal_io;
pub mod test_fixtures;
pub mod tracing_logging;

// Re-export the public API (flatten namespace).
pub use dispatch_impl::*;
pub use public_api::*;
pub use terminal_io::*;
pub use test_fixtures::*;
pub use tracing_logging::*;

// Constants.

/// Bound on the signal channel between producers and the pump task in
/// [`StrategyChoice::Pumped`]. A stalled terminal backs the channel up to
/// this many requests before producers feel backpressure.
pub const CHANNEL_CAPACITY: usize = 1_000;

/// The platform newline sequence appended by the line-writing operations.
#[cfg(windows)]
pub const NEWLINE: &str = "\r\n";

/// The platform newline sequence appended by the line-writing operations.
#[cfg(not(windows))]
pub const NEWLINE: &str = "\n";
