// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! In-memory output capture for tests. Not gated behind `#[cfg(test)]` so
//! that downstream crates can drive a [`crate::ConsoleOutput`] against a
//! mock in their own tests.

// Private modules (hide internal structure).
mod broken_pipe_mock;
mod output_device_ext;
mod stdout_mock;

// Re-exports for flat public API.
pub use broken_pipe_mock::*;
pub use output_device_ext::*;
pub use stdout_mock::*;
