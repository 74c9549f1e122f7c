// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Private modules (hide internal structure).
mod init_tracing;
mod rolling_file_appender_impl;
mod tracing_config;

// Re-exports for flat public API.
pub use init_tracing::*;
pub use rolling_file_appender_impl::*;
pub use tracing_config::*;
