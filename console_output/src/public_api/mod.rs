// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Private modules (hide internal structure).
mod code_page;
mod console_output;
mod console_writer;

// Re-exports for flat public API.
pub use console_output::*;
pub use console_writer::*;
