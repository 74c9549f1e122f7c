// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Private modules (hide internal structure).
mod output_device;
mod term;
mod type_aliases;

// Re-exports for flat public API.
pub use output_device::*;
pub use term::*;
pub use type_aliases::*;
