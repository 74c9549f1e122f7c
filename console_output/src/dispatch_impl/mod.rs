// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Private modules (hide internal structure).
mod dispatch_strategy;
mod output_context;
mod output_encoding;
mod pump;
mod render;
mod target_set;

// Re-exports for flat public API.
pub use dispatch_strategy::*;
pub use output_context::*;
pub use output_encoding::*;
pub use pump::*;
pub use render::*;
pub use target_set::*;
