// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::{Arc, Mutex};

use super::{SafeRawTerminal, SendRawTerminal};

/// This macro will unlock the `resource` inside an [`OutputDevice`] and return
/// a mutable reference to the underlying [`SendRawTerminal`]. The reference is
/// a [`LockedOutputDevice`], and it is valid for the duration of the enclosing
/// statement or block.
#[macro_export]
macro_rules! lock_output_device_as_mut {
    ($output_device:expr) => {
        &mut *$output_device.lock()
    };
}

/// One write destination for the dispatcher, eg: `stdout` or `stderr`. The
/// actual resource is behind an `Arc<Mutex<dyn Write + Send>>` so that:
/// 1. clones of a dispatcher on different tasks write through the same
///    underlying stream, and
/// 2. a render (color set, text, color restore, flush) happens while the lock
///    is held, so no other writer can split it.
///
/// In tests the resource is swapped for a [`crate::StdoutMock`], in which case
/// [`Self::is_mock`] is `true`. The mock is not a TTY, so interactivity checks
/// must be bypassed for it; see [`crate::ConsoleOutput::new_with_devices`].
#[derive(Clone)]
#[allow(missing_debug_implementations)]
pub struct OutputDevice {
    pub resource: SafeRawTerminal,
    pub is_mock: bool,
}

impl Default for OutputDevice {
    fn default() -> Self { Self::new_stdout() }
}

impl OutputDevice {
    #[must_use]
    pub fn new_stdout() -> Self {
        Self {
            resource: Arc::new(Mutex::new(std::io::stdout())),
            is_mock: false,
        }
    }

    #[must_use]
    pub fn new_stderr() -> Self {
        Self {
            resource: Arc::new(Mutex::new(std::io::stderr())),
            is_mock: false,
        }
    }

    /// # Panics
    ///
    /// This will panic if the lock is poisoned, ie, a thread that held the
    /// lock panicked while holding it.
    pub fn lock(&self) -> std::sync::MutexGuard<'_, SendRawTerminal> {
        self.resource.lock().unwrap()
    }
}

/// Mutable reference to a locked [`OutputDevice`] resource, obtained via
/// [`lock_output_device_as_mut!`].
pub type LockedOutputDevice<'a> = &'a mut dyn std::io::Write;
