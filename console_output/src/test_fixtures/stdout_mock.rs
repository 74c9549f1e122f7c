// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{io::Write, sync::Arc};

use smallvec::{SmallVec, smallvec};

use crate::StdMutex;

/// Most captures in this crate's tests are a handful of short lines, so the
/// buffer lives inline until it outgrows this.
const MOCK_BUFFER_INLINE_SIZE: usize = 64;

pub type MockBuffer = SmallVec<[u8; MOCK_BUFFER_INLINE_SIZE]>;

/// An in-memory stand-in for `stdout` (or `stderr`). Clones share the same
/// buffer, so one clone can be handed to an [`crate::OutputDevice`] while the
/// test keeps another to read captured bytes back out.
#[derive(Clone, Debug)]
pub struct StdoutMock {
    pub buffer: Arc<StdMutex<MockBuffer>>,
}

impl Default for StdoutMock {
    fn default() -> Self {
        Self {
            buffer: Arc::new(StdMutex::new(smallvec![])),
        }
    }
}

impl StdoutMock {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn get_copy_of_buffer(&self) -> MockBuffer { self.buffer.lock().unwrap().clone() }

    #[must_use]
    pub fn get_copy_of_buffer_as_string(&self) -> String {
        let buffer_data = self.buffer.lock().unwrap();
        String::from_utf8_lossy(&buffer_data).to_string()
    }

    /// Like [`Self::get_copy_of_buffer_as_string`] with ANSI escape sequences
    /// (color and cursor commands) removed, leaving only the visible text.
    #[must_use]
    pub fn get_copy_of_buffer_as_string_strip_ansi(&self) -> String {
        let buffer_data = self.buffer.lock().unwrap();
        let buffer_string = String::from_utf8_lossy(&buffer_data).to_string();
        let stripped = strip_ansi_escapes::strip(buffer_string.as_bytes());
        String::from_utf8_lossy(&stripped).to_string()
    }
}

impl Write for StdoutMock {
    #[allow(clippy::unwrap_in_result)] /* This is for lock.unwrap() */
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
}
