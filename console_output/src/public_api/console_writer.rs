// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::{self, Write};

use uuid::Uuid;

use crate::{ConsoleOutput, OutputContext, TargetSet};

const LINE_FEED_BYTE: u8 = b'\n';

/// Buffered bytes, waiting for a line terminator.
pub type Text = Vec<u8>;

/// Cloneable object that implements [`Write`] on top of a [`ConsoleOutput`].
///
/// Bytes are buffered until a newline arrives, then the whole line is
/// submitted as one request, so a line from one writer can never interleave
/// with a line from another. Submission is non-blocking
/// ([`ConsoleOutput::try_submit_context`]); when the dispatcher is gone the
/// line is dropped and, unless [`Self::silent_error`] is set, an error is
/// returned to the caller of [`Write::write`].
///
/// This is the glue that lets [`tracing_subscriber`] (or anything else that
/// wants a `Write`) emit through the dispatcher; see
/// [`crate::DisplayPreference::ConsoleWriter`].
#[allow(missing_debug_implementations)]
pub struct ConsoleWriter {
    /// Bytes received so far with no terminating newline.
    pub buffer: Text,
    pub dispatcher: ConsoleOutput,
    /// When set, a closed dispatcher is not reported as a [`Write::write`]
    /// error. Set on every clone, so only the original writer surfaces the
    /// failure.
    pub silent_error: bool,
    uuid: Uuid,
}

impl ConsoleWriter {
    #[must_use]
    pub fn new(dispatcher: ConsoleOutput) -> Self {
        Self {
            buffer: Text::new(),
            dispatcher,
            silent_error: false,
            uuid: Uuid::new_v4(),
        }
    }

    /// Submit the buffered bytes as one request and clear the buffer. The
    /// buffer is cleared even when the dispatcher is gone; nothing would
    /// ever drain it otherwise.
    fn submit_buffer(&mut self) -> io::Result<()> {
        let line = String::from_utf8_lossy(&self.buffer).into_owned();
        let context = OutputContext::from_text(
            &line,
            self.dispatcher.config.default_color,
            TargetSet::default(),
            self.dispatcher.config.encoding,
        );
        let outcome = self.dispatcher.try_submit_context(context);
        self.buffer.clear();
        match outcome {
            Ok(()) => Ok(()),
            Err(_) if self.silent_error => Ok(()),
            Err(_) => Err(io::Error::other("console output dispatcher has closed")),
        }
    }
}

/// Equality is identity: the original and its clones compare equal, two
/// separately created writers do not.
impl PartialEq for ConsoleWriter {
    fn eq(&self, other: &Self) -> bool { self.uuid == other.uuid }
}

/// Clones get a fresh empty buffer and [`Self::silent_error`] set, so a
/// dispatcher that goes away mid-run does not error out of every cloned
/// writer that [`tracing_subscriber`] is holding.
impl Clone for ConsoleWriter {
    fn clone(&self) -> Self {
        Self {
            buffer: Text::new(),
            dispatcher: self.dispatcher.clone(),
            silent_error: true,
            uuid: self.uuid,
        }
    }
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let buf_len = buf.len();
        self.buffer.extend_from_slice(buf);
        if self.buffer.ends_with(&[LINE_FEED_BYTE]) {
            self.submit_buffer()?;
        }
        Ok(buf_len)
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        self.submit_buffer()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{OutputConfig, OutputDevice, OutputDeviceExt, StdoutMock};

    fn make_writer() -> (ConsoleWriter, StdoutMock) {
        let (stdout_device, stdout_mock) = OutputDevice::new_mock();
        let (stderr_device, _stderr_mock) = OutputDevice::new_mock();
        let console =
            ConsoleOutput::new_with_devices(OutputConfig::default(), stdout_device, stderr_device)
                .unwrap();
        (console.new_console_writer(), stdout_mock)
    }

    #[test]
    fn test_buffers_until_newline_then_submits_whole_line() {
        let (mut writer, stdout_mock) = make_writer();

        writer.write_all(b"part").unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "");

        writer.write_all(b"ial\n").unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "partial\n");
        assert!(writer.buffer.is_empty());
    }

    #[test]
    fn test_writeln_macro_works() {
        let (mut writer, stdout_mock) = make_writer();

        writeln!(writer, "hello {}", "world").unwrap();

        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "hello world\n");
    }

    #[test]
    fn test_flush_submits_an_unterminated_remainder() {
        let (mut writer, stdout_mock) = make_writer();

        writer.write_all(b"no newline").unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "");

        writer.flush().unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "no newline");
    }

    #[test]
    fn test_clones_compare_equal_and_have_silent_errors() {
        let (writer, _stdout_mock) = make_writer();
        let clone = writer.clone();

        assert!(writer == clone);
        assert!(!writer.silent_error);
        assert!(clone.silent_error);

        let (other_writer, _other_mock) = make_writer();
        assert!(writer != other_writer);
    }

    #[test]
    fn test_lines_from_two_writers_do_not_interleave() {
        let (stdout_device, stdout_mock) = OutputDevice::new_mock();
        let (stderr_device, _stderr_mock) = OutputDevice::new_mock();
        let console =
            ConsoleOutput::new_with_devices(OutputConfig::default(), stdout_device, stderr_device)
                .unwrap();
        let mut writer_a = console.new_console_writer();
        let mut writer_b = console.new_console_writer();

        writer_a.write_all(b"from a, held").unwrap();
        writer_b.write_all(b"from b, whole line\n").unwrap();
        writer_a.write_all(b" until now\n").unwrap();

        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string(),
            "from b, whole line\nfrom a, held until now\n"
        );
    }
}
