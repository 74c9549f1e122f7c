// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io::{Error, ErrorKind, Result, Write};

/// A stand-in for a stream whose reader has gone away: every call fails with
/// [`ErrorKind::BrokenPipe`], the way writes to a closed downstream pipe do.
/// For exercising the dispatcher's failure paths.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrokenPipeMock;

impl Write for BrokenPipeMock {
    fn write(&mut self, _buf: &[u8]) -> Result<usize> {
        Err(Error::from(ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> Result<()> { Err(Error::from(ErrorKind::BrokenPipe)) }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_broken_pipe_mock_fails_every_call() {
        let mut writer = BrokenPipeMock;
        assert_eq!(writer.write(b"x").unwrap_err().kind(), ErrorKind::BrokenPipe);
        assert_eq!(writer.flush().unwrap_err().kind(), ErrorKind::BrokenPipe);
    }
}
