// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::Arc;

use super::{BrokenPipeMock, StdoutMock};
use crate::{OutputDevice, StdMutex};

/// Extends [`OutputDevice`] with constructors that swap the real stream for
/// an in-memory stand-in. The mock devices count as attached, so the
/// dispatcher renders into them even in a headless environment.
pub trait OutputDeviceExt {
    /// A device that captures writes in memory. The returned [`StdoutMock`]
    /// is the read side; the device holds a clone writing into the same
    /// buffer.
    fn new_mock() -> (OutputDevice, StdoutMock);

    /// A device whose stream fails every call with
    /// [`std::io::ErrorKind::BrokenPipe`], for driving the failure paths.
    fn new_mock_broken_pipe() -> OutputDevice;
}

impl OutputDeviceExt for OutputDevice {
    fn new_mock() -> (OutputDevice, StdoutMock) {
        let stdout_mock = StdoutMock::default();
        let this = OutputDevice {
            resource: Arc::new(StdMutex::new(stdout_mock.clone())),
            is_mock: true,
        };
        (this, stdout_mock)
    }

    fn new_mock_broken_pipe() -> OutputDevice {
        OutputDevice {
            resource: Arc::new(StdMutex::new(BrokenPipeMock)),
            is_mock: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{LockedOutputDevice, lock_output_device_as_mut};

    #[test]
    fn test_mock_device_round_trip() {
        let (device, stdout_mock) = OutputDevice::new_mock();
        assert!(device.is_mock);

        let mut_ref: LockedOutputDevice<'_> = lock_output_device_as_mut!(device);
        mut_ref.write_all(b"captured").unwrap();
        mut_ref.flush().unwrap();

        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "captured");
    }
}
