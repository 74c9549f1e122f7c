// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::Arc;

/// Type alias for [`std::sync::Mutex`], to avoid confusion with
/// [`tokio::sync::Mutex`]. The dispatcher only ever locks a device for the
/// duration of one synchronous render, so the blocking mutex is the right
/// tool and keeps the futures [`Send`].
pub type StdMutex<T> = std::sync::Mutex<T>;

/// Shared handle to one raw terminal stream.
/// - The raw terminal is wrapped in a [`StdMutex`], and then in an [`Arc`], so
///   that it can be shared across threads and tasks.
/// - Every clone of a dispatcher holds the same handle, and a render happens
///   while the lock is held, which is what keeps concurrent requests from
///   interleaving on the device.
pub type SafeRawTerminal = Arc<StdMutex<SendRawTerminal>>;

/// Type alias for a terminal device that can be written to ([`std::io::Write`])
/// and is safe to share between threads ([`Send`]).
pub type SendRawTerminal = dyn std::io::Write + Send;
