// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};

use super::{OutputContext, render::SafeDispatchState};

/// Error type for the dispatcher.
#[derive(Debug, Error)]
pub enum ConsoleOutputError {
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error("output dispatcher closed")]
    Closed,
}

/// Signals that can be sent to the channel that the
/// [`pump task`](super::spawn_task_to_monitor_dispatch_channel)
/// monitors.
#[derive(Debug)]
pub enum DispatchSignal {
    /// Render one write request.
    Dispatch(OutputContext),
    /// Render one request that rewrites the current line, then acknowledge.
    /// The acknowledgement is what makes
    /// [`crate::ConsoleOutput::overwrite_line`] blocking: the caller awaits
    /// it, so the rewrite has reached the device before the caller resumes.
    Overwrite(OutputContext, oneshot::Sender<()>),
    /// Flush every device, then acknowledge.
    Flush(oneshot::Sender<()>),
    /// Stop rendering [`Self::Dispatch`] requests; hold them in a buffer.
    Pause,
    /// Render everything held since [`Self::Pause`], in order, and resume.
    Resume,
    /// Drain, flush, acknowledge, and end the pump task.
    Shutdown(oneshot::Sender<()>),
}

/// How submitted requests reach the devices. Chosen once, via
/// [`crate::OutputConfig::strategy`], when the dispatcher is constructed;
/// every public operation goes through whichever arm is active.
#[derive(Clone)]
#[allow(missing_debug_implementations)]
pub enum DispatchStrategy {
    /// Render on the calling task, synchronously, under the shared state
    /// lock. The lock is what serializes concurrent callers. Works without a
    /// Tokio runtime.
    Direct(SafeDispatchState),
    /// Send the request over a bounded channel to a spawned pump task that
    /// owns all rendering. Callers never block on terminal I/O (except for
    /// the operations that acknowledge, see [`DispatchSignal`]).
    Pumped(PumpHandle),
}

/// The sending side of a [`DispatchStrategy::Pumped`] dispatcher.
#[derive(Clone, Debug)]
pub struct PumpHandle {
    pub signal_sender: mpsc::Sender<DispatchSignal>,
    /// Fires once, after the pump task has drained and flushed everything.
    /// Subscribe before dropping the last dispatcher clone to await a full
    /// drain.
    pub shutdown_complete_sender: broadcast::Sender<()>,
}
