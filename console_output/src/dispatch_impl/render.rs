// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The rendering half of the dispatcher: given one [`OutputContext`], perform
//! the physical writes. Both [`super::DispatchStrategy`] arms end up in this
//! module, so the color and ordering guarantees live in exactly one place.
//!
//! Nothing here records to [`tracing`] while the state lock is held: a
//! subscriber can write through [`crate::ConsoleWriter`] and re-enter the
//! dispatcher on the calling thread. Failures are collected as
//! [`RenderWarning`]s and the entry points report them once their guard is
//! out of scope.

use std::{collections::VecDeque, io::Write, sync::Arc};

use crossterm::{QueueableCommand,
                cursor::MoveToColumn,
                style::{Color, Print, ResetColor, SetForegroundColor}};

use super::{ConsoleOutputError, OutputContext, TargetStream};
use crate::{LockedOutputDevice, OutputDevice, StdMutex, lock_output_device_as_mut};

/// Requests held back while the dispatcher is paused, in submission order.
pub type PauseBuffer = VecDeque<OutputContext>;

/// Shareable handle to the render state. In
/// [`super::DispatchStrategy::Direct`] the mutex is the serialization point
/// for concurrent callers; in [`super::DispatchStrategy::Pumped`] only the
/// pump task ever locks it.
pub type SafeDispatchState = Arc<StdMutex<DispatchState>>;

/// One render failure, noted while the state lock was held.
///
/// Reported through [`tracing`] only after the lock is released, since a
/// subscriber whose display layer is a [`crate::ConsoleWriter`] over this
/// same dispatcher re-enters [`dispatch_direct`] synchronously from each
/// record it writes.
#[derive(Debug)]
pub struct RenderWarning {
    pub message: &'static str,
    /// `None` for failures not tied to one stream.
    pub stream: Option<TargetStream>,
    pub error: ConsoleOutputError,
}

impl RenderWarning {
    fn report(&self) {
        match self.stream {
            Some(stream) => tracing::warn!(
                message = self.message,
                stream = stream.as_ref(),
                error = %self.error
            ),
            None => tracing::warn!(message = self.message, error = %self.error),
        }
    }
}

/// Report and clear collected warnings. Call with no state lock held.
pub fn report_render_warnings(warnings: &mut Vec<RenderWarning>) {
    for warning in warnings.drain(..) {
        warning.report();
    }
}

/// One output stream plus the foreground color it currently holds.
///
/// Terminals cannot be queried for their current color, so the dispatcher
/// tracks it. `None` means this dispatcher has never left a color applied,
/// so "restore" means [`ResetColor`]. It only becomes `Some` when a restore
/// command fails and the applied color is known to linger on the stream.
#[allow(missing_debug_implementations)]
pub struct StreamState {
    pub target: TargetStream,
    pub device: OutputDevice,
    pub current_color: Option<Color>,
}

/// Everything the renderer owns: the two real streams, the pause flag, and
/// the buffer of requests deferred while paused.
#[allow(missing_debug_implementations)]
pub struct DispatchState {
    pub stdout: StreamState,
    pub stderr: StreamState,
    pub is_paused: bool,
    pub pause_buffer: PauseBuffer,
}

impl DispatchState {
    #[must_use]
    pub fn new(stdout_device: OutputDevice, stderr_device: OutputDevice) -> Self {
        Self {
            stdout: StreamState {
                target: TargetStream::StdOut,
                device: stdout_device,
                current_color: None,
            },
            stderr: StreamState {
                target: TargetStream::StdErr,
                device: stderr_device,
                current_color: None,
            },
            is_paused: false,
            pause_buffer: PauseBuffer::new(),
        }
    }

    #[must_use]
    pub fn new_safe(stdout_device: OutputDevice, stderr_device: OutputDevice) -> SafeDispatchState {
        Arc::new(StdMutex::new(Self::new(stdout_device, stderr_device)))
    }
}

/// Render one request, fanning out to every stream in its target set.
/// [`TargetStream::Suppressed`] performs no I/O at all.
///
/// # Errors
///
/// Returns the first I/O error from writing or flushing a device. Color
/// command failures are not errors; they are pushed onto `warnings` and
/// rendering continues.
pub fn dispatch_context(
    state: &mut DispatchState,
    context: &OutputContext,
    warnings: &mut Vec<RenderWarning>,
) -> Result<(), ConsoleOutputError> {
    for target in &context.targets {
        match target {
            TargetStream::StdOut => write_to_stream(&mut state.stdout, context, warnings)?,
            TargetStream::StdErr => write_to_stream(&mut state.stderr, context, warnings)?,
            TargetStream::Suppressed => {}
        }
    }
    Ok(())
}

/// Render one line-rewriting request: the text (which starts with a carriage
/// return, see [`crate::ConsoleOutput::overwrite_line`]) followed by a cursor
/// move back to column 0. Trailing characters from a longer previous line are
/// not cleared; callers pad with spaces when that matters.
///
/// # Errors
///
/// Same as [`dispatch_context`].
pub fn overwrite_context(
    state: &mut DispatchState,
    context: &OutputContext,
    warnings: &mut Vec<RenderWarning>,
) -> Result<(), ConsoleOutputError> {
    for target in &context.targets {
        match target {
            TargetStream::StdOut => overwrite_stream(&mut state.stdout, context, warnings)?,
            TargetStream::StdErr => overwrite_stream(&mut state.stderr, context, warnings)?,
            TargetStream::Suppressed => {}
        }
    }
    Ok(())
}

/// Write one request to one stream: set the foreground color (when the
/// request carries one), write the text, restore the color the stream held
/// before this call, flush.
///
/// Color restore is best-effort per the contract of this crate: a failed
/// color command becomes a [`RenderWarning`] and never aborts the text
/// write, and a failed restore is recorded in [`StreamState::current_color`]
/// so the next restore on this stream targets the color that actually
/// lingers.
fn write_to_stream(
    stream: &mut StreamState,
    context: &OutputContext,
    warnings: &mut Vec<RenderWarning>,
) -> Result<(), ConsoleOutputError> {
    let prior_color = stream.current_color;
    let mut_ref: LockedOutputDevice<'_> = lock_output_device_as_mut!(stream.device);

    match context.color {
        Some(color) => {
            if let Err(error) = mut_ref.queue(SetForegroundColor(color)) {
                warnings.push(RenderWarning {
                    message: "Could not queue foreground color change",
                    stream: Some(stream.target),
                    error: error.into(),
                });
            }

            let print_outcome = mut_ref.queue(Print(&context.text)).map(|_| ());

            let restore_outcome = match prior_color {
                Some(prior) => mut_ref.queue(SetForegroundColor(prior)).map(|_| ()),
                None => mut_ref.queue(ResetColor).map(|_| ()),
            };
            if let Err(error) = restore_outcome {
                warnings.push(RenderWarning {
                    message: "Could not restore foreground color",
                    stream: Some(stream.target),
                    error: error.into(),
                });
                stream.current_color = Some(color);
            }

            print_outcome?;
        }
        None => {
            mut_ref.queue(Print(&context.text))?;
        }
    }

    mut_ref.flush()?;
    Ok(())
}

fn overwrite_stream(
    stream: &mut StreamState,
    context: &OutputContext,
    warnings: &mut Vec<RenderWarning>,
) -> Result<(), ConsoleOutputError> {
    write_to_stream(stream, context, warnings)?;

    let mut_ref: LockedOutputDevice<'_> = lock_output_device_as_mut!(stream.device);
    mut_ref.queue(MoveToColumn(0))?;
    mut_ref.flush()?;
    Ok(())
}

/// Flush both real streams. Failures are pushed onto `warnings`, not
/// returned, since this runs on shutdown paths where there is nothing left
/// to abort.
pub fn flush_devices(state: &mut DispatchState, warnings: &mut Vec<RenderWarning>) {
    for stream in [&mut state.stdout, &mut state.stderr] {
        let mut_ref: LockedOutputDevice<'_> = lock_output_device_as_mut!(stream.device);
        if let Err(error) = mut_ref.flush() {
            warnings.push(RenderWarning {
                message: "Could not flush output device",
                stream: Some(stream.target),
                error: error.into(),
            });
        }
    }
}

/// Render everything deferred while paused, in submission order.
///
/// # Errors
///
/// Stops at the first I/O error; requests already popped are rendered,
/// the rest stay in the buffer.
pub fn drain_pause_buffer(
    state: &mut DispatchState,
    warnings: &mut Vec<RenderWarning>,
) -> Result<(), ConsoleOutputError> {
    while let Some(context) = state.pause_buffer.pop_front() {
        dispatch_context(state, &context, warnings)?;
    }
    Ok(())
}

/// [`super::DispatchStrategy::Direct`] entry point: lock the shared state and
/// render on the calling task. Respects the pause flag. Render errors are
/// reported once the guard is gone and swallowed; this operation never fails
/// from the caller's point of view.
pub fn dispatch_direct(state: &SafeDispatchState, context: OutputContext) {
    let mut warnings = Vec::new();
    {
        let mut locked_state = state.lock().unwrap();
        if locked_state.is_paused {
            locked_state.pause_buffer.push_back(context);
            return;
        }
        if let Err(error) = dispatch_context(&mut locked_state, &context, &mut warnings) {
            warnings.push(RenderWarning {
                message: "Could not dispatch output",
                stream: None,
                error,
            });
        }
    }
    report_render_warnings(&mut warnings);
}

/// [`super::DispatchStrategy::Direct`] entry point for line rewrites. Not
/// deferred by pause: a progress redraw that arrives while paused goes
/// straight to the device.
pub fn overwrite_direct(state: &SafeDispatchState, context: &OutputContext) {
    let mut warnings = Vec::new();
    {
        let mut locked_state = state.lock().unwrap();
        if let Err(error) = overwrite_context(&mut locked_state, context, &mut warnings) {
            warnings.push(RenderWarning {
                message: "Could not overwrite line",
                stream: None,
                error,
            });
        }
    }
    report_render_warnings(&mut warnings);
}

/// [`super::DispatchStrategy::Direct`] flush.
pub fn flush_direct(state: &SafeDispatchState) {
    let mut warnings = Vec::new();
    {
        let mut locked_state = state.lock().unwrap();
        flush_devices(&mut locked_state, &mut warnings);
    }
    report_render_warnings(&mut warnings);
}

/// [`super::DispatchStrategy::Direct`] pause: ordinary writes after this are
/// held in the pause buffer.
pub fn pause_direct(state: &SafeDispatchState) {
    state.lock().unwrap().is_paused = true;
}

/// [`super::DispatchStrategy::Direct`] resume: render everything held while
/// paused, in submission order.
pub fn resume_direct(state: &SafeDispatchState) {
    let mut warnings = Vec::new();
    {
        let mut locked_state = state.lock().unwrap();
        locked_state.is_paused = false;
        if let Err(error) = drain_pause_buffer(&mut locked_state, &mut warnings) {
            warnings.push(RenderWarning {
                message: "Could not drain pause buffer on resume",
                stream: None,
                error,
            });
        }
    }
    report_render_warnings(&mut warnings);
}

/// Final drain for a dispatcher: render every held request, then flush both
/// devices. [`crate::ConsoleOutput::shutdown`] uses this in the Direct
/// strategy, and the pump task runs it on its way out.
pub fn drain_and_flush(state: &SafeDispatchState) {
    let mut warnings = Vec::new();
    {
        let mut locked_state = state.lock().unwrap();
        locked_state.is_paused = false;
        if let Err(error) = drain_pause_buffer(&mut locked_state, &mut warnings) {
            warnings.push(RenderWarning {
                message: "Could not drain pause buffer on shutdown",
                stream: None,
                error,
            });
        }
        flush_devices(&mut locked_state, &mut warnings);
    }
    report_render_warnings(&mut warnings);
}
