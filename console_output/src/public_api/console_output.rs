// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::style::Color;
use miette::IntoDiagnostic;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::{CHANNEL_CAPACITY, ConsoleOutputError, ConsoleWriter, DispatchSignal, DispatchState,
            DispatchStrategy, NEWLINE, OutputContext, OutputDevice, OutputEncoding, PumpHandle,
            TTYResult, TargetSet, dispatch_direct, drain_and_flush, flush_direct,
            is_output_interactive, overwrite_direct, pause_direct, resume_direct,
            spawn_task_to_monitor_dispatch_channel};

/// Which [`DispatchStrategy`] a dispatcher is constructed with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StrategyChoice {
    /// Render synchronously on the calling task. No runtime required.
    #[default]
    Direct,
    /// Render on a spawned pump task fed by a bounded channel. Requires a
    /// Tokio runtime at construction time.
    Pumped,
}

/// Configuration captured once, at [`ConsoleOutput`] construction.
///
/// There is deliberately no way to change any of this on a live dispatcher:
/// requests already built hold their resolved color and normalized text, so a
/// reconfiguration can never retroactively alter queued output. To
/// reconfigure, construct a new dispatcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Encoding every piece of submitted text is normalized through. See
    /// [`OutputEncoding`].
    pub encoding: OutputEncoding,
    /// Color applied when a write call passes no explicit color. `None`
    /// means such writes emit no color commands at all.
    pub default_color: Option<Color>,
    pub strategy: StrategyChoice,
}

/// Thread-safe terminal output dispatcher.
///
/// Any number of concurrent tasks submit write requests through a clone of
/// this struct; each request comes out on its target streams whole, in
/// submission order, with its foreground color applied before the text and
/// the stream's prior color restored after. See the crate docs for the full
/// contract.
///
/// Cheap to clone: clones share the underlying devices and (for
/// [`StrategyChoice::Pumped`]) the channel to the one pump task.
///
/// When neither `stdout` nor `stderr` is an interactive terminal (piped
/// output, CI/CD), every operation on this struct is a silent no-op. The
/// check happens once, at construction, and gates each call before any text
/// is encoded.
///
/// ```
/// use r3bl_console_output::{ConsoleOutput, TargetStream};
///
/// #[tokio::main]
/// async fn main() -> miette::Result<()> {
///     let console = ConsoleOutput::try_new_pumped()?;
///     console
///         .write_line(Some("ready"), None, TargetStream::StdOut)
///         .await;
///     console.shutdown().await;
///     Ok(())
/// }
/// ```
#[derive(Clone)]
#[allow(missing_debug_implementations)]
pub struct ConsoleOutput {
    pub config: OutputConfig,
    pub strategy: DispatchStrategy,
    is_attached: bool,
}

impl ConsoleOutput {
    /// Construct a dispatcher over the real `stdout` and `stderr`.
    ///
    /// # Errors
    ///
    /// Fails only for [`StrategyChoice::Pumped`] outside a Tokio runtime.
    pub fn new(config: OutputConfig) -> miette::Result<Self> {
        Self::new_with_devices(config, OutputDevice::new_stdout(), OutputDevice::new_stderr())
    }

    /// Default-configured dispatcher using [`StrategyChoice::Direct`].
    #[must_use]
    pub fn new_direct() -> Self {
        Self::build_direct(
            OutputConfig::default(),
            OutputDevice::new_stdout(),
            OutputDevice::new_stderr(),
        )
    }

    /// Default-configured dispatcher using [`StrategyChoice::Pumped`].
    ///
    /// # Errors
    ///
    /// Fails when called outside a Tokio runtime, since the pump task has
    /// nowhere to run.
    pub fn try_new_pumped() -> miette::Result<Self> {
        let config = OutputConfig {
            strategy: StrategyChoice::Pumped,
            ..Default::default()
        };
        Self::new(config)
    }

    /// Construct over explicit devices. This is how tests swap in a
    /// [`crate::StdoutMock`]; a mock device counts as attached so the
    /// dispatcher renders into it even in a headless environment.
    ///
    /// # Errors
    ///
    /// Fails only for [`StrategyChoice::Pumped`] outside a Tokio runtime.
    pub fn new_with_devices(
        config: OutputConfig,
        stdout_device: OutputDevice,
        stderr_device: OutputDevice,
    ) -> miette::Result<Self> {
        match config.strategy {
            StrategyChoice::Direct => Ok(Self::build_direct(config, stdout_device, stderr_device)),
            StrategyChoice::Pumped => Self::build_pumped(config, stdout_device, stderr_device),
        }
    }

    fn check_attached(stdout_device: &OutputDevice, stderr_device: &OutputDevice) -> bool {
        if stdout_device.is_mock || stderr_device.is_mock {
            return true;
        }
        matches!(is_output_interactive(), TTYResult::IsInteractive)
    }

    fn build_direct(
        config: OutputConfig,
        stdout_device: OutputDevice,
        stderr_device: OutputDevice,
    ) -> Self {
        let is_attached = Self::check_attached(&stdout_device, &stderr_device);
        let state = DispatchState::new_safe(stdout_device, stderr_device);
        Self {
            config,
            strategy: DispatchStrategy::Direct(state),
            is_attached,
        }
    }

    fn build_pumped(
        config: OutputConfig,
        stdout_device: OutputDevice,
        stderr_device: OutputDevice,
    ) -> miette::Result<Self> {
        let runtime_handle = tokio::runtime::Handle::try_current().into_diagnostic()?;

        let is_attached = Self::check_attached(&stdout_device, &stderr_device);
        let state = DispatchState::new_safe(stdout_device, stderr_device);

        let (signal_sender, signal_receiver) = mpsc::channel::<DispatchSignal>(CHANNEL_CAPACITY);
        let (shutdown_complete_sender, _) = broadcast::channel::<()>(1);

        drop(spawn_task_to_monitor_dispatch_channel(
            &runtime_handle,
            signal_receiver,
            state,
            shutdown_complete_sender.clone(),
        ));

        Ok(Self {
            config,
            strategy: DispatchStrategy::Pumped(PumpHandle {
                signal_sender,
                shutdown_complete_sender,
            }),
            is_attached,
        })
    }

    /// `false` when output is headless and every operation is a no-op.
    #[must_use]
    pub fn is_attached(&self) -> bool { self.is_attached }

    fn resolve_color(&self, color: Option<Color>) -> Option<Color> {
        color.or(self.config.default_color)
    }

    async fn submit_context(&self, context: OutputContext) {
        match &self.strategy {
            DispatchStrategy::Direct(state) => dispatch_direct(state, context),
            DispatchStrategy::Pumped(handle) => {
                if let Err(error) = handle
                    .signal_sender
                    .send(DispatchSignal::Dispatch(context))
                    .await
                {
                    tracing::warn!(
                        message = "Dispatch channel closed; dropping write request",
                        error = %error
                    );
                }
            }
        }
    }

    /// Non-blocking submission, for synchronous call sites like the
    /// [`std::io::Write`] impl on [`ConsoleWriter`]. Never performs channel
    /// backpressure waiting.
    ///
    /// # Errors
    ///
    /// [`ConsoleOutputError::Closed`] when the pump task is gone or its
    /// channel is full; the request is dropped.
    pub fn try_submit_context(&self, context: OutputContext) -> Result<(), ConsoleOutputError> {
        if !self.is_attached {
            return Ok(());
        }
        match &self.strategy {
            DispatchStrategy::Direct(state) => {
                dispatch_direct(state, context);
                Ok(())
            }
            DispatchStrategy::Pumped(handle) => handle
                .signal_sender
                .try_send(DispatchSignal::Dispatch(context))
                .map_err(|_| ConsoleOutputError::Closed),
        }
    }

    /// Emit `count` copies of `byte`, optionally followed by the platform
    /// newline sequence. The byte buffer is decoded through the configured
    /// encoding, so eg byte `65` renders as `A`. A `count` of `0` with no
    /// newline emits nothing.
    pub async fn write_byte(
        &self,
        byte: u8,
        color: Option<Color>,
        count: usize,
        append_newline: bool,
        targets: impl Into<TargetSet>,
    ) {
        if !self.is_attached {
            return;
        }
        let context = OutputContext::from_repeated_byte(
            byte,
            count,
            append_newline,
            self.resolve_color(color),
            targets.into(),
            self.config.encoding,
        );
        self.submit_context(context).await;
    }

    /// Emit one character.
    pub async fn write_char(
        &self,
        character: char,
        color: Option<Color>,
        targets: impl Into<TargetSet>,
    ) {
        if !self.is_attached {
            return;
        }
        let context = OutputContext::from_char(
            character,
            self.resolve_color(color),
            targets.into(),
            self.config.encoding,
        );
        self.submit_context(context).await;
    }

    /// Emit `text`. Passing `None` is a silent no-op, not an error; this lets
    /// call sites forward optional text without a branch.
    pub async fn write_text(
        &self,
        text: Option<&str>,
        color: Option<Color>,
        targets: impl Into<TargetSet>,
    ) {
        if !self.is_attached {
            return;
        }
        let Some(text) = text else { return };
        let context = OutputContext::from_text(
            text,
            self.resolve_color(color),
            targets.into(),
            self.config.encoding,
        );
        self.submit_context(context).await;
    }

    /// Emit just the platform newline sequence, in the configured default
    /// color.
    pub async fn write_line_empty(&self, targets: impl Into<TargetSet>) {
        self.write_line(None, None, targets).await;
    }

    /// Emit `text` (empty when `None`) followed by the platform newline
    /// sequence, as one request. Text and newline can never be separated by
    /// another task's output.
    pub async fn write_line(
        &self,
        text: Option<&str>,
        color: Option<Color>,
        targets: impl Into<TargetSet>,
    ) {
        if !self.is_attached {
            return;
        }
        let body = text.unwrap_or_default();
        let line = format!("{body}{NEWLINE}");
        let context = OutputContext::from_text(
            &line,
            self.resolve_color(color),
            targets.into(),
            self.config.encoding,
        );
        self.submit_context(context).await;
    }

    /// Redraw the current line in place: emit a carriage return followed by
    /// `text` (no trailing newline), then park the cursor at column 0.
    ///
    /// Blocks until every previously submitted request, and this one, has
    /// been physically written. Does not clear to end of line: when the
    /// previous line was longer, pad `text` with spaces to cover the
    /// leftovers.
    pub async fn overwrite_line(
        &self,
        text: Option<&str>,
        color: Option<Color>,
        targets: impl Into<TargetSet>,
    ) {
        if !self.is_attached {
            return;
        }
        let body = text.unwrap_or_default();
        let line = format!("\r{body}");
        let context = OutputContext::from_text(
            &line,
            self.resolve_color(color),
            targets.into(),
            self.config.encoding,
        );
        match &self.strategy {
            DispatchStrategy::Direct(state) => overwrite_direct(state, &context),
            DispatchStrategy::Pumped(handle) => {
                let (ack_sender, ack_receiver) = oneshot::channel();
                if handle
                    .signal_sender
                    .send(DispatchSignal::Overwrite(context, ack_sender))
                    .await
                    .is_ok()
                {
                    let _ = ack_receiver.await;
                }
            }
        }
    }

    /// Block until everything submitted so far has been rendered and the
    /// devices flushed. Requests held by [`Self::pause`] stay held.
    pub async fn flush(&self) {
        if !self.is_attached {
            return;
        }
        match &self.strategy {
            DispatchStrategy::Direct(state) => flush_direct(state),
            DispatchStrategy::Pumped(handle) => {
                let (ack_sender, ack_receiver) = oneshot::channel();
                if handle
                    .signal_sender
                    .send(DispatchSignal::Flush(ack_sender))
                    .await
                    .is_ok()
                {
                    let _ = ack_receiver.await;
                }
            }
        }
    }

    /// Stop rendering writes; hold them in submission order until
    /// [`Self::resume`]. Useful while another component temporarily owns the
    /// terminal. [`Self::overwrite_line`] and [`Self::flush`] are not held.
    pub async fn pause(&self) {
        if !self.is_attached {
            return;
        }
        match &self.strategy {
            DispatchStrategy::Direct(state) => pause_direct(state),
            DispatchStrategy::Pumped(handle) => {
                if let Err(error) = handle.signal_sender.send(DispatchSignal::Pause).await {
                    tracing::warn!(
                        message = "Dispatch channel closed; pause request dropped",
                        error = %error
                    );
                }
            }
        }
    }

    /// Render everything held since [`Self::pause`], in order, then return
    /// to normal dispatch.
    pub async fn resume(&self) {
        if !self.is_attached {
            return;
        }
        match &self.strategy {
            DispatchStrategy::Direct(state) => resume_direct(state),
            DispatchStrategy::Pumped(handle) => {
                if let Err(error) = handle.signal_sender.send(DispatchSignal::Resume).await {
                    tracing::warn!(
                        message = "Dispatch channel closed; resume request dropped",
                        error = %error
                    );
                }
            }
        }
    }

    /// Drain everything (including paused requests) and flush the devices.
    ///
    /// For [`StrategyChoice::Pumped`] this also ends the pump task; its
    /// channel closes with it, so further writes on this dispatcher or its
    /// clones are silently dropped. A [`StrategyChoice::Direct`] dispatcher
    /// has no task to stop and keeps rendering writes submitted after this
    /// call.
    pub async fn shutdown(&self) {
        if !self.is_attached {
            return;
        }
        match &self.strategy {
            DispatchStrategy::Direct(state) => drain_and_flush(state),
            DispatchStrategy::Pumped(handle) => {
                let (ack_sender, ack_receiver) = oneshot::channel();
                if handle
                    .signal_sender
                    .send(DispatchSignal::Shutdown(ack_sender))
                    .await
                    .is_ok()
                {
                    let _ = ack_receiver.await;
                }
            }
        }
    }

    /// A [`std::io::Write`] adapter over this dispatcher; buffers until
    /// newline, then submits whole lines. This is what plugs the dispatcher
    /// into [`tracing_subscriber`] as a log writer.
    #[must_use]
    pub fn new_console_writer(&self) -> ConsoleWriter { ConsoleWriter::new(self.clone()) }
}
