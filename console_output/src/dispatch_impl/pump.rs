// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The consuming half of [`super::DispatchStrategy::Pumped`]: a single
//! spawned task that drains the signal channel in submission order. Because
//! this task is the only writer, requests from any number of producer tasks
//! come out whole, never interleaved.

use tokio::sync::{broadcast, mpsc, oneshot};

use super::{ConsoleOutputError, DispatchSignal, render, render::SafeDispatchState};

/// Describes the return value of
/// [`process_dispatch_signal`], which allows the calling loop to either
/// carry a value out of the loop, carry an error out of the loop, or keep
/// looping.
#[derive(Debug)]
pub enum ControlFlowExtended<T, E> {
    ReturnOk(T),
    ReturnError(E),
    Continue,
}

/// Spawn the pump task on the given runtime. It ends when either a
/// [`DispatchSignal::Shutdown`] arrives or every sender has been dropped;
/// both paths drain the pause buffer, flush the devices, and then fire
/// `shutdown_complete_sender` exactly once.
pub fn spawn_task_to_monitor_dispatch_channel(
    runtime_handle: &tokio::runtime::Handle,
    mut signal_receiver: mpsc::Receiver<DispatchSignal>,
    state: SafeDispatchState,
    shutdown_complete_sender: broadcast::Sender<()>,
) -> tokio::task::JoinHandle<()> {
    runtime_handle.spawn(async move {
        tracing::debug!("Start monitoring dispatch channel");

        let mut shutdown_ack: Option<oneshot::Sender<()>> = None;
        let mut warnings = Vec::new();
        loop {
            match signal_receiver.recv().await {
                Some(signal) => {
                    let outcome = process_dispatch_signal(signal, &state, &mut warnings);
                    render::report_render_warnings(&mut warnings);
                    match outcome {
                        ControlFlowExtended::ReturnOk(ack) => {
                            shutdown_ack = Some(ack);
                            break;
                        }
                        ControlFlowExtended::ReturnError(error) => {
                            tracing::warn!(
                                message = "Stopped dispatch pump due to render error",
                                error = %error
                            );
                            break;
                        }
                        ControlFlowExtended::Continue => {}
                    }
                }
                None => break,
            }
        }

        render::drain_and_flush(&state);

        if let Some(ack) = shutdown_ack {
            let _ = ack.send(());
        }
        let _ = shutdown_complete_sender.send(());

        tracing::debug!("Stop monitoring dispatch channel");
    })
}

/// Handle one signal. Runs on the pump task, holding the state lock for the
/// duration of the render, never across an await point. Render failures go
/// onto `warnings`; the caller reports them after this returns, when the
/// guard is gone.
pub fn process_dispatch_signal(
    signal: DispatchSignal,
    state: &SafeDispatchState,
    warnings: &mut Vec<render::RenderWarning>,
) -> ControlFlowExtended<oneshot::Sender<()>, ConsoleOutputError> {
    let mut locked_state = state.lock().unwrap();
    match signal {
        DispatchSignal::Dispatch(context) => {
            if locked_state.is_paused {
                locked_state.pause_buffer.push_back(context);
                return ControlFlowExtended::Continue;
            }
            if let Err(error) = render::dispatch_context(&mut locked_state, &context, warnings) {
                return ControlFlowExtended::ReturnError(error);
            }
        }
        DispatchSignal::Overwrite(context, ack) => {
            // Acknowledge even when the render failed, so the caller that is
            // blocked on the ack always resumes.
            let outcome = render::overwrite_context(&mut locked_state, &context, warnings);
            let _ = ack.send(());
            if let Err(error) = outcome {
                return ControlFlowExtended::ReturnError(error);
            }
        }
        DispatchSignal::Flush(ack) => {
            render::flush_devices(&mut locked_state, warnings);
            let _ = ack.send(());
        }
        DispatchSignal::Pause => {
            locked_state.is_paused = true;
        }
        DispatchSignal::Resume => {
            locked_state.is_paused = false;
            if let Err(error) = render::drain_pause_buffer(&mut locked_state, warnings) {
                return ControlFlowExtended::ReturnError(error);
            }
        }
        DispatchSignal::Shutdown(ack) => return ControlFlowExtended::ReturnOk(ack),
    }
    ControlFlowExtended::Continue
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{CHANNEL_CAPACITY, DispatchState, OutputContext, OutputDevice, OutputDeviceExt,
                OutputEncoding, StdoutMock, TargetSet};

    fn make_safe_state_with_mock() -> (SafeDispatchState, StdoutMock) {
        let (stdout_device, stdout_mock) = OutputDevice::new_mock();
        let (stderr_device, _stderr_mock) = OutputDevice::new_mock();
        (
            DispatchState::new_safe(stdout_device, stderr_device),
            stdout_mock,
        )
    }

    fn make_context(text: &str) -> OutputContext {
        OutputContext::from_text(text, None, TargetSet::default(), OutputEncoding::Utf8)
    }

    #[test]
    fn test_process_signal_renders_dispatch() {
        let (state, stdout_mock) = make_safe_state_with_mock();
        let mut warnings = Vec::new();

        let outcome = process_dispatch_signal(
            DispatchSignal::Dispatch(make_context("hi")),
            &state,
            &mut warnings,
        );

        assert!(matches!(outcome, ControlFlowExtended::Continue));
        assert!(warnings.is_empty());
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "hi");
    }

    #[test]
    fn test_process_signal_pause_defers_then_resume_drains() {
        let (state, stdout_mock) = make_safe_state_with_mock();
        let mut warnings = Vec::new();

        drop(process_dispatch_signal(
            DispatchSignal::Pause,
            &state,
            &mut warnings,
        ));
        drop(process_dispatch_signal(
            DispatchSignal::Dispatch(make_context("one ")),
            &state,
            &mut warnings,
        ));
        drop(process_dispatch_signal(
            DispatchSignal::Dispatch(make_context("two ")),
            &state,
            &mut warnings,
        ));
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "");

        drop(process_dispatch_signal(
            DispatchSignal::Resume,
            &state,
            &mut warnings,
        ));
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "one two ");
    }

    #[test]
    fn test_process_signal_shutdown_carries_ack_out_of_the_loop() {
        let (state, _stdout_mock) = make_safe_state_with_mock();
        let (ack_sender, mut ack_receiver) = oneshot::channel::<()>();

        let outcome = process_dispatch_signal(
            DispatchSignal::Shutdown(ack_sender),
            &state,
            &mut Vec::new(),
        );

        // The ack is sent by the pump after its final drain, not here.
        assert!(matches!(outcome, ControlFlowExtended::ReturnOk(_)));
        assert!(ack_receiver.try_recv().is_err());
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_pump_renders_then_acknowledges_shutdown() {
        let (state, stdout_mock) = make_safe_state_with_mock();
        let (signal_sender, signal_receiver) = mpsc::channel(CHANNEL_CAPACITY);
        let (shutdown_complete_sender, mut shutdown_complete_receiver) = broadcast::channel(1);

        drop(spawn_task_to_monitor_dispatch_channel(
            &tokio::runtime::Handle::current(),
            signal_receiver,
            state,
            shutdown_complete_sender,
        ));

        signal_sender
            .send(DispatchSignal::Dispatch(make_context("pumped")))
            .await
            .unwrap();

        let (ack_sender, ack_receiver) = oneshot::channel();
        signal_sender
            .send(DispatchSignal::Shutdown(ack_sender))
            .await
            .unwrap();
        ack_receiver.await.unwrap();
        shutdown_complete_receiver.recv().await.unwrap();

        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "pumped");
    }

    #[tokio::test]
    #[allow(clippy::needless_return)]
    async fn test_pump_drains_when_every_sender_is_dropped() {
        let (state, stdout_mock) = make_safe_state_with_mock();
        let (signal_sender, signal_receiver) = mpsc::channel(CHANNEL_CAPACITY);
        let (shutdown_complete_sender, mut shutdown_complete_receiver) = broadcast::channel(1);

        drop(spawn_task_to_monitor_dispatch_channel(
            &tokio::runtime::Handle::current(),
            signal_receiver,
            state,
            shutdown_complete_sender,
        ));

        signal_sender.send(DispatchSignal::Pause).await.unwrap();
        signal_sender
            .send(DispatchSignal::Dispatch(make_context("held back")))
            .await
            .unwrap();
        drop(signal_sender);

        shutdown_complete_receiver.recv().await.unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "held back");
    }
}
