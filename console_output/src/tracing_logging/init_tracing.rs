// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::IntoDiagnostic;
use tracing_core::dispatcher::DefaultGuard;
use tracing_subscriber::{Layer,
                         layer::SubscriberExt,
                         registry::LookupSpan,
                         util::SubscriberInitExt};

use super::{DisplayPreference, TracingConfig, TracingScope, WriterConfig,
            rolling_file_appender_impl};

/// Type alias for a boxed [`Layer`] that a `Vec` of can be handed to
/// [`SubscriberExt::with`].
pub type DynLayer<S> = dyn Layer<S> + Send + Sync + 'static;

/// One builder for every `fmt` layer this crate creates, so the display and
/// file layers format identically. A macro rather than a function because
/// the builder's concrete type changes with each `with_writer` call site.
#[macro_export]
macro_rules! create_fmt {
    () => {
        tracing_subscriber::fmt::layer()
            .compact()
            .without_time()
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(true)
    };
}

/// Install a tracing subscriber built from `config`.
///
/// - [`TracingScope::Global`]: installed for the whole process, returns
///   `None`. Fails if a global subscriber is already set.
/// - [`TracingScope::ThreadLocal`]: active on this thread while the returned
///   guard lives. This is what tests use.
///
/// [`WriterConfig::None`] installs nothing and returns `None`.
///
/// # Errors
///
/// Fails when the log file cannot be set up or the global subscriber is
/// already installed.
pub fn init_tracing(config: TracingConfig) -> miette::Result<Option<DefaultGuard>> {
    if let WriterConfig::None = config.writer_config {
        return Ok(None);
    }
    match config.scope {
        TracingScope::Global => {
            tracing_subscriber::registry()
                .with(try_create_layers(&config)?)
                .try_init()
                .into_diagnostic()?;
            Ok(None)
        }
        TracingScope::ThreadLocal => {
            let subscriber = tracing_subscriber::registry().with(try_create_layers(&config)?);
            Ok(Some(tracing::subscriber::set_default(subscriber)))
        }
    }
}

/// Build the full layer stack: the level filter first, then whichever
/// display and file layers `config.writer_config` asks for.
///
/// # Errors
///
/// Fails when the file layer cannot be created.
pub fn try_create_layers<S>(config: &TracingConfig) -> miette::Result<Vec<Box<DynLayer<S>>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let mut layers: Vec<Box<DynLayer<S>>> = vec![Box::new(config.level_filter)];
    if let Some(display_layer) = try_create_display_layer(config)? {
        layers.push(display_layer);
    }
    if let Some(file_layer) = try_create_file_layer(config)? {
        layers.push(file_layer);
    }
    Ok(layers)
}

/// Returns `None` when `config` asks for no display output.
///
/// # Errors
///
/// Currently infallible; `Result` keeps the signature uniform with
/// [`try_create_file_layer`].
pub fn try_create_display_layer<S>(
    config: &TracingConfig,
) -> miette::Result<Option<Box<DynLayer<S>>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let preference = match &config.writer_config {
        WriterConfig::Display(preference) | WriterConfig::DisplayAndFile(preference, _) => {
            preference
        }
        _ => return Ok(None),
    };

    let layer: Box<DynLayer<S>> = match preference {
        DisplayPreference::Stdout => Box::new(create_fmt!().with_writer(std::io::stdout)),
        DisplayPreference::Stderr => Box::new(create_fmt!().with_writer(std::io::stderr)),
        DisplayPreference::ConsoleWriter(console_writer) => {
            let console_writer = console_writer.clone();
            Box::new(create_fmt!().with_writer(
                move || -> Box<dyn std::io::Write> { Box::new(console_writer.clone()) },
            ))
        }
    };

    Ok(Some(layer))
}

/// Returns `None` when `config` asks for no file output. The file layer
/// writes without ANSI colors.
///
/// # Errors
///
/// Fails when the log file path is unusable; see
/// [`rolling_file_appender_impl::try_create`].
pub fn try_create_file_layer<S>(
    config: &TracingConfig,
) -> miette::Result<Option<Box<DynLayer<S>>>>
where
    S: tracing_core::Subscriber,
    for<'a> S: LookupSpan<'a>,
{
    let file_path = match &config.writer_config {
        WriterConfig::File(file_path) | WriterConfig::DisplayAndFile(_, file_path) => file_path,
        _ => return Ok(None),
    };

    let file = rolling_file_appender_impl::try_create(file_path)?;
    let layer: Box<DynLayer<S>> = Box::new(create_fmt!().with_writer(file).with_ansi(false));

    Ok(Some(layer))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossterm::style::Color;
    use pretty_assertions::assert_eq;
    use tracing_core::LevelFilter;
    use tracing_subscriber::Registry;

    use super::*;
    use crate::{ConsoleOutput, OutputConfig, OutputContext, OutputDevice, OutputDeviceExt,
                OutputEncoding, TargetSet};

    #[test]
    fn test_try_create_display_layer_for_stdout() {
        let config = TracingConfig::new_display(DisplayPreference::Stdout);
        let maybe_layer = try_create_display_layer::<Registry>(&config).unwrap();
        assert!(maybe_layer.is_some());
    }

    #[test]
    fn test_try_create_file_layer_creates_the_file() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("layer_log.txt");
        let config = TracingConfig::new_file(Some(path.to_str().unwrap().to_string()));

        let maybe_layer = try_create_file_layer::<Registry>(&config).unwrap();

        assert!(maybe_layer.is_some());
        assert!(path.exists());
    }

    #[test]
    fn test_try_create_layers_for_display_and_file() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("both_log.txt");
        let config = TracingConfig::new_file_and_display(
            Some(path.to_str().unwrap().to_string()),
            DisplayPreference::Stderr,
        );

        // Level filter + display + file.
        let layers = try_create_layers::<Registry>(&config).unwrap();
        assert_eq!(layers.len(), 3);
    }

    #[test]
    fn test_init_tracing_with_no_writer_installs_nothing() {
        let config = TracingConfig {
            scope: TracingScope::ThreadLocal,
            writer_config: WriterConfig::None,
            level_filter: LevelFilter::DEBUG,
        };
        assert!(init_tracing(config).unwrap().is_none());
    }

    #[test]
    fn test_log_lines_flow_through_the_console_writer() {
        let (stdout_device, stdout_mock) = OutputDevice::new_mock();
        let (stderr_device, _stderr_mock) = OutputDevice::new_mock();
        let console =
            ConsoleOutput::new_with_devices(OutputConfig::default(), stdout_device, stderr_device)
                .unwrap();

        let config = TracingConfig {
            scope: TracingScope::ThreadLocal,
            writer_config: WriterConfig::Display(DisplayPreference::ConsoleWriter(
                console.new_console_writer(),
            )),
            level_filter: LevelFilter::DEBUG,
        };
        let maybe_guard = init_tracing(config).unwrap();
        assert!(maybe_guard.is_some());

        tracing::error!("tracing error message");
        tracing::warn!("tracing warn message");
        tracing::info!("tracing info message");
        tracing::debug!("tracing debug message");
        tracing::trace!("tracing trace message");

        drop(maybe_guard);

        let output = stdout_mock.get_copy_of_buffer_as_string_strip_ansi();
        assert!(output.contains("tracing error message"));
        assert!(output.contains("tracing warn message"));
        assert!(output.contains("tracing info message"));
        assert!(output.contains("tracing debug message"));
        assert!(!output.contains("tracing trace message"));
    }

    /// A render failure is reported via [`tracing`], and with the display
    /// layer routed through [`crate::ConsoleWriter`] that report re-enters
    /// the same dispatcher on the same thread. The submission has to
    /// complete instead of blocking on the state lock.
    #[test]
    fn test_render_failure_reports_reenter_the_dispatcher_without_blocking() {
        let (done_sender, done_receiver) = std::sync::mpsc::channel::<()>();

        let worker = std::thread::spawn(move || {
            let console = ConsoleOutput::new_with_devices(
                OutputConfig::default(),
                OutputDevice::new_mock_broken_pipe(),
                OutputDevice::new_mock_broken_pipe(),
            )
            .unwrap();

            let config = TracingConfig {
                scope: TracingScope::ThreadLocal,
                writer_config: WriterConfig::Display(DisplayPreference::ConsoleWriter(
                    console.new_console_writer(),
                )),
                level_filter: LevelFilter::DEBUG,
            };
            let maybe_guard = init_tracing(config).unwrap();

            // Colored so the color commands fail alongside the text.
            let context = OutputContext::from_text(
                "lost line",
                Some(Color::DarkRed),
                TargetSet::default(),
                OutputEncoding::Utf8,
            );
            console.try_submit_context(context).unwrap();

            drop(maybe_guard);
            done_sender.send(()).ok();
        });

        done_receiver
            .recv_timeout(Duration::from_secs(5))
            .expect("submission never finished; failure reports held up the dispatcher");
        worker.join().unwrap();
    }
}
