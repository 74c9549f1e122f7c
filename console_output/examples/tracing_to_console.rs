// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::style::Color;
use miette::IntoDiagnostic;
use r3bl_console_output::{ConsoleOutput, DisplayPreference, TargetStream, TracingConfig,
                          TracingScope, WriterConfig, init_tracing};
use tracing_core::LevelFilter;

/// Installs a global tracing subscriber whose display output is a
/// [`r3bl_console_output::ConsoleWriter`], so log lines travel through the
/// same dispatcher as the program's own output. Log lines and worker output
/// come out whole and ordered instead of racing each other to the terminal.
///
/// # Run the binary
///
/// ```text
/// cargo run --example tracing_to_console
/// ```
#[tokio::main]
pub async fn main() -> miette::Result<()> {
    let console = ConsoleOutput::try_new_pumped()?;

    let config = TracingConfig {
        scope: TracingScope::Global,
        writer_config: WriterConfig::Display(DisplayPreference::ConsoleWriter(
            console.new_console_writer(),
        )),
        level_filter: LevelFilter::DEBUG,
    };
    init_tracing(config)?;

    tracing::info!("tracing is live; log lines flow through the dispatcher");

    let console_clone = console.clone();
    let worker = tokio::spawn(async move {
        for index in 1..=5 {
            tracing::debug!("worker heartbeat {index}");
            console_clone
                .write_line(
                    Some(&format!("worker output {index}")),
                    Some(Color::Cyan),
                    TargetStream::StdOut,
                )
                .await;
        }
    });
    worker.await.into_diagnostic()?;

    tracing::info!("shutting down");
    console.shutdown().await;

    Ok(())
}
