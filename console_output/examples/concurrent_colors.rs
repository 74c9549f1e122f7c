// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::time::Duration;

use crossterm::style::Color;
use miette::IntoDiagnostic;
use r3bl_console_output::{ConsoleOutput, TargetStream};

/// Five workers race to write through one dispatcher. Every line reaches the
/// terminal whole and in its own color, and the terminal's own color is back
/// in place once each line is done. Compare with what you get from five
/// tasks calling [`println!`] with color codes: braided fragments and leaked
/// colors.
///
/// # Run the binary
///
/// ```text
/// cargo run --example concurrent_colors
/// ```
#[tokio::main]
pub async fn main() -> miette::Result<()> {
    let console = ConsoleOutput::try_new_pumped()?;

    let colors = [
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
    ];

    let mut join_handles = Vec::new();
    for (worker_index, color) in colors.into_iter().enumerate() {
        let console_clone = console.clone();
        join_handles.push(tokio::spawn(async move {
            for line_index in 1..=4 {
                console_clone
                    .write_line(
                        Some(&format!("worker {worker_index} says line {line_index}")),
                        Some(color),
                        TargetStream::StdOut,
                    )
                    .await;
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }));
    }

    for join_handle in join_handles {
        join_handle.await.into_diagnostic()?;
    }

    console
        .write_line(Some("all workers done"), None, TargetStream::StdOut)
        .await;
    console.shutdown().await;

    Ok(())
}
