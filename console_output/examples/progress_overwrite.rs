// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::time::Duration;

use crossterm::style::Color;
use r3bl_console_output::{ConsoleOutput, TTYResult, TargetStream, is_output_interactive};

const TOTAL_STEPS: usize = 20;

/// Draws a progress bar by rewriting one terminal line in place with
/// [`ConsoleOutput::overwrite_line`]. Each update is carriage return + text,
/// flushed, cursor parked at column 0. Since overwrite does not clear to end
/// of line, the bar text is kept at a constant width so nothing from the
/// previous frame shows through.
///
/// # Run the binary
///
/// ```text
/// cargo run --example progress_overwrite
/// ```
#[tokio::main]
pub async fn main() -> miette::Result<()> {
    if let TTYResult::IsNotInteractive = is_output_interactive() {
        println!("This example rewrites the current line, so it needs an interactive terminal.");
        return Ok(());
    }

    let console = ConsoleOutput::try_new_pumped()?;

    console
        .write_line(Some("starting work"), None, TargetStream::StdOut)
        .await;

    for step in 1..=TOTAL_STEPS {
        let bar = format!("{}{}", "#".repeat(step), " ".repeat(TOTAL_STEPS - step));
        console
            .overwrite_line(
                Some(&format!("[{bar}] {step:02}/{TOTAL_STEPS}")),
                Some(Color::Green),
                TargetStream::StdOut,
            )
            .await;
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    // Step off the rewritten line before printing normally again.
    console.write_line_empty(TargetStream::StdOut).await;
    console
        .write_line(Some("work complete"), None, TargetStream::StdOut)
        .await;
    console.shutdown().await;

    Ok(())
}
