// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Diagnostic dump of how the configured [`OutputEncoding`] renders each
//! byte value. Purely a consumer of the write API; handy when diagnosing
//! garbled box-drawing or accented characters on a misconfigured terminal.

use crate::{ConsoleOutput, OutputEncoding, TargetSet};

const CODE_PAGE_LAST_BYTE: u8 = 254;
const CODE_PAGE_ROW_WIDTH: u8 = 8;
const BELL_BYTE: u8 = 7;
/// Backspace, tab, linefeed, carriage return: printing these would wreck the
/// table layout, so they render as [`PLACEHOLDER_GLYPH`].
const PLACEHOLDER_BYTES: [u8; 4] = [8, 9, 10, 13];
const PLACEHOLDER_GLYPH: char = '.';

fn code_page_glyph(encoding: OutputEncoding, byte: u8) -> char {
    if PLACEHOLDER_BYTES.contains(&byte) {
        return PLACEHOLDER_GLYPH;
    }
    encoding
        .decode(&[byte])
        .chars()
        .next()
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}

impl ConsoleOutput {
    /// Print a table of byte values `0` through `254` with the glyph each
    /// one decodes to: `"<3-digit-decimal> <glyph>   "`, 8 entries per row,
    /// with one extra space after the bell entry (byte 7) for alignment.
    pub async fn print_current_code_page(&self) {
        if !self.is_attached() {
            return;
        }
        for byte in 0..=CODE_PAGE_LAST_BYTE {
            let glyph = code_page_glyph(self.config.encoding, byte);
            self.write_text(
                Some(&format!("{byte:03} {glyph}   ")),
                None,
                TargetSet::default(),
            )
            .await;
            if byte == BELL_BYTE {
                self.write_text(Some(" "), None, TargetSet::default()).await;
            }
            if byte % CODE_PAGE_ROW_WIDTH == CODE_PAGE_ROW_WIDTH - 1 {
                self.write_line_empty(TargetSet::default()).await;
            }
        }
        // The final row stops at byte 254, so it needs its own terminator.
        self.write_line_empty(TargetSet::default()).await;
    }
}
