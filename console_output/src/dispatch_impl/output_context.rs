// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::style::Color;

use super::{OutputEncoding, TargetSet};
use crate::NEWLINE;

/// One self-contained write request.
///
/// Everything the renderer needs is captured here at construction time: the
/// normalized text, the foreground color to apply (already resolved against
/// the dispatcher's configured default), and the destination streams. This is
/// what makes a request atomic: it travels through the dispatcher as one
/// value and is rendered under one device lock.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputContext {
    /// Text to write, already normalized through the dispatcher's
    /// [`OutputEncoding`].
    pub text: String,
    /// Foreground color for [`Self::text`]. `None` means: write in whatever
    /// color the terminal currently has, and emit no color commands at all.
    pub color: Option<Color>,
    /// Destination streams. Never empty; construction replaces an empty set
    /// with [`TargetSet::default`].
    pub targets: TargetSet,
}

impl OutputContext {
    /// Build a request from a string slice.
    ///
    /// The text is round-tripped through `encoding` so that the rendered
    /// output matches what a byte stream using that encoding would carry,
    /// eg: `"héllo"` becomes `"h?llo"` under [`OutputEncoding::Ascii`].
    #[must_use]
    pub fn from_text(
        text: &str,
        color: Option<Color>,
        targets: TargetSet,
        encoding: OutputEncoding,
    ) -> Self {
        Self::finish(encoding.round_trip(text), color, targets)
    }

    /// Build a request from a single character.
    #[must_use]
    pub fn from_char(
        character: char,
        color: Option<Color>,
        targets: TargetSet,
        encoding: OutputEncoding,
    ) -> Self {
        Self::finish(
            encoding.normalize_char(character).to_string(),
            color,
            targets,
        )
    }

    /// Build a request that repeats one byte `count` times, optionally
    /// followed by the platform newline sequence. The whole byte buffer is
    /// decoded through `encoding`, so a non-ASCII byte shows up as
    /// [`char::REPLACEMENT_CHARACTER`] rather than escaping as raw bytes.
    ///
    /// A `count` of `0` is valid: the request carries just the newline (when
    /// `append_newline` is set) or nothing at all.
    #[must_use]
    pub fn from_repeated_byte(
        byte: u8,
        count: usize,
        append_newline: bool,
        color: Option<Color>,
        targets: TargetSet,
        encoding: OutputEncoding,
    ) -> Self {
        let mut bytes = vec![byte; count];
        if append_newline {
            bytes.extend_from_slice(NEWLINE.as_bytes());
        }
        Self::finish(encoding.decode(&bytes), color, targets)
    }

    fn finish(text: String, color: Option<Color>, targets: TargetSet) -> Self {
        let targets = if targets.is_empty() {
            TargetSet::default()
        } else {
            targets
        };
        Self {
            text,
            color,
            targets,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::TargetStream;

    #[test]
    fn test_repeated_byte_with_newline() {
        let context = OutputContext::from_repeated_byte(
            b'A',
            3,
            true,
            None,
            TargetSet::default(),
            OutputEncoding::Utf8,
        );
        assert_eq!(context.text, format!("AAA{NEWLINE}"));
    }

    #[test]
    fn test_repeated_byte_zero_count() {
        let context = OutputContext::from_repeated_byte(
            b'-',
            0,
            false,
            None,
            TargetSet::default(),
            OutputEncoding::Utf8,
        );
        assert_eq!(context.text, "");

        let with_newline = OutputContext::from_repeated_byte(
            b'-',
            0,
            true,
            None,
            TargetSet::default(),
            OutputEncoding::Utf8,
        );
        assert_eq!(with_newline.text, NEWLINE);
    }

    #[test]
    fn test_char_is_normalized_through_encoding() {
        let context =
            OutputContext::from_char('é', None, TargetSet::default(), OutputEncoding::Ascii);
        assert_eq!(context.text, "?");
    }

    #[test]
    fn test_empty_targets_fall_back_to_default() {
        let context =
            OutputContext::from_text("hi", None, TargetSet::new(), OutputEncoding::Utf8);
        assert_eq!(context.targets, TargetSet::default());
        assert!(context.targets.contains(TargetStream::StdOut));
    }

    #[test]
    fn test_text_round_trips_through_utf8() {
        let context =
            OutputContext::from_text("héllo", None, TargetSet::default(), OutputEncoding::Utf8);
        assert_eq!(context.text, "héllo");
    }
}
