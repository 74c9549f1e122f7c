// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// The byte used in place of a character that the [`OutputEncoding::Ascii`]
/// encoding cannot represent.
const ASCII_SUBSTITUTE: u8 = b'?';

/// Text encoding used when a write request is converted between bytes and
/// text.
///
/// Every piece of text a dispatcher accepts is normalized through its
/// encoding before it is rendered, so that what reaches the terminal is
/// exactly what a byte-oriented sink using this encoding would show. For
/// [`OutputEncoding::Utf8`] this is the identity transform on well-formed
/// text; for [`OutputEncoding::Ascii`] non-ASCII characters collapse to `?`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputEncoding {
    #[default]
    Utf8,
    Ascii,
}

impl OutputEncoding {
    /// Encode `text` into bytes. Characters the encoding cannot represent
    /// become `?`, one byte per character.
    #[must_use]
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            OutputEncoding::Utf8 => text.as_bytes().to_vec(),
            OutputEncoding::Ascii => text
                .chars()
                .map(|character| {
                    u8::try_from(character)
                        .ok()
                        .filter(u8::is_ascii)
                        .unwrap_or(ASCII_SUBSTITUTE)
                })
                .collect(),
        }
    }

    /// Decode `bytes` into text. Invalid sequences become
    /// [`char::REPLACEMENT_CHARACTER`].
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            OutputEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            OutputEncoding::Ascii => bytes
                .iter()
                .map(|&byte| {
                    if byte.is_ascii() {
                        char::from(byte)
                    } else {
                        char::REPLACEMENT_CHARACTER
                    }
                })
                .collect(),
        }
    }

    /// Encode then decode, ie, what `text` looks like after passing through a
    /// byte stream that uses this encoding.
    #[must_use]
    pub fn round_trip(self, text: &str) -> String { self.decode(&self.encode(text)) }

    /// Single-character version of [`Self::round_trip`].
    #[must_use]
    pub fn normalize_char(self, character: char) -> char {
        match self {
            OutputEncoding::Utf8 => character,
            OutputEncoding::Ascii => {
                if character.is_ascii() {
                    character
                } else {
                    char::from(ASCII_SUBSTITUTE)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_utf8_round_trip_is_identity() {
        let encoding = OutputEncoding::Utf8;
        assert_eq!(encoding.round_trip("héllo ▶ world"), "héllo ▶ world");
    }

    #[test]
    fn test_ascii_encode_substitutes_non_ascii() {
        let encoding = OutputEncoding::Ascii;
        assert_eq!(encoding.encode("héllo"), b"h?llo".to_vec());
        assert_eq!(encoding.round_trip("héllo"), "h?llo");
    }

    #[test]
    fn test_ascii_decode_replaces_high_bytes() {
        let encoding = OutputEncoding::Ascii;
        let decoded = encoding.decode(&[b'a', 200, b'b']);
        assert_eq!(decoded, format!("a{}b", char::REPLACEMENT_CHARACTER));
    }

    #[test]
    fn test_normalize_char_matches_round_trip() {
        assert_eq!(OutputEncoding::Ascii.normalize_char('é'), '?');
        assert_eq!(OutputEncoding::Ascii.normalize_char('z'), 'z');
        assert_eq!(OutputEncoding::Utf8.normalize_char('é'), 'é');
    }
}
