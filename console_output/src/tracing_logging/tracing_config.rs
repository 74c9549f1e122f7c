// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::{self, Debug};

use tracing_core::LevelFilter;

use crate::ConsoleWriter;

/// Fallback log file name used by the constructors that accept an optional
/// path.
pub const DEFAULT_LOG_FILE_NAME: &str = "console_output.log";

/// Configure whether the tracing subscriber is installed for the whole
/// process or just the current thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingScope {
    /// Install globally. Can only happen once per process.
    #[default]
    Global,
    /// Install as the default for the current thread, for as long as the
    /// returned guard lives. This is what tests use, so that parallel tests
    /// do not fight over the global subscriber.
    ThreadLocal,
}

/// Where formatted log lines go.
#[derive(Clone, Debug)]
pub enum WriterConfig {
    /// Drop everything; do not install any output layer.
    None,
    Display(DisplayPreference),
    /// Append to the file at this path.
    File(String),
    DisplayAndFile(DisplayPreference, String),
}

/// The display (terminal) destination for log lines.
///
/// [`Self::ConsoleWriter`] routes them through a [`crate::ConsoleOutput`],
/// which means log lines obey the same no-interleaving and ordering
/// guarantees as the rest of the program's output, instead of racing it.
#[derive(Clone)]
pub enum DisplayPreference {
    Stdout,
    Stderr,
    ConsoleWriter(ConsoleWriter),
}

impl Debug for DisplayPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayPreference::Stdout => write!(f, "Stdout"),
            DisplayPreference::Stderr => write!(f, "Stderr"),
            DisplayPreference::ConsoleWriter(_) => write!(f, "ConsoleWriter"),
        }
    }
}

/// Everything [`crate::init_tracing`] needs.
#[derive(Clone, Debug)]
pub struct TracingConfig {
    pub scope: TracingScope,
    pub writer_config: WriterConfig,
    pub level_filter: LevelFilter,
}

impl TracingConfig {
    /// Log to the given display destination at `DEBUG` and up.
    #[must_use]
    pub fn new_display(preference: DisplayPreference) -> Self {
        Self {
            scope: TracingScope::default(),
            writer_config: WriterConfig::Display(preference),
            level_filter: LevelFilter::DEBUG,
        }
    }

    /// Log to a file at `DEBUG` and up. A `None` path means
    /// [`DEFAULT_LOG_FILE_NAME`] in the current directory.
    #[must_use]
    pub fn new_file(maybe_file_path: Option<String>) -> Self {
        Self {
            scope: TracingScope::default(),
            writer_config: WriterConfig::File(
                maybe_file_path.unwrap_or_else(|| DEFAULT_LOG_FILE_NAME.to_string()),
            ),
            level_filter: LevelFilter::DEBUG,
        }
    }

    /// Log to both a display destination and a file at `DEBUG` and up.
    #[must_use]
    pub fn new_file_and_display(
        maybe_file_path: Option<String>,
        preference: DisplayPreference,
    ) -> Self {
        Self {
            scope: TracingScope::default(),
            writer_config: WriterConfig::DisplayAndFile(
                preference,
                maybe_file_path.unwrap_or_else(|| DEFAULT_LOG_FILE_NAME.to_string()),
            ),
            level_filter: LevelFilter::DEBUG,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_new_file_falls_back_to_the_default_name() {
        let config = TracingConfig::new_file(None);
        match config.writer_config {
            WriterConfig::File(path) => assert_eq!(path, DEFAULT_LOG_FILE_NAME),
            _ => panic!("expected WriterConfig::File"),
        }
        assert_eq!(config.level_filter, LevelFilter::DEBUG);
        assert_eq!(config.scope, TracingScope::Global);
    }

    #[test]
    fn test_display_preference_debug_hides_writer_internals() {
        assert_eq!(format!("{:?}", DisplayPreference::Stdout), "Stdout");
        assert_eq!(format!("{:?}", DisplayPreference::Stderr), "Stderr");
    }
}
