// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::Path;

use tracing_appender::rolling::{self, RollingFileAppender};

/// Create a non-rolling file appender for the given path. "Rolling" here is
/// the `tracing_appender` type name; with [`rolling::never`] the file simply
/// grows.
///
/// # Errors
///
/// Fails when the path has no parent directory component or no file name
/// component.
pub fn try_create(path_str: &str) -> miette::Result<RollingFileAppender> {
    let path = Path::new(path_str);
    let parent = path
        .parent()
        .ok_or_else(|| miette::miette!("Can't access parent folder of {path_str}"))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| miette::miette!("Can't access file name of {path_str}"))?;
    Ok(rolling::never(parent, file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_create_accepts_a_path_in_a_real_folder() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("my_log.txt");
        let appender = try_create(path.to_str().unwrap());
        assert!(appender.is_ok());
    }

    #[test]
    fn test_try_create_rejects_a_bare_root() {
        assert!(try_create("/").is_err());
    }
}
