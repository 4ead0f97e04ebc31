//! Utility functions for common operations.
//!
//! - Atomic file writes for configuration
//! - Text and number formatting shared by the CLI and the TUI

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{DashError, Result};

/// Atomically write content to a file.
///
/// Writes to a temporary file in the same directory, flushes it, then
/// renames it over the target. If any step fails the original file (if it
/// exists) is left unchanged. Missing parent directories are created.
pub fn atomic_write(path: impl AsRef<Path>, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    let parent = path.parent().ok_or_else(|| DashError::IoError {
        context: format!("Cannot determine parent directory for: {}", path.display()),
        source: io::Error::new(io::ErrorKind::InvalidInput, "No parent directory"),
    })?;

    if !parent.as_os_str().is_empty() && !parent.exists() {
        std::fs::create_dir_all(parent).map_err(|e| {
            DashError::io(format!("Failed to create directory: {}", parent.display()), e)
        })?;
    }

    // Same directory keeps the rename on one filesystem.
    let temp_dir = if parent.as_os_str().is_empty() { Path::new(".") } else { parent };
    let mut temp_file = NamedTempFile::new_in(temp_dir).map_err(|e| {
        DashError::io(
            format!("Failed to create temporary file in: {}", temp_dir.display()),
            e,
        )
    })?;

    temp_file.write_all(content).map_err(|e| {
        DashError::io(
            format!("Failed to write to temporary file for: {}", path.display()),
            e,
        )
    })?;

    temp_file.flush().map_err(|e| {
        DashError::io(
            format!("Failed to flush temporary file for: {}", path.display()),
            e,
        )
    })?;

    temp_file.persist(path).map_err(|e| {
        DashError::io(
            format!("Failed to atomically write file: {}", path.display()),
            e.error,
        )
    })?;

    Ok(())
}

/// Truncate `text` to at most `max` characters, marking the cut with `…`.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max - 1).collect();
    out.push('…');
    out
}

/// Compact number formatting for axis labels and tables.
///
/// Integral values print without decimals; large magnitudes get a
/// thousands suffix.
#[must_use]
pub fn format_value(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000_000.0 {
        format!("{:.2}G", value / 1_000_000_000.0)
    } else if abs >= 1_000_000.0 {
        format!("{:.2}M", value / 1_000_000.0)
    } else if abs >= 10_000.0 {
        format!("{:.1}k", value / 1_000.0)
    } else if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_atomic_write_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("file.txt");
        atomic_write(&path, b"hello").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello");

        atomic_write(&path, b"again").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "again");
    }

    #[rstest]
    #[case("GDP", 10, "GDP")]
    #[case("Population", 5, "Popu…")]
    #[case("Emissions", 0, "")]
    fn test_truncate(#[case] input: &str, #[case] max: usize, #[case] expected: &str) {
        assert_eq!(truncate(input, max), expected);
    }

    #[rstest]
    #[case(80.0, "80")]
    #[case(12.345, "12.35")]
    #[case(25_000.0, "25.0k")]
    #[case(-3_400_000.0, "-3.40M")]
    #[case(7_100_000_000.0, "7.10G")]
    fn test_format_value(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_value(value), expected);
    }
}
