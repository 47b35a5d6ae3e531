//! # File I/O Module
//!
//! Whole-file reads and in-place writes used by the processor.

use std::path::Path;

use anyhow::{Context, Result};

/// File I/O operations for the processor.
pub struct FileIO;

impl FileIO {
  /// Reads the raw bytes of a file.
  pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))
  }

  /// Interprets file bytes as UTF-8 text.
  pub fn decode(path: &Path, bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec()).with_context(|| format!("File is not valid UTF-8: {}", path.display()))
  }

  /// Overwrites a file with the given bytes, without any encoding step.
  ///
  /// No backup is kept.
  pub fn write_bytes(path: &Path, content: &[u8]) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write file: {}", path.display()))
  }
}
