//! # Diff Module
//!
//! Line diffs between a file on disk and what codestyle would write, shown in
//! check mode.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};
use similar::{ChangeTag, TextDiff};

/// Renders diffs to stderr and/or appends them to a file.
#[derive(Debug, Default)]
pub struct DiffManager {
  /// Whether to print diffs to stderr
  pub show_diff: bool,

  /// File that receives every diff of the run
  pub save_diff_path: Option<PathBuf>,
}

impl DiffManager {
  pub const fn new(show_diff: bool, save_diff_path: Option<PathBuf>) -> Self {
    Self {
      show_diff,
      save_diff_path,
    }
  }

  /// Whether any diff output was requested.
  pub const fn is_enabled(&self) -> bool {
    self.show_diff || self.save_diff_path.is_some()
  }

  /// Truncates the diff file so a run never appends to a stale one.
  pub fn init(&self) -> Result<()> {
    if let Some(ref path) = self.save_diff_path {
      std::fs::write(path, "").with_context(|| format!("Failed to create diff file: {}", path.display()))?;
    }
    Ok(())
  }

  /// Builds the diff text for one file.
  pub fn render(path: &Path, original: &str, new: &str) -> String {
    let diff = TextDiff::from_lines(original, new);

    let mut content = format!("Diff for {}:\n", path.display());
    for change in diff.iter_all_changes() {
      let sign = match change.tag() {
        ChangeTag::Delete => "-",
        ChangeTag::Insert => "+",
        ChangeTag::Equal => " ",
      };
      content.push_str(sign);
      content.push_str(change.value());
      if change.missing_newline() {
        content.push('\n');
      }
    }
    content
  }

  /// Displays and/or saves the diff between `original` and `new`.
  pub fn display_diff(&self, path: &Path, original: &str, new: &str) -> Result<()> {
    if !self.is_enabled() {
      return Ok(());
    }

    let content = Self::render(path, original, new);

    if self.show_diff {
      for line in content.lines() {
        if line.starts_with('+') {
          eprintln!("{}", line.if_supports_color(Stream::Stderr, |l| l.green()));
        } else if line.starts_with('-') {
          eprintln!("{}", line.if_supports_color(Stream::Stderr, |l| l.red()));
        } else {
          eprintln!("{line}");
        }
      }
      eprintln!();
    }

    if let Some(ref diff_path) = self.save_diff_path {
      let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(diff_path)
        .with_context(|| format!("Failed to open diff file: {}", diff_path.display()))?;
      writeln!(file, "{content}").with_context(|| format!("Failed to write diff file: {}", diff_path.display()))?;
    }

    Ok(())
  }
}
