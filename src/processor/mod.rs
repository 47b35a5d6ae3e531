//! # Processor Module
//!
//! This module contains the per-file pipeline: read, rewrite the copyright
//! header, run the formatter and write the result back.
//!
//! The module is organized into several submodules:
//! - [`file_collector`] - Discovery of matching files under the root
//! - [`file_io`] - File reading and writing operations
//! - [`header`] - Line splitting and header replacement
//!
//! The [`Processor`] struct is the main entry point, orchestrating the
//! submodules and the [`Formatter`](crate::formatter::Formatter).

pub mod file_collector;
pub mod file_io;
pub mod header;

use std::path::{Path, PathBuf};

use anyhow::Result;
pub use file_collector::{FileCollector, Walk, WalkError};
pub use file_io::FileIO;
pub use header::{HeaderRewriter, join_lines, split_lines};
use tracing::{debug, warn};

use crate::diff::DiffManager;
use crate::formatter::{FormatOutcome, Formatter};
use crate::info_log;
use crate::report::FileReport;

/// Runs the header rewrite and formatter over files.
///
/// In check mode nothing is written; the reports only tell whether a file
/// would change.
pub struct Processor {
  /// Canonical header replacement
  rewriter: HeaderRewriter,

  /// External formatter the rewritten text is piped through
  formatter: Box<dyn Formatter>,

  /// Whether to only report differences without writing
  check_only: bool,

  /// Diff output for check mode
  diff_manager: DiffManager,
}

impl Processor {
  pub fn new(
    rewriter: HeaderRewriter,
    formatter: Box<dyn Formatter>,
    check_only: bool,
    diff_manager: Option<DiffManager>,
  ) -> Self {
    Self {
      rewriter,
      formatter,
      check_only,
      diff_manager: diff_manager.unwrap_or_default(),
    }
  }

  /// Produces the content a file should have: header rewritten, then piped
  /// through the formatter.
  pub fn render(&self, content: &str, working_dir: &Path) -> Result<FormatOutcome> {
    let lines = split_lines(content);
    let rewritten = self.rewriter.rewrite(&lines);
    let joined = join_lines(&rewritten);

    Ok(self.formatter.format(&joined, working_dir)?)
  }

  /// Processes a single file.
  ///
  /// Formatter diagnostics do not fail the file: the rewritten but
  /// unformatted text is used and the report records a fallback.
  pub fn process_file(&self, path: &Path) -> Result<FileReport> {
    let original = FileIO::read_bytes(path)?;
    let content = FileIO::decode(path, &original)?;

    let outcome = self.render(&content, working_dir_of(path))?;
    let changed = outcome.content() != original.as_slice();

    let report = match &outcome {
      FormatOutcome::Formatted(_) => FileReport::formatted(path.to_path_buf(), changed),
      FormatOutcome::Fallback {
        diagnostics, exit_code, ..
      } => {
        warn!(
          "Formatter reported problems for {} (exit code {:?}); keeping unformatted content: {}",
          path.display(),
          exit_code,
          diagnostics
        );
        FileReport::fallback(path.to_path_buf(), changed, diagnostics.clone())
      }
    };

    if !changed {
      debug!("Already canonical: {}", path.display());
      return Ok(report);
    }

    if self.check_only {
      self
        .diff_manager
        .display_diff(path, &content, &String::from_utf8_lossy(outcome.content()))?;
    } else {
      FileIO::write_bytes(path, &outcome.into_content())?;
      debug!("Rewrote {}", path.display());
    }

    Ok(report)
  }

  /// Processes every file in order, recording a report per file.
  ///
  /// A failing file is recorded and the remaining files are still processed.
  pub fn process_all<I>(&self, files: I) -> Vec<FileReport>
  where
    I: IntoIterator<Item = PathBuf>,
  {
    let files = files.into_iter();
    let mut reports = Vec::with_capacity(files.size_hint().0);

    for path in files {
      let display_name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string());
      if self.check_only {
        info_log!("Checking {}...", display_name);
      } else {
        info_log!("Processing {}...", display_name);
      }

      match self.process_file(&path) {
        Ok(report) => reports.push(report),
        Err(e) => {
          warn!("Failed to process {}: {:#}", path.display(), e);
          reports.push(FileReport::failed(path, format!("{e:#}")));
        }
      }
    }

    reports
  }
}

/// Directory the formatter runs in for `path`.
fn working_dir_of(path: &Path) -> &Path {
  match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  }
}
