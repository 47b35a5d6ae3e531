//! # Output Module
//!
//! This module centralizes all user-facing output for the codestyle tool.
//! It provides consistent formatting, colors, and symbols for terminal output.
//!
//! Everything here respects `-q` (silence) and `-v` (full file lists).

use std::path::Path;

use owo_colors::{OwoColorize, Stream};

use crate::logging::{is_quiet, is_verbose};
use crate::report::{FileAction, FileReport, ProcessingSummary};

/// Symbols used in output
pub mod symbols {
  /// Success
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Failure
  pub const FAILURE: &str = "\u{2717}"; // ✗
  /// Content rewritten
  pub const UPDATED: &str = "\u{21bb}"; // ↻
  /// Formatter output discarded
  pub const WARNING: &str = "!";
}

/// Maximum number of files to show in the default output before truncating
const DEFAULT_FILE_LIST_LIMIT: usize = 20;

/// Print the initial "Checking N files..." or "Processing N files..." message.
pub fn print_start_message(file_count: usize, modify_mode: bool) {
  if is_quiet() {
    return;
  }

  let verb = if modify_mode { "Processing" } else { "Checking" };
  println!("{} {} {}...", verb, file_count, plural(file_count));
}

/// Print a blank line for visual separation (respects quiet mode).
pub fn print_blank_line() {
  if !is_quiet() {
    println!();
  }
}

/// Print the files whose content was (or would be) rewritten.
///
/// In quiet check mode only the bare paths are printed, for scripting.
pub fn print_changed_files(files: &[&FileReport], root: Option<&Path>, check_only: bool) {
  if files.is_empty() {
    return;
  }

  if is_quiet() {
    if check_only {
      for file in sorted(files) {
        println!("{}", make_relative_path(&file.path, root));
      }
    }
    return;
  }

  let count = files.len();
  let header = if check_only {
    format!(
      "{} {} {} would be reformatted:",
      symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()),
      count,
      plural(count)
    )
  } else {
    format!(
      "{} Reformatted {} {}:",
      symbols::UPDATED.if_supports_color(Stream::Stdout, |s| s.green()),
      count,
      plural(count)
    )
  };
  println!("{header}");
  print_file_list(&sorted(files), |file| make_relative_path(&file.path, root));
}

/// Print the files where the formatter reported diagnostics.
pub fn print_fallback_files(files: &[&FileReport], root: Option<&Path>) {
  if is_quiet() || files.is_empty() {
    return;
  }

  let count = files.len();
  println!(
    "{} Formatter reported problems for {} {} (header updated, formatting skipped):",
    symbols::WARNING.if_supports_color(Stream::Stdout, |s| s.yellow()),
    count,
    plural(count)
  );
  print_file_list(&sorted(files), |file| with_message(file, root));
}

/// Print the files that could not be processed, with their errors.
///
/// Failures are printed to stderr, even in quiet mode.
pub fn print_failed_files(files: &[&FileReport], root: Option<&Path>) {
  if files.is_empty() {
    return;
  }

  let count = files.len();
  eprintln!(
    "{} Failed to process {} {}:",
    symbols::FAILURE.if_supports_color(Stream::Stderr, |s| s.red()),
    count,
    plural(count)
  );
  for file in sorted(files) {
    eprintln!("  {}", with_message(file, root));
  }
}

/// Print the success message when nothing needed changing.
pub fn print_all_files_ok() {
  if is_quiet() {
    return;
  }

  println!(
    "{} All files are formatted.",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green())
  );
}

/// Print the processing summary.
///
/// Format: "Summary: X changed, Y unchanged, Z fallback, W failed"
/// In verbose mode, also shows timing.
pub fn print_summary(summary: &ProcessingSummary, check_only: bool) {
  if is_quiet() {
    return;
  }

  let changed_label = if check_only { "to reformat" } else { "reformatted" };
  let failed_str = if summary.failed > 0 {
    summary.failed.if_supports_color(Stream::Stdout, |s| s.red()).to_string()
  } else {
    summary.failed.if_supports_color(Stream::Stdout, |s| s.cyan()).to_string()
  };

  let mut summary_line = format!(
    "Summary: {} {}, {} unchanged, {} fallback, {} failed",
    summary.changed.if_supports_color(Stream::Stdout, |s| s.cyan()),
    changed_label,
    summary.unchanged.if_supports_color(Stream::Stdout, |s| s.cyan()),
    summary.fallback.if_supports_color(Stream::Stdout, |s| s.yellow()),
    failed_str
  );

  if is_verbose() {
    summary_line.push_str(&format!(" ({:.2}s)", summary.processing_time.as_secs_f64()));
  }

  println!("{summary_line}");
}

/// Print a hint for the user about what to do next.
pub fn print_hint(message: &str) {
  if is_quiet() {
    return;
  }

  println!("{}", message.if_supports_color(Stream::Stdout, |s| s.yellow()));
}

/// Reports grouped by how they should be presented.
pub struct CategorizedReports<'a> {
  pub changed: Vec<&'a FileReport>,
  pub fallback: Vec<&'a FileReport>,
  pub failed: Vec<&'a FileReport>,
}

impl<'a> CategorizedReports<'a> {
  /// Categorize a slice of file reports. A fallback file that also changed
  /// appears in both `changed` and `fallback`.
  pub fn from_reports(reports: &'a [FileReport]) -> Self {
    let mut changed = Vec::new();
    let mut fallback = Vec::new();
    let mut failed = Vec::new();

    for report in reports {
      match report.action {
        FileAction::Failed => {
          failed.push(report);
          continue;
        }
        FileAction::Fallback => fallback.push(report),
        FileAction::Formatted => {}
      }
      if report.changed {
        changed.push(report);
      }
    }

    Self {
      changed,
      fallback,
      failed,
    }
  }
}

fn print_file_list<F>(files: &[&FileReport], describe: F)
where
  F: Fn(&FileReport) -> String,
{
  let count = files.len();
  let limit = if is_verbose() { count } else { DEFAULT_FILE_LIST_LIMIT };

  for file in files.iter().take(limit) {
    println!("  {}", describe(*file));
  }

  if count > limit {
    println!(
      "  {}",
      format!("... and {} more (use -v to see all)", count - limit).if_supports_color(Stream::Stdout, |s| s.dimmed())
    );
  }
}

fn sorted<'a>(files: &[&'a FileReport]) -> Vec<&'a FileReport> {
  let mut sorted = files.to_vec();
  sorted.sort_by(|a, b| a.path.cmp(&b.path));
  sorted
}

fn with_message(file: &FileReport, root: Option<&Path>) -> String {
  let path = make_relative_path(&file.path, root);
  match file.message.as_deref().and_then(|m| m.lines().next()) {
    Some(first_line) => format!("{path}: {first_line}"),
    None => path,
  }
}

const fn plural(count: usize) -> &'static str {
  if count == 1 { "file" } else { "files" }
}

/// Make a path relative to the root for display.
pub fn make_relative_path(path: &Path, root: Option<&Path>) -> String {
  let relative = root.and_then(|root| {
    path
      .strip_prefix(root)
      .ok()
      .map(Path::to_path_buf)
      .or_else(|| pathdiff::diff_paths(path, root))
  });

  relative
    .unwrap_or_else(|| path.to_path_buf())
    .to_string_lossy()
    .to_string()
}
