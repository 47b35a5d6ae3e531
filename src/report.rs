//! # Report Module
//!
//! Per-file outcomes of a run and their summary, plus export of both as JSON
//! or CSV.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
  /// Header rewritten and formatter output used
  Formatted,
  /// Formatter reported diagnostics; only the header rewrite was kept
  Fallback,
  /// The file could not be processed
  Failed,
}

impl std::fmt::Display for FileAction {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      FileAction::Formatted => write!(f, "formatted"),
      FileAction::Fallback => write!(f, "fallback"),
      FileAction::Failed => write!(f, "failed"),
    }
  }
}

/// Information about a processed file for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
  /// Path to the file
  #[serde(with = "path_serialization")]
  pub path: PathBuf,
  /// Outcome of processing
  pub action: FileAction,
  /// Whether the result differs from the file on disk
  pub changed: bool,
  /// Formatter diagnostics or the error message
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
}

impl FileReport {
  pub const fn formatted(path: PathBuf, changed: bool) -> Self {
    Self {
      path,
      action: FileAction::Formatted,
      changed,
      message: None,
    }
  }

  pub const fn fallback(path: PathBuf, changed: bool, diagnostics: String) -> Self {
    Self {
      path,
      action: FileAction::Fallback,
      changed,
      message: Some(diagnostics),
    }
  }

  pub const fn failed(path: PathBuf, error: String) -> Self {
    Self {
      path,
      action: FileAction::Failed,
      changed: false,
      message: Some(error),
    }
  }
}

/// Helper module for serializing/deserializing PathBuf
mod path_serialization {
  use std::path::PathBuf;

  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S>(path: &std::path::Path, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.serialize_str(&path.to_string_lossy())
  }

  pub fn deserialize<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
  where
    D: Deserializer<'de>,
  {
    let s = String::deserialize(deserializer)?;
    Ok(PathBuf::from(s))
  }
}

/// Summary of the processing results
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingSummary {
  /// Total number of files processed
  pub total_files: usize,
  /// Files whose content changed (or would change in check mode)
  pub changed: usize,
  /// Files already in canonical form
  pub unchanged: usize,
  /// Files where formatter output was discarded
  pub fallback: usize,
  /// Files that could not be processed
  pub failed: usize,
  /// Total processing time
  #[serde(skip_serializing)]
  pub processing_time: std::time::Duration,
  /// Processing time in seconds for serialization
  #[serde(rename = "processing_time_seconds")]
  pub processing_time_secs: f64,
  /// Timestamp when the summary was generated
  pub timestamp: i64,
}

impl ProcessingSummary {
  /// Create a ProcessingSummary from a collection of FileReports
  pub fn from_reports(files: &[FileReport], processing_time: std::time::Duration) -> Self {
    let mut summary = Self {
      total_files: files.len(),
      changed: 0,
      unchanged: 0,
      fallback: 0,
      failed: 0,
      processing_time,
      processing_time_secs: processing_time.as_secs_f64(),
      timestamp: Local::now().timestamp(),
    };

    for file in files {
      match file.action {
        FileAction::Failed => {
          summary.failed += 1;
          continue;
        }
        FileAction::Fallback => summary.fallback += 1,
        FileAction::Formatted => {}
      }

      if file.changed {
        summary.changed += 1;
      } else {
        summary.unchanged += 1;
      }
    }

    summary
  }

  pub const fn has_failures(&self) -> bool {
    self.failed > 0
  }
}

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
  /// JSON format for machine readability
  Json,
  /// CSV format for spreadsheet compatibility
  Csv,
}

impl std::fmt::Display for ReportFormat {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      ReportFormat::Json => write!(f, "JSON"),
      ReportFormat::Csv => write!(f, "CSV"),
    }
  }
}

/// Writes a run report to disk.
pub struct ReportGenerator<'a> {
  format: ReportFormat,
  output_path: &'a Path,
}

impl<'a> ReportGenerator<'a> {
  pub const fn new(format: ReportFormat, output_path: &'a Path) -> Self {
    Self { format, output_path }
  }

  /// Render the report and write it to the output path.
  pub fn generate(&self, files: &[FileReport], summary: &ProcessingSummary) -> Result<()> {
    let content = self.render(files, summary)?;

    fs::write(self.output_path, content)
      .with_context(|| format!("Failed to write {} report to {}", self.format, self.output_path.display()))
  }

  /// Render the report without writing it.
  pub fn render(&self, files: &[FileReport], summary: &ProcessingSummary) -> Result<String> {
    match self.format {
      ReportFormat::Json => Self::render_json(files, summary),
      ReportFormat::Csv => Ok(Self::render_csv(files, summary)),
    }
  }

  fn render_json(files: &[FileReport], summary: &ProcessingSummary) -> Result<String> {
    let report = serde_json::json!({
        "summary": summary,
        "files": files,
    });

    Ok(serde_json::to_string_pretty(&report)?)
  }

  fn render_csv(files: &[FileReport], summary: &ProcessingSummary) -> String {
    let mut csv = String::new();

    csv.push_str("file_path,action,changed,message\n");

    for file in files {
      let path = csv_field(&file.path.to_string_lossy());
      let message = file.message.as_deref().map(csv_field).unwrap_or_default();
      csv.push_str(&format!("{},{},{},{}\n", path, file.action, file.changed, message));
    }

    csv.push_str("\n# Summary\n");
    csv.push_str(&format!("Total files processed,{}\n", summary.total_files));
    csv.push_str(&format!("Files changed,{}\n", summary.changed));
    csv.push_str(&format!("Files unchanged,{}\n", summary.unchanged));
    csv.push_str(&format!("Formatter fallbacks,{}\n", summary.fallback));
    csv.push_str(&format!("Files failed,{}\n", summary.failed));
    csv.push_str(&format!(
      "Processing time (seconds),{:.2}\n",
      summary.processing_time.as_secs_f64()
    ));
    csv.push_str(&format!("Generated on,{}\n", Local::now().format("%Y-%m-%d %H:%M:%S")));

    csv
  }
}

/// Escapes commas and flattens newlines so one value stays in one cell.
fn csv_field(value: &str) -> String {
  value.replace(',', "%2C").replace(['\r', '\n'], " ")
}
