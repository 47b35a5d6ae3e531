//! # Update Command
//!
//! Rewrites the copyright header of every matching file under the root and
//! pipes it through the formatter. This is the default command when no
//! subcommand is specified.

use std::path::PathBuf;
use std::process;
use std::time::Instant;

use anyhow::Result;
use clap::Args;
use tracing::debug;

use crate::config::{CodestyleConfig, load_config};
use crate::diff::DiffManager;
use crate::formatter::ClangFormat;
use crate::{info_log, verbose_log};
use crate::output::{
  CategorizedReports, print_all_files_ok, print_blank_line, print_changed_files, print_failed_files,
  print_fallback_files, print_hint, print_start_message, print_summary,
};
use crate::processor::{FileCollector, HeaderRewriter, Processor};
use crate::report::{FileReport, ProcessingSummary, ReportFormat, ReportGenerator};
use crate::workspace::resolve_workspace;

/// Arguments for the update command
#[derive(Args, Debug, Default)]
pub struct UpdateArgs {
  /// Repository root to walk
  #[arg(long, value_name = "DIR")]
  pub root: Option<PathBuf>,

  /// Path to config file (default: .codestyle.toml in the root)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Ignore config file even if present
  #[arg(long)]
  pub no_config: bool,

  /// clang-format binary to use instead of the one in bin/ beside the tool
  #[arg(long, value_name = "PATH")]
  pub formatter: Option<PathBuf>,

  /// Check mode: report files that would change without writing them
  #[arg(long)]
  pub check: bool,

  /// Show diff of changes in check mode
  #[arg(long)]
  pub show_diff: bool,

  /// Save diff of changes to a file in check mode
  #[arg(long, short = 'o', value_name = "FILE")]
  pub save_diff: Option<PathBuf>,

  /// Generate a JSON report of the run and save to the specified path
  #[arg(long, value_name = "OUTPUT")]
  pub report_json: Option<PathBuf>,

  /// Generate a CSV report of the run and save to the specified path
  #[arg(long, value_name = "OUTPUT")]
  pub report_csv: Option<PathBuf>,
}

/// Run the update command with the given arguments
pub fn run_update(args: UpdateArgs) -> Result<()> {
  // Not required at the clap level: these args are also flattened into the
  // top-level command, which `install-hook` shares.
  let Some(root) = args.root.as_deref() else {
    eprintln!("ERROR: Missing required argument: --root <DIR>");
    process::exit(1);
  };
  let workspace = resolve_workspace(root)?;
  let root = workspace.root().to_path_buf();

  let file_config = load_config(args.config.as_deref(), &root, args.no_config)?;
  if file_config.is_some() {
    debug!("Using configuration file overrides");
  }
  let config = CodestyleConfig::resolve(file_config, &root, args.formatter)?;
  verbose_log!("Using formatter: {}", config.formatter.display());

  let check_only = args.check;
  let diff_manager = DiffManager::new(args.show_diff, args.save_diff);
  diff_manager.init()?;

  let (files, walk_errors) = FileCollector::from_config(&config)?.collect_files_and_errors(&root);

  print_start_message(files.len(), !check_only);

  if files.is_empty() && walk_errors.is_empty() {
    print_blank_line();
    print_all_files_ok();
    return Ok(());
  }

  let processor = Processor::new(
    HeaderRewriter::from_config(&config),
    Box::new(ClangFormat::new(config.formatter.clone())),
    check_only,
    Some(diff_manager),
  );

  let start_time = Instant::now();
  let mut file_reports: Vec<FileReport> = walk_errors
    .into_iter()
    .map(|e| FileReport::failed(e.path.clone(), e.to_string()))
    .collect();
  file_reports.extend(processor.process_all(files));
  let elapsed = start_time.elapsed();

  let summary = ProcessingSummary::from_reports(&file_reports, elapsed);
  let categorized = CategorizedReports::from_reports(&file_reports);

  print_blank_line();

  if categorized.changed.is_empty() && categorized.failed.is_empty() {
    print_all_files_ok();
  }
  print_changed_files(&categorized.changed, Some(&root), check_only);
  if !categorized.fallback.is_empty() {
    print_blank_line();
    print_fallback_files(&categorized.fallback, Some(&root));
  }
  print_failed_files(&categorized.failed, Some(&root));

  print_blank_line();
  print_summary(&summary, check_only);

  let would_change = check_only && !categorized.changed.is_empty();
  if would_change {
    print_blank_line();
    print_hint("Run without --check to apply formatting.");
  }

  for (format, output_path) in [
    (ReportFormat::Json, args.report_json.as_ref()),
    (ReportFormat::Csv, args.report_csv.as_ref()),
  ] {
    let Some(output_path) = output_path else {
      continue;
    };
    let report_generator = ReportGenerator::new(format, output_path);
    if let Err(e) = report_generator.generate(&file_reports, &summary) {
      eprintln!("Error generating {format} report: {e:#}");
    } else {
      info_log!("Generated {} report at {}", format, output_path.display());
    }
  }

  if summary.has_failures() || would_change {
    process::exit(1);
  }

  Ok(())
}
