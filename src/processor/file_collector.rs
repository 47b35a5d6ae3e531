//! # File Collector Module
//!
//! Recursive discovery of source files under a root directory.
//!
//! Excluded directories are pruned as soon as they are reached, so nothing
//! beneath them is ever read.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use tracing::{debug, trace, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::CodestyleConfig;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
  case_sensitive: true,
  require_literal_separator: true,
  require_literal_leading_dot: false,
};

/// A directory that could not be read during the walk.
#[derive(Debug, thiserror::Error)]
#[error("Failed to read directory {}: {source}", path.display())]
pub struct WalkError {
  pub path: PathBuf,
  source: walkdir::Error,
}

/// Matches file names against glob patterns and prunes excluded directories.
pub struct FileCollector {
  patterns: Vec<Pattern>,
  exclude_dirs: Vec<String>,
}

impl FileCollector {
  /// Creates a collector for the given file name globs and excluded directory
  /// names.
  pub fn new(patterns: &[String], exclude_dirs: &[String]) -> Result<Self> {
    let patterns = patterns
      .iter()
      .map(|p| Pattern::new(p).with_context(|| format!("Invalid glob pattern: {p}")))
      .collect::<Result<Vec<_>>>()?;

    Ok(Self {
      patterns,
      exclude_dirs: exclude_dirs.to_vec(),
    })
  }

  pub fn from_config(config: &CodestyleConfig) -> Result<Self> {
    Self::new(&config.patterns, &config.exclude_dirs)
  }

  /// Checks a bare file name against every pattern.
  pub fn matches_file_name(&self, file_name: &str) -> bool {
    self.patterns.iter().any(|p| p.matches_with(file_name, MATCH_OPTIONS))
  }

  /// Checks whether a directory name is in the exclude set.
  pub fn is_excluded_dir(&self, dir_name: &OsStr) -> bool {
    self.exclude_dirs.iter().any(|excluded| OsStr::new(excluded) == dir_name)
  }

  /// Lazily walks `root`, yielding every matching file exactly once.
  ///
  /// Entries are visited in file name order. The root itself is never pruned,
  /// even when its own name is excluded. Unreadable directories are yielded as
  /// errors and the walk continues past them.
  pub fn walk(&self, root: &Path) -> Walk<'_> {
    debug!("Scanning directory: {}", root.display());
    Walk {
      collector: self,
      root: root.to_path_buf(),
      entries: WalkDir::new(root).sort_by_file_name().into_iter(),
    }
  }

  /// Collects the whole walk, stopping at the first error.
  pub fn collect_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
    Ok(self.walk(root).collect::<Result<Vec<_>, _>>()?)
  }

  /// Collects the whole walk, setting aside unreadable directories instead of
  /// stopping at them.
  pub fn collect_files_and_errors(&self, root: &Path) -> (Vec<PathBuf>, Vec<WalkError>) {
    let start_time = std::time::Instant::now();
    let mut files = Vec::new();
    let mut errors = Vec::new();

    for entry in self.walk(root) {
      match entry {
        Ok(path) => files.push(path),
        Err(e) => {
          warn!("{}", e);
          errors.push(e);
        }
      }
    }

    debug!(
      "Found {} files ({} unreadable directories) in {}ms",
      files.len(),
      errors.len(),
      start_time.elapsed().as_millis()
    );
    (files, errors)
  }

  fn is_candidate(&self, entry: &DirEntry) -> bool {
    let is_file = entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file());
    is_file && self.matches_file_name(&entry.file_name().to_string_lossy())
  }
}

/// One-shot iterator over the files matched by a [`FileCollector`].
pub struct Walk<'a> {
  collector: &'a FileCollector,
  root: PathBuf,
  entries: walkdir::IntoIter,
}

impl Iterator for Walk<'_> {
  type Item = Result<PathBuf, WalkError>;

  fn next(&mut self) -> Option<Self::Item> {
    loop {
      let entry = match self.entries.next()? {
        Ok(entry) => entry,
        Err(source) => {
          let path = source.path().map_or_else(|| self.root.clone(), Path::to_path_buf);
          return Some(Err(WalkError { path, source }));
        }
      };

      if entry.file_type().is_dir() {
        if entry.depth() > 0 && self.collector.is_excluded_dir(entry.file_name()) {
          trace!("Pruning excluded directory: {}", entry.path().display());
          self.entries.skip_current_dir();
        }
        continue;
      }

      if self.collector.is_candidate(&entry) {
        return Some(Ok(entry.into_path()));
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use tempfile::TempDir;

  use super::*;
  use crate::config::{DEFAULT_EXCLUDE_DIRS, DEFAULT_PATTERNS};

  fn default_collector() -> FileCollector {
    let patterns: Vec<String> = DEFAULT_PATTERNS.iter().map(|s| (*s).to_string()).collect();
    let excludes: Vec<String> = DEFAULT_EXCLUDE_DIRS.iter().map(|s| (*s).to_string()).collect();
    FileCollector::new(&patterns, &excludes).expect("valid patterns")
  }

  fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("has parent")).expect("create dirs");
    fs::write(path, "int x;\n").expect("write file");
  }

  fn relative_names(root: &Path, files: &[PathBuf]) -> Vec<String> {
    files
      .iter()
      .map(|f| f.strip_prefix(root).expect("under root").to_string_lossy().replace('\\', "/"))
      .collect()
  }

  #[test]
  fn test_matches_file_name() {
    let collector = default_collector();
    assert!(collector.matches_file_name("AppDelegate.m"));
    assert!(collector.matches_file_name("Bridge.mm"));
    assert!(collector.matches_file_name("AppDelegate.h"));
    assert!(!collector.matches_file_name("main.swift"));
    assert!(!collector.matches_file_name("AppDelegate.M"));
    assert!(!collector.matches_file_name("notes.md"));
  }

  #[test]
  fn test_walk_matches_patterns_only() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();
    touch(root, "Sources/A.m");
    touch(root, "Sources/A.h");
    touch(root, "Sources/B.mm");
    touch(root, "Sources/C.swift");
    touch(root, "README.md");

    let files = default_collector().collect_files(root).expect("walk");

    assert_eq!(relative_names(root, &files), vec!["Sources/A.h", "Sources/A.m", "Sources/B.mm"]);
  }

  #[test]
  fn test_walk_prunes_excluded_dirs_at_any_depth() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();
    touch(root, "App/Main.m");
    touch(root, "Pods/AFNetworking/AF.m");
    touch(root, "App/Vendor/Thing.h");
    touch(root, "App/Deep/er/lib/nested/Gen.m");
    touch(root, "App/library/Kept.m");

    let files = default_collector().collect_files(root).expect("walk");

    assert_eq!(relative_names(root, &files), vec!["App/Main.m", "App/library/Kept.m"]);
  }

  #[test]
  fn test_walk_does_not_prune_root_with_excluded_name() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path().join("lib");
    touch(&root, "Kept.m");

    let files = default_collector().collect_files(&root).expect("walk");

    assert_eq!(relative_names(&root, &files), vec!["Kept.m"]);
  }

  #[test]
  fn test_walk_yields_each_file_once() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();
    touch(root, "View.m");

    let patterns = vec!["*.m".to_string(), "View*".to_string()];
    let collector = FileCollector::new(&patterns, &[]).expect("valid patterns");
    let files = collector.collect_files(root).expect("walk");

    assert_eq!(files.len(), 1);
  }

  #[test]
  fn test_excluded_file_name_is_not_pruned() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();
    // A plain file named like an excluded directory is still a candidate.
    let patterns = vec!["lib".to_string()];
    let excludes = vec!["lib".to_string()];
    fs::write(root.join("lib"), "x").expect("write file");

    let collector = FileCollector::new(&patterns, &excludes).expect("valid patterns");
    let files = collector.collect_files(root).expect("walk");

    assert_eq!(files.len(), 1);
  }

  #[test]
  fn test_walk_missing_root_is_an_error() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let result = default_collector().collect_files(&temp_dir.path().join("missing"));
    assert!(result.is_err());
  }

  #[cfg(unix)]
  #[test]
  fn test_unreadable_dir_is_set_aside() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().expect("create temp dir");
    let root = temp_dir.path();
    touch(root, "App/A.m");
    touch(root, "App/Locked/Hidden.m");
    touch(root, "App/Z.m");
    let locked = root.join("App/Locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("chmod");

    // Permission bits do not apply to a privileged user.
    if fs::read_dir(&locked).is_ok() {
      fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("chmod");
      return;
    }

    let (files, errors) = default_collector().collect_files_and_errors(root);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("chmod");

    assert_eq!(relative_names(root, &files), vec!["App/A.m", "App/Z.m"]);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path, locked);
    assert!(default_collector().collect_files(root).is_ok());
  }

  #[test]
  fn test_invalid_pattern() {
    let result = FileCollector::new(&["[".to_string()], &[]);
    assert!(result.is_err());
  }
}
