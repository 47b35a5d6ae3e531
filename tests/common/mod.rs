#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Canonical header produced with the default configuration.
pub const CANONICAL_HEADER: &str = "//\n// Copyright (c) ... All rights reserved.\n//\n";

/// Formatter that echoes its input.
pub const IDENTITY_FORMATTER: &str = "cat";

/// Formatter that upper-cases its input.
pub const UPPERCASE_FORMATTER: &str = "tr 'a-z' 'A-Z'";

/// Formatter that rejects its input with a diagnostic.
pub const FAILING_FORMATTER: &str = "cat >/dev/null\necho 'error: expected expression' >&2\nexit 1";

/// Writes a shell script standing in for clang-format.
///
/// The script is left without execute permission when `executable` is false.
#[cfg(unix)]
pub fn write_formatter(dir: &Path, body: &str, executable: bool) -> Result<PathBuf> {
  use std::os::unix::fs::PermissionsExt;

  let path = dir.join("clang-format");
  fs::write(&path, format!("#!/bin/sh\n{body}\n")).with_context(|| format!("Failed to write {}", path.display()))?;
  let mode = if executable { 0o755 } else { 0o644 };
  fs::set_permissions(&path, fs::Permissions::from_mode(mode))?;
  Ok(path)
}

/// Writes `content` to `root/relative`, creating parent directories.
pub fn write_source(root: &Path, relative: &str, content: &str) -> Result<PathBuf> {
  let path = root.join(relative);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent)?;
  }
  fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
  Ok(path)
}

/// Creates a small Objective-C tree with one excluded `Pods` directory.
pub fn create_objc_tree(root: &Path) -> Result<()> {
  write_source(root, "App/AppDelegate.m", "// Created by Xcode.\n//\n#import \"AppDelegate.h\"\n")?;
  write_source(root, "App/AppDelegate.h", "@interface AppDelegate\n@end\n")?;
  write_source(root, "App/Model/Item.mm", "\n\n// item.mm\nint item;\n\n")?;
  write_source(root, "App/README.md", "# Readme\n")?;
  write_source(root, "Pods/Lib/Lib.m", "// vendored\nint lib;\n")?;
  Ok(())
}

/// Initializes an empty git repository in `dir`.
pub fn init_git_repo(dir: &Path) -> Result<git2::Repository> {
  git2::Repository::init(dir).with_context(|| format!("Failed to init repository in {}", dir.display()))
}
