//! # Hooks Module
//!
//! Installation of the pre-commit hook into a git repository.
//!
//! The hook script is linked into `.git/hooks/pre-commit` on Unix and copied
//! on Windows. A previously installed hook is always replaced.

use std::path::{Path, PathBuf};

use anyhow::Context;
use git2::Repository;
use tracing::debug;

/// File name of the hook inside the hooks directory.
pub const PRE_COMMIT_HOOK: &str = "pre-commit";

/// Default hook script, looked up beside the running executable.
pub const DEFAULT_HOOK_SOURCE: &str = "pre_commit.py";

/// Error type for hook installation.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
  /// The hook script to install does not exist.
  #[error("Hook source '{path}' does not exist: {source}")]
  SourceMissing { path: PathBuf, source: std::io::Error },

  /// A filesystem operation on the hooks directory failed.
  #[error("Failed to {action} '{path}': {source}")]
  Io {
    action: &'static str,
    path: PathBuf,
    source: std::io::Error,
  },
}

/// How the hook script ends up in the hooks directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMethod {
  Symlink,
  Copy,
}

impl InstallMethod {
  /// Symlink where the platform supports it without privileges, copy
  /// otherwise.
  pub const fn platform_default() -> Self {
    if cfg!(unix) { InstallMethod::Symlink } else { InstallMethod::Copy }
  }
}

/// What [`install_pre_commit_hook`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookInstall {
  pub hooks_dir: PathBuf,
  pub destination: PathBuf,
  pub source: PathBuf,
  pub method: InstallMethod,
  /// The hooks directory did not exist and was created
  pub created_hooks_dir: bool,
  /// A previous hook was removed
  pub replaced_existing: bool,
}

/// Hooks directory of the repository containing `start`.
///
/// Falls back to `<start>/.git/hooks` when no repository is found, so the
/// directory can still be prepared ahead of `git init`.
pub fn hooks_dir_for(start: &Path) -> PathBuf {
  match Repository::discover(start) {
    Ok(repo) => repo.commondir().join("hooks"),
    Err(e) => {
      debug!("No git repository found from {}: {}", start.display(), e.message());
      start.join(".git").join("hooks")
    }
  }
}

/// Default hook script location: `pre_commit.py` beside the executable.
pub fn default_hook_source() -> anyhow::Result<PathBuf> {
  let exe = std::env::current_exe().context("Failed to locate the running executable")?;
  let exe_dir = exe.parent().unwrap_or_else(|| Path::new("."));
  Ok(exe_dir.join(DEFAULT_HOOK_SOURCE))
}

/// Installs `source` as the pre-commit hook of the repository containing
/// `start`.
pub fn install_pre_commit_hook(start: &Path, source: &Path, method: InstallMethod) -> Result<HookInstall, HookError> {
  let source = std::fs::canonicalize(source).map_err(|e| HookError::SourceMissing {
    path: source.to_path_buf(),
    source: e,
  })?;

  let hooks_dir = hooks_dir_for(start);
  let created_hooks_dir = !hooks_dir.exists();
  if created_hooks_dir {
    std::fs::create_dir_all(&hooks_dir).map_err(|e| io_error("create", &hooks_dir, e))?;
  }

  let destination = hooks_dir.join(PRE_COMMIT_HOOK);
  let replaced_existing = match std::fs::symlink_metadata(&destination) {
    Ok(metadata) if metadata.file_type().is_symlink() || metadata.is_file() => {
      std::fs::remove_file(&destination).map_err(|e| io_error("remove", &destination, e))?;
      true
    }
    _ => false,
  };

  match method {
    InstallMethod::Symlink => link_hook(&source, &destination)?,
    InstallMethod::Copy => {
      std::fs::copy(&source, &destination).map_err(|e| io_error("copy hook to", &destination, e))?;
    }
  }
  debug!("Installed {} ({:?})", destination.display(), method);

  Ok(HookInstall {
    hooks_dir,
    destination,
    source,
    method,
    created_hooks_dir,
    replaced_existing,
  })
}

#[cfg(unix)]
fn link_hook(source: &Path, destination: &Path) -> Result<(), HookError> {
  std::os::unix::fs::symlink(source, destination).map_err(|e| io_error("link hook to", destination, e))
}

#[cfg(not(unix))]
fn link_hook(source: &Path, destination: &Path) -> Result<(), HookError> {
  std::fs::copy(source, destination)
    .map(|_| ())
    .map_err(|e| io_error("copy hook to", destination, e))
}

fn io_error(action: &'static str, path: &Path, source: std::io::Error) -> HookError {
  HookError::Io {
    action,
    path: path.to_path_buf(),
    source,
  }
}
