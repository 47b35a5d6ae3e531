//! # Workspace Module
//!
//! Resolution of the repository root codestyle operates on.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::debug;

/// The repository root selected for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
  root: PathBuf,
}

impl Workspace {
  pub fn root(&self) -> &Path {
    &self.root
  }
}

/// Resolves `root` to an absolute, existing directory.
pub fn resolve_workspace(root: &Path) -> Result<Workspace> {
  let canonical =
    std::fs::canonicalize(root).with_context(|| format!("Repository root does not exist: {}", root.display()))?;

  if !canonical.is_dir() {
    bail!("Repository root is not a directory: {}", root.display());
  }

  debug!("Using root {}", canonical.display());
  Ok(Workspace { root: canonical })
}
