//! # Install Hook Command

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::hooks::{InstallMethod, default_hook_source, install_pre_commit_hook};
use crate::info_log;

/// Arguments for the install-hook command
#[derive(Args, Debug, Default)]
pub struct InstallHookArgs {
  /// Hook script to install (default: pre_commit.py beside the executable)
  #[arg(long, value_name = "FILE")]
  pub source: Option<PathBuf>,

  /// Copy the script instead of symlinking it
  #[arg(long)]
  pub copy: bool,
}

/// Installs the pre-commit hook into the repository containing the current
/// directory.
pub fn run_install_hook(args: &InstallHookArgs) -> Result<()> {
  let source = match &args.source {
    Some(source) => source.clone(),
    None => default_hook_source()?,
  };
  let method = if args.copy {
    InstallMethod::Copy
  } else {
    InstallMethod::platform_default()
  };

  let cwd = std::env::current_dir().context("Failed to get current directory")?;
  let install = install_pre_commit_hook(&cwd, &source, method)?;

  if install.created_hooks_dir {
    info_log!("Created {}", install.hooks_dir.display());
  }
  if install.replaced_existing {
    info_log!("Removed previously installed hook");
  }
  match install.method {
    InstallMethod::Symlink => info_log!(
      "Installed git hook into {} ~> {}",
      install.destination.display(),
      install.source.display()
    ),
    InstallMethod::Copy => info_log!("Installed git hook into {}", install.destination.display()),
  }

  Ok(())
}
