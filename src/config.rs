//! # Configuration Module
//!
//! This module holds the run configuration for codestyle: which files are
//! matched, which directories are pruned, where the formatter binary lives and
//! which canonical header is written.
//!
//! Defaults can be overridden by a `.codestyle.toml` file in the repository
//! root, a file named by the `CODESTYLE_CONFIG` environment variable, or a
//! file passed with `--config`.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::verbose_log;

/// The default config file name.
pub const DEFAULT_CONFIG_FILENAME: &str = ".codestyle.toml";

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "CODESTYLE_CONFIG";

/// File name globs processed by default.
pub const DEFAULT_PATTERNS: &[&str] = &["*.m", "*.mm", "*.h"];

/// Directory names never descended into by default.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &["Pods", "Vendor", "lib"];

/// Line comment marker that identifies header lines.
pub const DEFAULT_COMMENT_MARKER: &str = "//";

/// Canonical copyright block written at the top of every file.
pub const DEFAULT_HEADER: &[&str] = &["//", "// Copyright (c) ... All rights reserved.", "//"];

/// Base name of the formatter executable.
pub const FORMATTER_NAME: &str = "clang-format";

/// Contents of a `.codestyle.toml` file. Every key is optional.
///
/// ```toml
/// patterns = ["*.m", "*.h"]
/// exclude-dirs = ["Pods", "Carthage"]
/// formatter = "tools/bin/clang-format"
/// comment-marker = "//"
/// header = ["//", "// Copyright (c) 2024 Example Ltd. All rights reserved.", "//"]
/// ```
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
  #[serde(default)]
  pub patterns: Option<Vec<String>>,

  #[serde(default)]
  pub exclude_dirs: Option<Vec<String>>,

  /// Formatter path. Relative paths are resolved against the repository root.
  #[serde(default)]
  pub formatter: Option<PathBuf>,

  #[serde(default)]
  pub comment_marker: Option<String>,

  #[serde(default)]
  pub header: Option<Vec<String>>,
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML.
  #[error("Failed to parse config file '{path}': {source}")]
  ParseError { path: PathBuf, source: toml::de::Error },

  /// A configuration value is invalid.
  #[error("Invalid value for '{field}': {message}")]
  Invalid { field: &'static str, message: String },
}

impl ConfigFile {
  /// Load configuration from a file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseError {
      path: path.to_path_buf(),
      source: e,
    })
  }
}

/// Fully resolved configuration for a run.
///
/// Built once by the driver and passed by reference to the walker and the
/// processor; nothing mutates it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodestyleConfig {
  /// File name globs to process.
  pub patterns: Vec<String>,
  /// Directory names pruned before descent.
  pub exclude_dirs: Vec<String>,
  /// Absolute path of the formatter binary.
  pub formatter: PathBuf,
  /// Prefix identifying a header line.
  pub comment_marker: String,
  /// Canonical header lines.
  pub header: Vec<String>,
}

impl CodestyleConfig {
  /// Creates a configuration with the built-in defaults and the given
  /// formatter binary.
  pub fn with_formatter(formatter: PathBuf) -> Self {
    Self {
      patterns: to_owned_vec(DEFAULT_PATTERNS),
      exclude_dirs: to_owned_vec(DEFAULT_EXCLUDE_DIRS),
      formatter,
      comment_marker: DEFAULT_COMMENT_MARKER.to_string(),
      header: to_owned_vec(DEFAULT_HEADER),
    }
  }

  /// Merges defaults, an optional config file and an optional formatter
  /// override (highest precedence), then validates the result.
  pub fn resolve(file: Option<ConfigFile>, root: &Path, formatter_override: Option<PathBuf>) -> Result<Self> {
    let file = file.unwrap_or_default();

    let formatter = match (formatter_override, file.formatter) {
      (Some(path), _) => absolutize(&path, &std::env::current_dir().context("Failed to get current directory")?),
      (None, Some(path)) => absolutize(&path, root),
      (None, None) => default_formatter_path()?,
    };

    let mut config = Self::with_formatter(formatter);
    if let Some(patterns) = file.patterns {
      config.patterns = patterns;
    }
    if let Some(exclude_dirs) = file.exclude_dirs {
      config.exclude_dirs = exclude_dirs;
    }
    if let Some(marker) = file.comment_marker {
      config.comment_marker = marker;
    }
    if let Some(header) = file.header {
      config.header = header;
    }

    config.validate()?;
    Ok(config)
  }

  /// Checks that:
  /// - at least one pattern is given and every pattern is a valid glob
  /// - exclude entries are bare directory names
  /// - the comment marker is non-empty
  /// - every header line starts with the comment marker
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.patterns.is_empty() {
      return Err(ConfigError::Invalid {
        field: "patterns",
        message: "at least one pattern is required".to_string(),
      });
    }

    for pattern in &self.patterns {
      if let Err(e) = glob::Pattern::new(pattern) {
        return Err(ConfigError::Invalid {
          field: "patterns",
          message: format!("'{pattern}' is not a valid glob: {e}"),
        });
      }
    }

    for dir in &self.exclude_dirs {
      if dir.is_empty() || dir.contains(['/', '\\']) {
        return Err(ConfigError::Invalid {
          field: "exclude-dirs",
          message: format!("'{dir}' must be a bare directory name"),
        });
      }
    }

    if self.comment_marker.is_empty() {
      return Err(ConfigError::Invalid {
        field: "comment-marker",
        message: "comment marker cannot be empty".to_string(),
      });
    }

    if let Some(line) = self.header.iter().find(|line| !line.starts_with(&self.comment_marker)) {
      return Err(ConfigError::Invalid {
        field: "header",
        message: format!("line '{line}' does not start with '{}'", self.comment_marker),
      });
    }

    Ok(())
  }
}

/// Default formatter location: `../bin/clang-format` relative to the
/// directory holding the running executable, with the platform suffix.
pub fn default_formatter_path() -> Result<PathBuf> {
  let exe = std::env::current_exe().context("Failed to locate the running executable")?;
  let exe_dir = exe.parent().unwrap_or_else(|| Path::new("."));
  Ok(formatter_path_beside(exe_dir))
}

/// Formatter location for a tool installed in `tool_dir`.
pub fn formatter_path_beside(tool_dir: &Path) -> PathBuf {
  let binary_name = format!("{FORMATTER_NAME}{}", std::env::consts::EXE_SUFFIX);
  lexical_normalize(&tool_dir.join("..").join("bin").join(binary_name))
}

/// Discover the configuration file path.
///
/// The configuration file is discovered in the following order:
/// 1. Path specified via `--config` flag (passed as `explicit_path`)
/// 2. Path specified via `CODESTYLE_CONFIG` environment variable
/// 3. `.codestyle.toml` in the repository root
///
/// An explicit path is returned even when it does not exist, so loading it
/// fails instead of silently running with the defaults.
pub fn discover_config_path(explicit_path: Option<&Path>, root: &Path) -> Option<PathBuf> {
  if let Some(path) = explicit_path {
    verbose_log!("Using explicit config path: {}", path.display());
    return Some(path.to_path_buf());
  }

  if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
    let path = PathBuf::from(&env_path);
    if path.exists() {
      verbose_log!("Using config from {}: {}", CONFIG_ENV_VAR, path.display());
      return Some(path);
    }
    verbose_log!("{} path does not exist: {}", CONFIG_ENV_VAR, env_path);
  }

  let root_config = root.join(DEFAULT_CONFIG_FILENAME);
  if root_config.exists() {
    verbose_log!("Using repository config: {}", root_config.display());
    return Some(root_config);
  }

  verbose_log!("No config file found");
  None
}

/// Load the discovered config file, if any.
pub fn load_config(explicit_path: Option<&Path>, root: &Path, no_config: bool) -> Result<Option<ConfigFile>> {
  if no_config {
    verbose_log!("Config file discovery disabled (--no-config)");
    return Ok(None);
  }

  match discover_config_path(explicit_path, root) {
    Some(path) => {
      let config = ConfigFile::load(&path).with_context(|| format!("Failed to load config from {}", path.display()))?;
      Ok(Some(config))
    }
    None => Ok(None),
  }
}

fn to_owned_vec(items: &[&str]) -> Vec<String> {
  items.iter().map(|s| (*s).to_string()).collect()
}

fn absolutize(path: &Path, base: &Path) -> PathBuf {
  if path.is_absolute() {
    lexical_normalize(path)
  } else {
    lexical_normalize(&base.join(path))
  }
}

/// Removes `.` segments and folds `..` into the preceding segment without
/// touching the filesystem.
fn lexical_normalize(path: &Path) -> PathBuf {
  let mut normalized = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        let can_pop = matches!(normalized.components().next_back(), Some(Component::Normal(_)));
        if can_pop {
          normalized.pop();
        } else {
          normalized.push(component.as_os_str());
        }
      }
      other => normalized.push(other.as_os_str()),
    }
  }
  normalized
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  fn defaults() -> CodestyleConfig {
    CodestyleConfig::with_formatter(PathBuf::from("/opt/tools/bin/clang-format"))
  }

  #[test]
  fn test_defaults() {
    let config = defaults();
    assert_eq!(config.patterns, vec!["*.m", "*.mm", "*.h"]);
    assert_eq!(config.exclude_dirs, vec!["Pods", "Vendor", "lib"]);
    assert_eq!(config.comment_marker, "//");
    assert_eq!(config.header.len(), 3);
    assert!(config.validate().is_ok());
  }

  #[test]
  fn test_parse_full_config() {
    let config_content = concat!(
      "patterns = [\"*.m\"]\n",
      "exclude-dirs = [\"Carthage\"]\n",
      "formatter = \"tools/clang-format\"\n",
      "comment-marker = \"//\"\n",
      "header = [\"// Copyright (c) 2024 Example\"]\n",
    );

    let file: ConfigFile = toml::from_str(config_content).expect("valid config should parse");

    assert_eq!(file.patterns, Some(vec!["*.m".to_string()]));
    assert_eq!(file.exclude_dirs, Some(vec!["Carthage".to_string()]));
    assert_eq!(file.formatter, Some(PathBuf::from("tools/clang-format")));
    assert_eq!(file.header.as_ref().map(Vec::len), Some(1));
  }

  #[test]
  fn test_parse_empty_config() {
    let file: ConfigFile = toml::from_str("").expect("empty config should parse");
    assert_eq!(file, ConfigFile::default());
  }

  #[test]
  fn test_parse_rejects_unknown_keys() {
    let result: Result<ConfigFile, _> = toml::from_str("exclude = [\"Pods\"]\n");
    assert!(result.is_err());
  }

  #[test]
  fn test_resolve_relative_formatter_against_root() {
    let file = ConfigFile {
      formatter: Some(PathBuf::from("tools/../bin/clang-format")),
      ..ConfigFile::default()
    };

    let config = CodestyleConfig::resolve(Some(file), Path::new("/repo"), None).expect("resolve");
    assert_eq!(config.formatter, PathBuf::from("/repo/bin/clang-format"));
  }

  #[test]
  fn test_resolve_override_wins_over_file() {
    let file = ConfigFile {
      formatter: Some(PathBuf::from("/from/config")),
      patterns: Some(vec!["*.c".to_string()]),
      ..ConfigFile::default()
    };

    let config =
      CodestyleConfig::resolve(Some(file), Path::new("/repo"), Some(PathBuf::from("/from/cli"))).expect("resolve");
    assert_eq!(config.formatter, PathBuf::from("/from/cli"));
    assert_eq!(config.patterns, vec!["*.c"]);
    assert_eq!(config.exclude_dirs, vec!["Pods", "Vendor", "lib"]);
  }

  #[test]
  fn test_validate_empty_patterns() {
    let config = CodestyleConfig {
      patterns: Vec::new(),
      ..defaults()
    };
    assert!(matches!(
      config.validate(),
      Err(ConfigError::Invalid { field: "patterns", .. })
    ));
  }

  #[test]
  fn test_validate_bad_glob() {
    let config = CodestyleConfig {
      patterns: vec!["[*.m".to_string()],
      ..defaults()
    };
    assert!(matches!(
      config.validate(),
      Err(ConfigError::Invalid { field: "patterns", .. })
    ));
  }

  #[test]
  fn test_validate_exclude_with_separator() {
    let config = CodestyleConfig {
      exclude_dirs: vec!["third_party/Pods".to_string()],
      ..defaults()
    };
    assert!(matches!(
      config.validate(),
      Err(ConfigError::Invalid {
        field: "exclude-dirs",
        ..
      })
    ));
  }

  #[test]
  fn test_validate_header_line_without_marker() {
    let config = CodestyleConfig {
      header: vec!["//".to_string(), "/* Copyright */".to_string()],
      ..defaults()
    };
    assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "header", .. })));
  }

  #[test]
  fn test_formatter_path_beside() {
    let path = formatter_path_beside(Path::new("/opt/codestyle/scripts"));
    let expected = format!("/opt/codestyle/bin/clang-format{}", std::env::consts::EXE_SUFFIX);
    assert_eq!(path, PathBuf::from(expected));
  }

  #[test]
  fn test_lexical_normalize_keeps_leading_parent() {
    assert_eq!(lexical_normalize(Path::new("../a/./b/../c")), PathBuf::from("../a/c"));
  }

  #[test]
  fn test_load_config_file_not_found() {
    let result = ConfigFile::load(Path::new("/nonexistent/path/.codestyle.toml"));
    assert!(matches!(result, Err(ConfigError::ReadError { .. })));
  }

  #[test]
  fn test_discover_config_explicit_path() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config_path = temp_dir.path().join("custom.toml");
    std::fs::write(&config_path, "").expect("write config");

    let result = discover_config_path(Some(config_path.as_path()), temp_dir.path());
    assert_eq!(result, Some(config_path));
  }

  #[test]
  fn test_load_config_missing_explicit_path() {
    let temp_dir = TempDir::new().expect("create temp dir");
    std::fs::write(temp_dir.path().join(DEFAULT_CONFIG_FILENAME), "patterns = [\"*.h\"]\n").expect("write config");

    let missing = temp_dir.path().join("typo.toml");

    let err = load_config(Some(missing.as_path()), temp_dir.path(), false)
      .expect_err("missing explicit config should fail");

    assert!(matches!(
      err.downcast_ref::<ConfigError>(),
      Some(ConfigError::ReadError { .. })
    ));
  }

  #[test]
  fn test_discover_config_in_root() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config_path = temp_dir.path().join(DEFAULT_CONFIG_FILENAME);
    std::fs::write(&config_path, "patterns = [\"*.h\"]\n").expect("write config");

    let result = discover_config_path(None, temp_dir.path());
    assert_eq!(result, Some(config_path));
  }

  #[test]
  fn test_load_config_disabled() {
    let temp_dir = TempDir::new().expect("create temp dir");
    std::fs::write(temp_dir.path().join(DEFAULT_CONFIG_FILENAME), "patterns = [\"*.h\"]\n").expect("write config");

    let loaded = load_config(None, temp_dir.path(), true).expect("load");
    assert!(loaded.is_none());
  }
}
