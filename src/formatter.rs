//! # Formatter Module
//!
//! Invocation of the external source formatter.
//!
//! The formatter is treated as an opaque filter: source text goes in on
//! stdin, formatted text comes out on stdout. Anything written to stderr, or
//! an unsuccessful exit, means the output cannot be trusted and the original
//! text is kept instead.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, trace};

/// Argument telling clang-format to look for the nearest `.clang-format` file.
pub const STYLE_FILE_ARG: &str = "-style=file";

/// Errors that prevent the formatter from running at all.
#[derive(Debug, thiserror::Error)]
pub enum FormatterError {
  /// The formatter binary does not exist or cannot be inspected.
  #[error("Formatter binary not found at '{path}': {source}")]
  NotFound { path: PathBuf, source: std::io::Error },

  /// The execute permission could not be set.
  #[error("Failed to make formatter '{path}' executable: {source}")]
  Permission { path: PathBuf, source: std::io::Error },

  /// The child process could not be started.
  #[error("Failed to launch formatter '{path}': {source}")]
  Spawn { path: PathBuf, source: std::io::Error },

  /// Piping data to or from the child process failed.
  #[error("Failed to communicate with formatter '{path}': {source}")]
  Io { path: PathBuf, source: std::io::Error },
}

/// Result of a formatter run that got as far as producing output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatOutcome {
  /// The formatter succeeded; holds its stdout verbatim.
  Formatted(Vec<u8>),
  /// The formatter reported a problem; holds the unmodified input.
  Fallback {
    original: Vec<u8>,
    diagnostics: String,
    exit_code: Option<i32>,
  },
}

impl FormatOutcome {
  /// The bytes that should be written back to disk.
  pub fn content(&self) -> &[u8] {
    match self {
      FormatOutcome::Formatted(content) => content,
      FormatOutcome::Fallback { original, .. } => original,
    }
  }

  pub fn into_content(self) -> Vec<u8> {
    match self {
      FormatOutcome::Formatted(content) => content,
      FormatOutcome::Fallback { original, .. } => original,
    }
  }
}

/// Trait for source formatters.
///
/// Lets the processor run against something other than a real binary.
pub trait Formatter: Send + Sync {
  /// Formats `input`. `working_dir` is the directory of the file being
  /// formatted, used for style file discovery.
  fn format(&self, input: &str, working_dir: &Path) -> Result<FormatOutcome, FormatterError>;
}

/// Formatter backed by a `clang-format` executable.
#[derive(Debug, Clone)]
pub struct ClangFormat {
  binary: PathBuf,
}

impl ClangFormat {
  pub const fn new(binary: PathBuf) -> Self {
    Self { binary }
  }

  /// Sets the owner execute bit on the binary if it is missing.
  ///
  /// Running this repeatedly has no further effect.
  pub fn ensure_executable(&self) -> Result<(), FormatterError> {
    let metadata = std::fs::metadata(&self.binary).map_err(|source| FormatterError::NotFound {
      path: self.binary.clone(),
      source,
    })?;

    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;

      let mut permissions = metadata.permissions();
      let mode = permissions.mode();
      if mode & 0o100 == 0 {
        trace!("Adding execute permission to {}", self.binary.display());
        permissions.set_mode(mode | 0o100);
        std::fs::set_permissions(&self.binary, permissions).map_err(|source| FormatterError::Permission {
          path: self.binary.clone(),
          source,
        })?;
      }
    }

    #[cfg(not(unix))]
    let _ = metadata;

    Ok(())
  }

  fn io_error(&self, source: std::io::Error) -> FormatterError {
    FormatterError::Io {
      path: self.binary.clone(),
      source,
    }
  }
}

impl Formatter for ClangFormat {
  fn format(&self, input: &str, working_dir: &Path) -> Result<FormatOutcome, FormatterError> {
    self.ensure_executable()?;

    debug!(
      "Running {} {} in {}",
      self.binary.display(),
      STYLE_FILE_ARG,
      working_dir.display()
    );

    let mut child = Command::new(&self.binary)
      .arg(STYLE_FILE_ARG)
      .current_dir(working_dir)
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .spawn()
      .map_err(|source| FormatterError::Spawn {
        path: self.binary.clone(),
        source,
      })?;

    let mut stdin = child
      .stdin
      .take()
      .ok_or_else(|| self.io_error(std::io::Error::other("stdin was not captured")))?;

    // stdin is fed from a scoped thread so a formatter that writes before it
    // has read everything cannot fill its stdout pipe and stall both sides.
    // Dropping `stdin` at the end of the writer closes the pipe.
    let (output, written) = std::thread::scope(|scope| {
      let writer = scope.spawn(move || stdin.write_all(input.as_bytes()));
      let output = child.wait_with_output();
      let written = writer
        .join()
        .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));
      (output, written)
    });

    let output = output.map_err(|source| self.io_error(source))?;
    match written {
      Ok(()) => {}
      // The formatter exited without reading all of its input; its status and
      // stderr decide the outcome below.
      Err(e) if e.kind() == ErrorKind::BrokenPipe => trace!("Formatter closed stdin early"),
      Err(e) => return Err(self.io_error(e)),
    }

    if output.status.success() && output.stderr.is_empty() {
      return Ok(FormatOutcome::Formatted(output.stdout));
    }

    Ok(FormatOutcome::Fallback {
      original: input.as_bytes().to_vec(),
      diagnostics: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
      exit_code: output.status.code(),
    })
  }
}
