//! # Logging Module
//!
//! This module provides logging utilities for the codestyle tool, including:
//! - Verbose logging that can be enabled/disabled
//! - Standard info logging with color support
//! - Initialization of the `tracing` subscriber used for diagnostics
//!
//! Verbose logs go to stderr and info logs go to stdout, so progress output
//! can be piped without mixing in diagnostics.
//!
//! ## Example
//!
//! ```rust
//! use codestyle::logging::{ColorMode, set_verbose};
//! use codestyle::{info_log, verbose_log};
//!
//! set_verbose();
//! ColorMode::Never.apply();
//!
//! // Goes to stderr
//! verbose_log!("Resolved formatter: {}", "bin/clang-format");
//!
//! // Goes to stdout
//! info_log!("Processing {}...", "AppDelegate.m");
//! ```

mod modes;

pub use modes::{ColorMode, init_tracing, is_quiet, is_verbose, reset_output_mode, set_quiet, set_verbose};
use owo_colors::{OwoColorize, Stream};

/// Logs a message to stderr if verbose mode is enabled.
///
/// Uses the same format string syntax as [`eprintln!`].
#[macro_export]
macro_rules! verbose_log {
    ($($arg:tt)*) => {
        if $crate::logging::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

/// Logs a message to stdout unless quiet mode is enabled.
///
/// Uses the same format string syntax as [`println!`].
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        if !$crate::logging::is_quiet() {
            $crate::logging::print_info_log(&format!($($arg)*));
        }
    };
}

/// Prints an info message to stdout, dimmed when colors are enabled.
pub fn print_info_log(message: &str) {
  println!("{}", message.if_supports_color(Stream::Stdout, |m| m.dimmed()));
}
