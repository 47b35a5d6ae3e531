//! # codestyle
//!
//! A tool that keeps Objective-C sources in a repository on one copyright
//! header and one formatting style.
//!
//! For every `*.m`, `*.mm` and `*.h` file under a root (skipping `Pods`,
//! `Vendor` and `lib` directories), the leading block of `//` comment lines is
//! replaced with the canonical header, and the result is piped through
//! `clang-format -style=file`. When the formatter reports a problem, the file
//! keeps the rewritten header without formatting and the run reports a
//! fallback.
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use codestyle::config::CodestyleConfig;
//! use codestyle::formatter::ClangFormat;
//! use codestyle::processor::{FileCollector, HeaderRewriter, Processor};
//!
//! fn main() -> anyhow::Result<()> {
//!     let root = Path::new(".");
//!     let config = CodestyleConfig::resolve(None, root, None)?;
//!
//!     let files = FileCollector::from_config(&config)?.collect_files(root)?;
//!     let processor = Processor::new(
//!         HeaderRewriter::from_config(&config),
//!         Box::new(ClangFormat::new(config.formatter.clone())),
//!         false, // Write changes
//!         None,  // No diff output
//!     );
//!
//!     for report in processor.process_all(files) {
//!         println!("{}: {}", report.path.display(), report.action);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`processor`] - File discovery, header rewriting and the per-file pipeline
//! * [`formatter`] - The external formatter seam and its clang-format backend
//! * [`config`] - Defaults and the optional `.codestyle.toml` file
//! * [`hooks`] - Pre-commit hook installation
//!
//! [`processor`]: crate::processor
//! [`formatter`]: crate::formatter
//! [`config`]: crate::config
//! [`hooks`]: crate::hooks

pub mod cli;
pub mod config;
pub mod diff;
pub mod formatter;
pub mod hooks;
pub mod logging;
pub mod output;
pub mod processor;
pub mod report;
pub mod workspace;
