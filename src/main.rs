//! # codestyle
//!
//! Keeps Objective-C sources on the canonical copyright header and the
//! repository's clang-format style.

use anyhow::Result;
use codestyle::cli::Cli;

fn main() -> Result<()> {
  Cli::parse_args().run()
}
