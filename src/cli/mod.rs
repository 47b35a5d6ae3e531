//! # CLI Module
//!
//! This module contains the command-line interface implementation.
//! It uses clap for argument parsing; `update` is the default command and
//! runs when no subcommand is given.

mod install_hook;
mod update;

use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use clap::{Args, Parser, Subcommand};
pub use install_hook::{InstallHookArgs, run_install_hook};
pub use update::{UpdateArgs, run_update};

use crate::logging::{ColorMode, init_tracing, set_quiet, set_verbose};

const CUSTOM_STYLES: Styles = Styles::styled()
  .header(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .usage(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))).bold())
  .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
  .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold())
  .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
  .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))));

const VERSION: &str = concat!(
  env!("CARGO_PKG_VERSION"),
  " (",
  env!("GIT_HASH"),
  " ",
  env!("GIT_DATE"),
  ")"
);

/// Top-level CLI arguments
#[derive(Parser, Debug)]
#[command(
  name = "codestyle",
  author,
  version = VERSION,
  about = "Rewrites copyright headers and runs clang-format over Objective-C sources",
  styles = CUSTOM_STYLES,
  args_conflicts_with_subcommands = true,
  after_help = "Examples:
  # Rewrite headers and format every source file under the repository
  codestyle --root .

  # Report files that are not formatted, without touching them
  codestyle --root . --check --show-diff

  # Use a specific clang-format binary
  codestyle --root . --formatter /usr/local/bin/clang-format

  # Write a JSON report of the run
  codestyle --root . --report-json codestyle.json

  # Install the pre-commit hook into the current repository
  codestyle install-hook

Arguments for a subcommand go after its name.
",
  help_template = "{before-help}{name} v{version}
{about-section}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Option<Command>,

  #[command(flatten)]
  pub update_args: UpdateArgs,

  #[command(flatten)]
  pub log: LogArgs,
}

/// Output flags shared by every command
#[derive(Args, Debug, Default)]
pub struct LogArgs {
  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose", global = true)]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum,
    global = true
  )]
  pub colors: ColorMode,
}

impl LogArgs {
  /// Sets up tracing, the output mode and color handling.
  pub fn apply(&self) {
    init_tracing(self.quiet, self.verbose);

    if self.verbose > 0 {
      set_verbose();
    } else if self.quiet {
      set_quiet();
    }
    self.colors.apply();
  }
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
  /// Rewrite headers and format source files under a root (default)
  Update(UpdateArgs),

  /// Install the pre-commit hook into the enclosing git repository
  InstallHook(InstallHookArgs),
}

impl Cli {
  /// Parse CLI arguments and return the Cli struct
  pub fn parse_args() -> Self {
    Self::parse()
  }

  /// Applies the output flags and runs the selected command.
  pub fn run(self) -> anyhow::Result<()> {
    self.log.apply();

    match self.command {
      Some(Command::Update(args)) => run_update(args),
      Some(Command::InstallHook(args)) => run_install_hook(&args),
      None => run_update(self.update_args),
    }
  }
}
