use crate::constants::{CONFIG_PATH_ENV, DEFAULT_CONFIG_FILENAME};
use clap::Parser;
use std::path::PathBuf;

/// Turns an invocation into a listing, a usage block or an execution.
pub mod dispatcher;
/// Rendering of the script listing and per-script usage.
pub mod usage;

/// Builds the dynamic, color-aware full help string at runtime.
fn build_help_string() -> &'static str {
    // A mini-renderer for the semantic help template: `<title>` etc. become ANSI styles.
    let use_colors = colored::control::SHOULD_COLORIZE.should_colorize();

    let template = t!("cli.help.template");

    let title = if use_colors { "\x1b[1;33m" } else { "" }; // Bold Yellow
    let hl = if use_colors { "\x1b[1;36m" } else { "" }; // Bold Cyan
    let cmd = if use_colors { "\x1b[36m" } else { "" }; // Cyan
    let group = if use_colors { "\x1b[1;32m" } else { "" }; // Bold Green
    let dim = if use_colors { "\x1b[2m" } else { "" };
    let reset = if use_colors { "\x1b[0m" } else { "" };

    let formatted_string = template
        .replace("<title>", title)
        .replace("</title>", reset)
        .replace("<hl>", hl)
        .replace("</hl>", reset)
        .replace("<cmd>", cmd)
        .replace("</cmd>", reset)
        .replace("<group>", group)
        .replace("</group>", reset)
        .replace("<dim>", dim)
        .replace("</dim>", reset);

    Box::leak(formatted_string.into_boxed_str())
}

/// dr: a configuration-driven script runner.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    help_template = { build_help_string() },
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Path of the configuration file.
    #[arg(long, short, value_name = "PATH", env = CONFIG_PATH_ENV, default_value = DEFAULT_CONFIG_FILENAME)]
    pub config: PathBuf,

    /// Kill any child process still running after this many seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// The script name followed by its arguments. Runner options are only
    /// recognized before the script name; everything from the script name on
    /// is kept here untouched, including tokens that start with `-`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub invocation: Vec<String>,
}

impl Cli {
    /// Splits the invocation into the script name and the script's own arguments.
    pub fn script_and_args(&self) -> (Option<&str>, &[String]) {
        match self.invocation.split_first() {
            Some((script, args)) => (Some(script.as_str()), args),
            None => (None, &[]),
        }
    }
}
