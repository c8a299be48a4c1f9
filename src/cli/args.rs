use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "eyes-break")]
#[command(about = "A work/break reminder that keeps your eyes rested")]
#[command(long_about = "eyes-break - rest your eyes on a schedule

Alternates work and break intervals. When a break starts you get a sound,
a desktop notification, and the window comes back to the front; when work
resumes it gets out of the way again.

QUICK START:
  eyes-break                          Open the terminal interface
  eyes-break run --headless           Start cycling without a terminal UI
  eyes-break config set work-time 00:25:00
  eyes-break config show -o json

KEYS (terminal interface):
  space/enter  start or stop      s  settings     esc  close settings
  h            hide               v  show         q    quit

LOGGING:
  EYES_BREAK_LOG=debug eyes-break run --headless

For more information on a specific command, run:
  eyes-break <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output (default),
    /// or 'json' for machine-readable output suitable for scripting.
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    pub output: OutputFormat,

    /// Log at debug level unless EYES_BREAK_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the terminal interface (default)
    Tui,

    /// Run the work/break cycle
    ///
    /// Without --headless this is the same as 'tui'. With --headless a work
    /// session starts immediately and every state change is printed until
    /// Ctrl-C.
    ///
    /// # Examples
    ///
    ///   eyes-break run --headless
    ///   eyes-break run --headless -o json | jq .state
    Run(RunArgs),

    /// Show or change settings
    ///
    /// Settings live in ~/.eyes-break/settings.json (or $EYES_BREAK_HOME).
    ///
    /// # Examples
    ///
    ///   eyes-break config show
    ///   eyes-break config set break-time 0:0:30
    ///   eyes-break config set language es
    ///   eyes-break config reset
    Config(ConfigArgs),

    /// Generate shell completions
    ///
    /// Example: eyes-break completions zsh > ~/.zsh/completions/_eyes-break
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
pub struct RunArgs {
    /// Run without a terminal interface, logging to stderr
    #[arg(long)]
    pub headless: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the current settings
    Show,

    /// Change one setting
    ///
    /// Keys: workTime, breakTime, language, messageAnimationDelay,
    /// notificationsEnabled, soundEnabled (kebab-case works too).
    /// Times accept partial input: "0:5" becomes "00:05:00".
    Set {
        /// Setting name
        key: String,
        /// New value
        value: String,
    },

    /// Restore the default settings
    Reset,

    /// Print the settings file location
    Path,
}
