//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "roster",
    version,
    about = "Reconcile roster requests, group players, and assign teams",
    long_about = "Import a roster, review fuzzy teammate-name matches, and move players \
                  between teams.\n\n\
                  Players who request each other are grouped and always move together; \
                  moves that would put a player with someone they asked to avoid are refused."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global: GlobalArgs,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Args, Clone)]
pub struct GlobalArgs {
    /// Roster state file read and written by every command.
    #[arg(long = "state", value_name = "PATH", default_value = "roster.json", global = true)]
    pub state: PathBuf,

    /// League configuration JSON (team size, gender minimums, mixed teams).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// How eagerly free-text names are matched.
    #[arg(long = "matching", value_enum, default_value = "default", global = true)]
    pub matching: MatchingArg,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import players from a roster CSV and match their teammate requests.
    Import(ImportArgs),

    /// List warnings awaiting review, or step through them interactively.
    Review(ReviewArgs),

    /// Accept warnings, optionally correcting the matched name.
    Accept(AcceptArgs),

    /// Reject warnings; the requests they describe are ignored for grouping.
    Reject(WarningArgs),

    /// Reject every pending warning.
    DismissAll,

    /// Show player groups.
    Groups,

    /// Merge two groups that request each other.
    Merge(MergeArgs),

    /// Break up a group; it will not be rebuilt automatically.
    Dissolve(GroupArgs),

    /// Move a player, with its group, to a team.
    Move(MoveArgs),

    /// Show teams with statistics and rule violations.
    Teams,

    /// Replay suggested moves from a JSON file.
    Apply(ApplyArgs),

    /// Add an empty team.
    NewTeam(NewTeamArgs),

    /// Send every player back to the unassigned pool.
    Reset,
}

#[derive(Args)]
pub struct ImportArgs {
    /// Roster CSV with a header row.
    #[arg(value_name = "CSV")]
    pub csv: PathBuf,

    /// Add to the existing state instead of starting over.
    #[arg(long = "append")]
    pub append: bool,
}

#[derive(Args)]
pub struct ReviewArgs {
    /// Include warnings that were already decided.
    #[arg(long = "all")]
    pub all: bool,

    /// Decide warnings one at a time from standard input.
    #[arg(long = "interactive", short = 'i')]
    pub interactive: bool,
}

#[derive(Args)]
pub struct AcceptArgs {
    /// Warning ids (`W3` or `3`).
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,

    /// Canonical name to use instead of the suggestion (single id only).
    #[arg(long = "as", value_name = "NAME")]
    pub correction: Option<String>,
}

#[derive(Args)]
pub struct WarningArgs {
    /// Warning ids (`W3` or `3`).
    #[arg(value_name = "ID", required = true)]
    pub ids: Vec<String>,
}

#[derive(Args)]
pub struct MergeArgs {
    /// Group id or label.
    pub first: String,
    /// Group id or label.
    pub second: String,
}

#[derive(Args)]
pub struct GroupArgs {
    /// Group id or label.
    pub group: String,
}

#[derive(Args)]
pub struct MoveArgs {
    /// Player id or exact name.
    pub player: String,
    /// Team id or name, or `none` for the unassigned pool.
    pub team: String,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// JSON array of `{ "player", "source_team", "target_team" }` objects.
    #[arg(value_name = "PROPOSALS")]
    pub proposals: PathBuf,

    /// Report outcomes without saving.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct NewTeamArgs {
    pub name: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MatchingArg {
    Strict,
    Default,
    Relaxed,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
