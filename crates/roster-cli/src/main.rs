//! `roster` command-line entry point.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use roster_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    run_accept, run_apply, run_dismiss_all, run_dissolve, run_groups, run_import, run_merge,
    run_move, run_new_team, run_reject, run_reset, run_review, run_teams,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let global = &cli.global;
    let result = match &cli.command {
        Command::Import(args) => run_import(global, args),
        Command::Review(args) => run_review(global, args),
        Command::Accept(args) => run_accept(global, args),
        Command::Reject(args) => run_reject(global, args),
        Command::DismissAll => run_dismiss_all(global),
        Command::Groups => run_groups(global),
        Command::Merge(args) => run_merge(global, args),
        Command::Dissolve(args) => run_dissolve(global, args),
        Command::Move(args) => run_move(global, args),
        Command::Teams => run_teams(global),
        Command::Apply(args) => run_apply(global, args),
        Command::NewTeam(args) => run_new_team(global, args),
        Command::Reset => run_reset(global),
    };
    let exit_code = match result {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig::default().with_level(cli.verbosity.tracing_level_filter());
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config = config.with_format(match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    });
    config = config.with_log_file(cli.log_file.clone());
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
