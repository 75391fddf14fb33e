use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use roster_cli::csv_roster::read_roster_csv;
use roster_cli::workspace::{
    Workspace, find_group, find_player, find_team, load_league_config, parse_warning_id,
    read_proposals,
};
use roster_core::EngineOptions;
use roster_match::{MatchThresholds, ReviewAction, ReviewSession};
use roster_model::LeagueConfig;

use crate::cli::{
    AcceptArgs, ApplyArgs, GlobalArgs, GroupArgs, ImportArgs, MatchingArg, MergeArgs, MoveArgs,
    NewTeamArgs, ReviewArgs, WarningArgs,
};
use crate::summary;

fn engine_options(global: &GlobalArgs) -> EngineOptions {
    let thresholds = match global.matching {
        MatchingArg::Strict => MatchThresholds::strict(),
        MatchingArg::Default => MatchThresholds::default(),
        MatchingArg::Relaxed => MatchThresholds::relaxed(),
    };
    EngineOptions::default().with_thresholds(thresholds)
}

fn league_config(global: &GlobalArgs) -> Result<Option<LeagueConfig>> {
    global
        .config
        .as_deref()
        .map(load_league_config)
        .transpose()
}

fn open(global: &GlobalArgs) -> Result<Workspace> {
    Workspace::open(&global.state, engine_options(global), league_config(global)?)
}

pub fn run_import(global: &GlobalArgs, args: &ImportArgs) -> Result<i32> {
    let span = info_span!("import", csv = %args.csv.display());
    let _guard = span.enter();
    let rows = read_roster_csv(&args.csv)?;
    let mut workspace = if args.append {
        open(global)?
    } else {
        Workspace::fresh(&global.state, engine_options(global), league_config(global)?)
    };
    let outcome = workspace.engine.import(rows);
    workspace.save()?;
    summary::print_import(&outcome, &workspace.engine.warning_counts());
    info!(state = %workspace.path().display(), "state saved");
    Ok(0)
}

pub fn run_review(global: &GlobalArgs, args: &ReviewArgs) -> Result<i32> {
    let mut workspace = open(global)?;
    if args.interactive {
        let stdin = io::stdin();
        review_interactively(&mut workspace, stdin.lock())?;
        workspace.save()?;
        return Ok(0);
    }
    let queue = workspace.engine.review_queue();
    let shown: Vec<_> = if args.all {
        queue
    } else {
        queue.into_iter().filter(|w| w.is_pending()).collect()
    };
    summary::print_review_queue(&shown);
    summary::print_counts(&workspace.engine.warning_counts());
    Ok(0)
}

pub fn run_accept(global: &GlobalArgs, args: &AcceptArgs) -> Result<i32> {
    if args.correction.is_some() && args.ids.len() > 1 {
        bail!("--as takes exactly one warning id");
    }
    let mut workspace = open(global)?;
    for raw in &args.ids {
        let id = parse_warning_id(raw)?;
        let (transition, report) = workspace
            .engine
            .resolve(id, args.correction.as_deref())
            .with_context(|| format!("accept {id}"))?;
        summary::print_transition(&transition, &report);
    }
    workspace.save()?;
    Ok(0)
}

pub fn run_reject(global: &GlobalArgs, args: &WarningArgs) -> Result<i32> {
    let mut workspace = open(global)?;
    for raw in &args.ids {
        let id = parse_warning_id(raw)?;
        let (transition, report) = workspace
            .engine
            .dismiss(id)
            .with_context(|| format!("reject {id}"))?;
        summary::print_transition(&transition, &report);
    }
    workspace.save()?;
    Ok(0)
}

pub fn run_dismiss_all(global: &GlobalArgs) -> Result<i32> {
    let mut workspace = open(global)?;
    let (dismissed, report) = workspace.engine.dismiss_all();
    println!("Rejected {} pending warning(s).", dismissed.len());
    summary::print_grouping(&report);
    workspace.save()?;
    Ok(0)
}

pub fn run_groups(global: &GlobalArgs) -> Result<i32> {
    let workspace = open(global)?;
    summary::print_groups(&workspace.engine);
    Ok(0)
}

pub fn run_merge(global: &GlobalArgs, args: &MergeArgs) -> Result<i32> {
    let mut workspace = open(global)?;
    let first = find_group(&workspace.engine, &args.first)?;
    let second = find_group(&workspace.engine, &args.second)?;
    let kept = workspace.engine.merge_groups(first, second)?;
    println!("Merged into group {kept}.");
    workspace.save()?;
    Ok(0)
}

pub fn run_dissolve(global: &GlobalArgs, args: &GroupArgs) -> Result<i32> {
    let mut workspace = open(global)?;
    let id = find_group(&workspace.engine, &args.group)?;
    let group = workspace.engine.dissolve_group(id)?;
    println!("Dissolved group {} ({} players).", group.label, group.len());
    workspace.save()?;
    Ok(0)
}

pub fn run_move(global: &GlobalArgs, args: &MoveArgs) -> Result<i32> {
    let mut workspace = open(global)?;
    let player = find_player(&workspace.engine, &args.player)?;
    let team = find_team(&workspace.engine, &args.team)?;
    let result = workspace.engine.move_player(player, team)?;
    summary::print_move(&workspace.engine, &result);
    if !result.allowed {
        return Ok(1);
    }
    workspace.save()?;
    Ok(0)
}

pub fn run_teams(global: &GlobalArgs) -> Result<i32> {
    let workspace = open(global)?;
    summary::print_teams(&workspace.engine);
    let hard = workspace
        .engine
        .league_report()
        .iter()
        .any(|violations| violations.has_hard());
    Ok(i32::from(hard))
}

pub fn run_apply(global: &GlobalArgs, args: &ApplyArgs) -> Result<i32> {
    let span = info_span!("apply", proposals = %args.proposals.display());
    let _guard = span.enter();
    let proposals = read_proposals(&args.proposals)?;
    let mut workspace = open(global)?;
    let outcomes = workspace.engine.apply_proposals(&proposals);
    summary::print_proposals(&workspace.engine, &outcomes);
    if args.dry_run {
        println!("Dry run: state not saved.");
    } else {
        workspace.save()?;
    }
    Ok(0)
}

pub fn run_new_team(global: &GlobalArgs, args: &NewTeamArgs) -> Result<i32> {
    if args.name.trim().is_empty() {
        bail!("team name is empty");
    }
    let mut workspace = open(global)?;
    let id = workspace.engine.create_team(&args.name);
    println!("Created team {id} {:?}.", args.name.trim());
    workspace.save()?;
    Ok(0)
}

pub fn run_reset(global: &GlobalArgs) -> Result<i32> {
    let mut workspace = open(global)?;
    let touched = workspace.engine.reset_assignments();
    println!("Cleared {} team(s).", touched.len());
    workspace.save()?;
    Ok(0)
}

#[derive(Debug, PartialEq, Eq)]
enum ReviewInput {
    Action(ReviewAction),
    Quit,
    Unknown,
}

fn parse_review_input(line: &str) -> ReviewInput {
    let line = line.trim();
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    let action = match word.to_ascii_lowercase().as_str() {
        "a" | "accept" | "y" => ReviewAction::Accept,
        "r" | "reject" => ReviewAction::Reject,
        "n" | "next" | "" => ReviewAction::Next,
        "p" | "prev" | "previous" => ReviewAction::Previous,
        "e" | "edit" if !rest.is_empty() => ReviewAction::Edit(rest.to_string()),
        "j" | "jump" => match rest.parse::<usize>() {
            Ok(position) if position > 0 => ReviewAction::Jump(position - 1),
            _ => return ReviewInput::Unknown,
        },
        "q" | "quit" => return ReviewInput::Quit,
        _ => return ReviewInput::Unknown,
    };
    ReviewInput::Action(action)
}

fn review_interactively<R: BufRead>(workspace: &mut Workspace, input: R) -> Result<()> {
    let mut session: ReviewSession = workspace.engine.review_session();
    let mut lines = input.lines();
    while !session.is_finished() {
        let Some(id) = session.current() else {
            break;
        };
        if let Some(warning) = workspace.engine.state().ledger.get(id) {
            println!(
                "[{}/{}] {}",
                session.position() + 1,
                session.len(),
                warning.summary_line()
            );
            println!("    {}", warning.reason);
        }
        if let Some(draft) = session.draft() {
            println!("    correction: {draft}");
        }
        print!("(a)ccept (r)eject (e)dit NAME (n)ext (p)rev (j)ump N (q)uit > ");
        io::stdout().flush().context("flush prompt")?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("read review input")?;
        let action = match parse_review_input(&line) {
            ReviewInput::Action(action) => action,
            ReviewInput::Quit => break,
            ReviewInput::Unknown => {
                println!("Unrecognized input {line:?}.");
                continue;
            }
        };
        let step = session.apply(action);
        if let Some(command) = &step.command {
            let (transition, report) = workspace.engine.apply_review(command)?;
            summary::print_transition(&transition, &report);
        }
        session = step.session;
    }
    println!("{} warning(s) still pending.", session.remaining());
    Ok(())
}
