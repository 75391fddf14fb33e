use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use roster_core::{ImportOutcome, MoveResult, ProposalOutcome, ResolveReport, RosterEngine};
use roster_match::{Transition, WarningCounts};
use roster_model::{
    Confidence, PlayerId, Roster, StructuredWarning, TeamId, WarningCategory, WarningStatus,
};
use roster_validate::{Issue, TeamViolations};

pub fn print_import(outcome: &ImportOutcome, counts: &WarningCounts) {
    let report = &outcome.import;
    println!(
        "Imported {} players ({} rows skipped, {} values defaulted, {} duplicate names).",
        report.players.len(),
        report.skipped_rows,
        report.defaults_applied,
        report.duplicates
    );
    print_counts(counts);
    print_grouping(&outcome.grouping);
}

pub fn print_counts(counts: &WarningCounts) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Category"), header_cell("Warnings")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (category, count) in &counts.by_category {
        table.add_row(vec![category_cell(*category), Cell::new(count)]);
    }
    table.add_row(vec![
        Cell::new("Pending")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        count_cell(counts.pending, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(counts.total).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

pub fn print_review_queue(warnings: &[&StructuredWarning]) {
    if warnings.is_empty() {
        println!("Nothing to review.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Id"),
        header_cell("Category"),
        header_cell("Status"),
        header_cell("Player"),
        header_cell("Requested"),
        header_cell("Match"),
        header_cell("Confidence"),
        header_cell("Reason"),
    ]);
    apply_wide_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for warning in warnings {
        table.add_row(vec![
            Cell::new(warning.id),
            category_cell(warning.category),
            status_cell(warning.status),
            Cell::new(&warning.requester),
            Cell::new(&warning.requested),
            match_cell(warning),
            confidence_cell(warning.confidence),
            Cell::new(&warning.reason),
        ]);
    }
    println!("{table}");
}

pub fn print_transition(transition: &Transition, report: &ResolveReport) {
    if transition.changed {
        println!(
            "{}: {} -> {}",
            transition.id, transition.previous, transition.current
        );
    } else {
        println!("{}: already {}", transition.id, transition.current);
    }
    print_grouping(report);
}

/// One line per group change; silent when nothing changed.
pub fn print_grouping(report: &ResolveReport) {
    for id in &report.created {
        println!("Group {id} formed.");
    }
    for id in &report.updated {
        println!("Group {id} changed membership.");
    }
    for id in &report.removed {
        println!("Group {id} no longer exists.");
    }
    for cluster in &report.oversized {
        let members = cluster
            .members
            .iter()
            .map(PlayerId::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        if cluster.is_refused_merge() {
            eprintln!("Merge refused: {members} would exceed the group size limit.");
        } else {
            eprintln!("Not grouped: {members} request each other but exceed the size limit.");
        }
    }
}

pub fn print_groups(engine: &RosterEngine) {
    let roster = &engine.state().roster;
    let groups: Vec<_> = engine.groups().collect();
    if groups.is_empty() {
        println!("No groups.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Group"),
        header_cell("Label"),
        header_cell("Color"),
        header_cell("Members"),
        header_cell("Team"),
    ]);
    apply_table_style(&mut table);
    for group in groups {
        let members = group
            .members
            .iter()
            .map(|id| player_name(roster, *id))
            .collect::<Vec<_>>()
            .join(", ");
        let team = group
            .members
            .first()
            .and_then(|id| roster.player(*id))
            .and_then(|p| p.team);
        table.add_row(vec![
            Cell::new(group.id),
            Cell::new(&group.label).add_attribute(Attribute::Bold),
            Cell::new(&group.color),
            Cell::new(members),
            team_cell(roster, team),
        ]);
    }
    println!("{table}");
}

pub fn print_teams(engine: &RosterEngine) {
    let roster = &engine.state().roster;
    let report = engine.league_report();
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Team"),
        header_cell("Name"),
        header_cell("Size"),
        header_cell("Skill"),
        header_cell("F"),
        header_cell("M"),
        header_cell("Other"),
        header_cell("Handlers"),
        header_cell("Issues"),
    ]);
    apply_wide_table_style(&mut table);
    for column in 2..8 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    for team in &roster.teams {
        let stats = &team.stats;
        let issues = report.iter().find(|v| v.team == Some(team.id));
        table.add_row(vec![
            Cell::new(team.id),
            Cell::new(&team.name).add_attribute(Attribute::Bold),
            Cell::new(stats.size),
            Cell::new(format!("{:.1}", stats.average_skill)),
            Cell::new(stats.females),
            Cell::new(stats.males),
            Cell::new(stats.others),
            Cell::new(stats.handlers),
            issues_cell(issues),
        ]);
    }
    let unassigned = roster.unassigned();
    table.add_row(vec![
        dim_cell("-"),
        Cell::new("Unassigned").fg(Color::Cyan),
        Cell::new(unassigned.len()),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");
}

pub fn print_move(engine: &RosterEngine, result: &MoveResult) {
    let roster = &engine.state().roster;
    let target = result
        .target
        .and_then(|id| roster.team(id))
        .map_or("the unassigned pool", |team| team.name.as_str());
    if !result.allowed {
        match &result.conflict {
            Some(conflict) => eprintln!("Move refused: {}.", conflict.message()),
            None => eprintln!("Move refused."),
        }
        return;
    }
    if result.moved.is_empty() {
        println!("Already on {target}.");
        return;
    }
    let names = result
        .moved
        .iter()
        .map(|id| player_name(roster, *id))
        .collect::<Vec<_>>()
        .join(", ");
    println!("Moved {names} to {target}.");
    for notice in &result.notices {
        eprintln!("note: {}", notice.message());
    }
}

pub fn print_proposals(engine: &RosterEngine, outcomes: &[ProposalOutcome]) {
    let roster = &engine.state().roster;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Outcome"),
        header_cell("Detail"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (index, outcome) in outcomes.iter().enumerate() {
        let detail = match outcome {
            ProposalOutcome::Applied { result } => format!(
                "moved {} player(s), {} notice(s)",
                result.moved.len(),
                result.notices.len()
            ),
            ProposalOutcome::Blocked { result } => result
                .conflict
                .as_ref()
                .map_or_else(|| "refused".to_string(), |c| c.message()),
            ProposalOutcome::Stale { current } => {
                format!("player is now on {}", team_name(roster, *current))
            }
            ProposalOutcome::AlreadyInPlace => "nothing to do".to_string(),
            ProposalOutcome::Invalid { reason } => reason.clone(),
        };
        table.add_row(vec![
            Cell::new(index + 1),
            outcome_cell(outcome),
            Cell::new(detail),
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_wide_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn player_name(roster: &Roster, id: PlayerId) -> String {
    roster
        .player(id)
        .map_or_else(|| id.to_string(), |p| p.name.clone())
}

fn team_name(roster: &Roster, team: Option<TeamId>) -> String {
    match team {
        Some(id) => roster
            .team(id)
            .map_or_else(|| id.to_string(), |t| t.name.clone()),
        None => "the unassigned pool".to_string(),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn category_cell(category: WarningCategory) -> Cell {
    let color = match category {
        WarningCategory::Info => Color::DarkGrey,
        WarningCategory::MatchExact => Color::Green,
        WarningCategory::MatchReview => Color::Yellow,
        WarningCategory::NotFound => Color::Red,
    };
    Cell::new(category).fg(color)
}

fn status_cell(status: WarningStatus) -> Cell {
    match status {
        WarningStatus::Pending => Cell::new(status)
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold),
        WarningStatus::Accepted => Cell::new(status).fg(Color::Green),
        WarningStatus::Rejected => Cell::new(status).fg(Color::DarkGrey),
    }
}

fn confidence_cell(confidence: Confidence) -> Cell {
    match confidence {
        Confidence::Exact | Confidence::High => Cell::new(confidence).fg(Color::Green),
        Confidence::Medium => Cell::new(confidence).fg(Color::Yellow),
        Confidence::Low => Cell::new(confidence).fg(Color::Red),
        Confidence::None => dim_cell(confidence),
    }
}

fn match_cell(warning: &StructuredWarning) -> Cell {
    match (&warning.resolution, warning.matched.as_deref()) {
        (Some(corrected), _) => Cell::new(format!("{corrected} (corrected)"))
            .add_attribute(Attribute::Bold),
        (None, Some(name)) => Cell::new(name),
        (None, None) => dim_cell("-"),
    }
}

fn team_cell(roster: &Roster, team: Option<TeamId>) -> Cell {
    match team {
        Some(_) => Cell::new(team_name(roster, team)),
        None => dim_cell("unassigned"),
    }
}

fn issues_cell(violations: Option<&TeamViolations>) -> Cell {
    let Some(violations) = violations.filter(|v| !v.is_clean()) else {
        return dim_cell("-");
    };
    let text = violations
        .issues()
        .map(Issue::message)
        .collect::<Vec<_>>()
        .join("; ");
    if violations.has_hard() {
        Cell::new(text).fg(Color::Red).add_attribute(Attribute::Bold)
    } else {
        Cell::new(text).fg(Color::Yellow)
    }
}

fn outcome_cell(outcome: &ProposalOutcome) -> Cell {
    let color = match outcome {
        ProposalOutcome::Applied { .. } => Color::Green,
        ProposalOutcome::Blocked { .. } | ProposalOutcome::Invalid { .. } => Color::Red,
        ProposalOutcome::Stale { .. } | ProposalOutcome::AlreadyInPlace => Color::DarkGrey,
    };
    Cell::new(outcome.label()).fg(color)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
