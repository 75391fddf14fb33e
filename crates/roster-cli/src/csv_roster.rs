//! Reading roster spreadsheets exported as CSV.
//!
//! Columns are found by header name, so column order and extra columns do
//! not matter. Only a name column is required.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::{ReaderBuilder, StringRecord, Trim};
use roster_core::RawPlayer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Name,
    Gender,
    Skill,
    SkillOverride,
    Teammates,
    Avoids,
    Handler,
}

/// Header spellings accepted for each column, compared after dropping case,
/// spaces and punctuation.
const HEADERS: &[(Column, &[&str])] = &[
    (Column::Name, &["name", "player", "playername", "fullname"]),
    (Column::Gender, &["gender", "sex"]),
    (Column::Skill, &["skill", "rating", "skillrating", "level"]),
    (
        Column::SkillOverride,
        &["skilloverride", "override", "adjustedskill"],
    ),
    (
        Column::Teammates,
        &[
            "teammates",
            "teammaterequest",
            "teammaterequests",
            "playwith",
            "requests",
        ],
    ),
    (
        Column::Avoids,
        &["avoid", "avoids", "avoidrequests", "donotplaywith"],
    ),
    (Column::Handler, &["handler", "ishandler"]),
];

fn header_key(raw: &str) -> String {
    raw.trim_matches('\u{feff}')
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn column_for(header: &str) -> Option<Column> {
    let key = header_key(header);
    HEADERS
        .iter()
        .find(|(_, names)| names.contains(&key.as_str()))
        .map(|(column, _)| *column)
}

/// Read a roster CSV file.
pub fn read_roster_csv(path: &Path) -> Result<Vec<RawPlayer>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("open roster csv: {}", path.display()))?;
    read_roster(file).with_context(|| format!("read roster csv: {}", path.display()))
}

/// Read roster rows from any CSV source with a header line.
pub fn read_roster<R: Read>(source: R) -> Result<Vec<RawPlayer>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(source);

    let headers = reader.headers().context("read headers")?.clone();
    let columns: Vec<Option<Column>> = headers.iter().map(column_for).collect();
    if !columns.contains(&Some(Column::Name)) {
        bail!(
            "no name column found (headers: {})",
            headers.iter().collect::<Vec<_>>().join(", ")
        );
    }
    tracing::debug!(
        recognized = columns.iter().flatten().count(),
        ignored = columns.iter().filter(|c| c.is_none()).count(),
        "roster csv headers"
    );

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("read record {}", index + 1))?;
        rows.push(raw_player(&columns, &record));
    }
    Ok(rows)
}

fn raw_player(columns: &[Option<Column>], record: &StringRecord) -> RawPlayer {
    let mut row = RawPlayer::default();
    for (column, value) in columns.iter().zip(record.iter()) {
        let Some(column) = column else {
            continue;
        };
        let slot = match column {
            Column::Name => &mut row.name,
            Column::Gender => &mut row.gender,
            Column::Skill => &mut row.skill,
            Column::SkillOverride => &mut row.skill_override,
            Column::Teammates => &mut row.teammate_requests,
            Column::Avoids => &mut row.avoid_requests,
            Column::Handler => &mut row.handler,
        };
        // A repeated column appends, so two request columns both count.
        if slot.is_empty() {
            *slot = value.to_string();
        } else if !value.is_empty() {
            slot.push_str(", ");
            slot.push_str(value);
        }
    }
    row
}
