//! Event table CSV loader.
//!
//! Accepts the flat export written by the acquisition step: pandas-style
//! `True`/`False` booleans, float-formatted ids (`123.0`), empty cells and
//! `nan` for missing values. Extra columns are ignored.

use anyhow::{Context, Result};
use match_core::models::{validate_columns, EventType, MatchEvent, Outcome};
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// CSV parsing statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub total_rows: u32,
    pub parsed: u32,
    pub failed: u32,
}

struct Columns {
    id: usize,
    minute: usize,
    team_id: usize,
    player_id: usize,
    event_type: usize,
    outcome: usize,
    x: usize,
    y: usize,
    end_x: usize,
    end_y: usize,
    qualifiers: usize,
    is_touch: usize,
    is_shot: usize,
    is_goal: usize,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let names: Vec<&str> = headers.iter().collect();
        validate_columns(&names)?;
        let idx = |name: &str| names.iter().position(|h| *h == name).unwrap_or_default();
        Ok(Self {
            id: idx("id"),
            minute: idx("minute"),
            team_id: idx("team_id"),
            player_id: idx("player_id"),
            event_type: idx("type_display_name"),
            outcome: idx("outcome_type_display_name"),
            x: idx("x"),
            y: idx("y"),
            end_x: idx("end_x"),
            end_y: idx("end_y"),
            qualifiers: idx("qualifiers"),
            is_touch: idx("is_touch"),
            is_shot: idx("is_shot"),
            is_goal: idx("is_goal"),
        })
    }
}

/// Parse a float cell; empty and `nan` are missing.
pub fn parse_float(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse an id cell written either as `123` or `123.0`.
pub fn parse_id(cell: &str) -> Option<u64> {
    let cell = cell.trim();
    if let Ok(v) = cell.parse::<u64>() {
        return Some(v);
    }
    parse_float(cell).filter(|v| *v >= 0.0 && v.fract() == 0.0).map(|v| v as u64)
}

pub fn parse_bool(cell: &str) -> bool {
    matches!(cell.trim(), "True" | "true" | "TRUE" | "1" | "1.0")
}

/// Parse events from any CSV source.
///
/// A missing required column fails the whole load. Rows with an unreadable
/// id, team or location are skipped and counted as failed.
pub fn read_events<R: io::Read>(reader: R) -> Result<(Vec<MatchEvent>, ParseStats)> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(reader);
    let headers = reader.headers().context("Failed to read CSV header")?.clone();
    let cols = Columns::from_headers(&headers)?;

    let mut stats = ParseStats::default();
    let mut events = Vec::new();

    for (row, record) in reader.records().enumerate() {
        stats.total_rows += 1;
        let line = row + 2;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                stats.failed += 1;
                warn!("Line {} - unreadable record: {}", line, e);
                continue;
            }
        };
        let cell = |i: usize| record.get(i).unwrap_or("");

        let (Some(id), Some(team_id), Some(x), Some(y)) = (
            parse_id(cell(cols.id)),
            parse_id(cell(cols.team_id)),
            parse_float(cell(cols.x)),
            parse_float(cell(cols.y)),
        ) else {
            stats.failed += 1;
            warn!("Line {} - missing id, team_id or location", line);
            continue;
        };

        let minute = parse_float(cell(cols.minute)).map(|m| m.max(0.0) as u32).unwrap_or(0);
        let mut event = MatchEvent::new(
            id,
            minute,
            team_id,
            parse_id(cell(cols.player_id)),
            EventType::from_display_name(cell(cols.event_type).trim()),
            Outcome::from_display_name(cell(cols.outcome).trim()),
            x,
            y,
        );
        event.end_x = parse_float(cell(cols.end_x));
        event.end_y = parse_float(cell(cols.end_y));
        event.qualifiers = cell(cols.qualifiers).to_string();
        event.is_touch = parse_bool(cell(cols.is_touch));
        event.is_shot = parse_bool(cell(cols.is_shot));
        event.is_goal = parse_bool(cell(cols.is_goal));

        events.push(event);
        stats.parsed += 1;
    }

    debug!(rows = stats.total_rows, parsed = stats.parsed, failed = stats.failed, "event csv parsed");
    Ok((events, stats))
}

pub fn load_events_csv(path: &Path) -> Result<Vec<MatchEvent>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open event table: {}", path.display()))?;
    let (events, stats) =
        read_events(file).with_context(|| format!("Failed to parse event table: {}", path.display()))?;
    if stats.failed > 0 {
        warn!(failed = stats.failed, path = %path.display(), "some event rows were skipped");
    }
    Ok(events)
}
