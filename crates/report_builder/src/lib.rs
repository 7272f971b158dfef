//! Report Builder Library
//!
//! Flat inputs (event CSV or match-centre JSON, rosters, xT grid CSV,
//! settings JSON) → `MatchAnalyzer` → JSON report + metadata.

pub mod events_csv;
pub mod grid;
pub mod match_centre;
pub mod settings;

use anyhow::{Context, Result};
use match_core::{AnalyticsError, MatchAnalyzer, MatchEvent, MatchReport};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub use events_csv::{load_events_csv, read_events, ParseStats};
pub use grid::{generate_dummy_grid, load_xt_grid, write_xt_grid};
pub use match_centre::{events_from_match_centre, load_match_dict, MatchDict, RawMatchCentreEvent};
pub use settings::ReportSettings;

/// Where the events of a report came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    EventCsv,
    MatchCentre,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Report schema version
    pub schema_version: String,
    /// SHA256 of the event input (hex)
    pub checksum: String,
    /// Creation time (RFC3339)
    pub created_at: String,
    pub event_source: EventSource,
    pub event_count: usize,
    pub skipped_events: usize,
    pub home_team: String,
    pub away_team: String,
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Events for a match: the CSV table when present, else the raw array
/// embedded in the match dictionary.
///
/// Returns the events, their source and the checksum of the input.
pub fn load_events(data_dir: &Path, dict: &MatchDict) -> Result<(Vec<MatchEvent>, EventSource, String)> {
    let csv_path = data_dir.join(settings::EVENTS_FILE);
    if csv_path.exists() {
        let bytes = fs::read(&csv_path)
            .with_context(|| format!("Failed to read event table: {}", csv_path.display()))?;
        let (events, _) = read_events(bytes.as_slice())
            .with_context(|| format!("Failed to parse event table: {}", csv_path.display()))?;
        return Ok((events, EventSource::EventCsv, sha256_hex(&bytes)));
    }

    if dict.has_events() {
        let raw = serde_json::to_vec(&dict.events).context("Failed to serialize match-centre events")?;
        let events = events_from_match_centre(&dict.events);
        return Ok((events, EventSource::MatchCentre, sha256_hex(&raw)));
    }

    Err(AnalyticsError::MissingConfiguration(format!(
        "no events: {} is missing and the match dictionary has no events",
        csv_path.display()
    ))
    .into())
}

/// Run the full pipeline for the match described by `settings`.
///
/// # Arguments
///
/// * `settings` - Parsed settings file; `DATA_DIR` holds `matchdict.json`,
///   `xT_grid.csv` and optionally `df_events.csv`
///
/// # Returns
///
/// The report and its metadata
pub fn build_report(settings: &ReportSettings) -> Result<(MatchReport, ReportMetadata)> {
    let data_dir = &settings.match_settings.data_dir;

    let dict = load_match_dict(&settings.data_path(settings::MATCH_DICT_FILE))?;
    let (events, event_source, checksum) = load_events(data_dir, &dict)?;
    let grid = load_xt_grid(&settings.data_path(settings::XT_GRID_FILE))?;

    let mut context = dict.context();
    if !settings.team_colors.home_name.is_empty() {
        context.home.name = settings.team_colors.home_name.clone();
    }
    if !settings.team_colors.away_name.is_empty() {
        context.away.name = settings.team_colors.away_name.clone();
    }

    let analyzer = MatchAnalyzer::new(settings.analytics_config(), grid);
    let report = analyzer
        .analyze(&events, &context)
        .context("Match analysis failed")?;

    let metadata = ReportMetadata {
        schema_version: report.schema_version.clone(),
        checksum,
        created_at: chrono::Utc::now().to_rfc3339(),
        event_source,
        event_count: events.len(),
        skipped_events: report.skipped_events,
        home_team: context.home.name.clone(),
        away_team: context.away.name.clone(),
    };

    info!(
        home = %metadata.home_team,
        away = %metadata.away_team,
        events = metadata.event_count,
        "report built"
    );
    Ok((report, metadata))
}

/// Metadata file that accompanies a report: `<stem>.metadata.json`.
pub fn metadata_path(report_path: &Path) -> PathBuf {
    let stem = report_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "match_report".to_string());
    report_path.with_file_name(format!("{}.metadata.json", stem))
}

/// Write the report and its metadata side by side.
///
/// Returns the metadata path.
pub fn write_report(report_path: &Path, report: &MatchReport, metadata: &ReportMetadata) -> Result<PathBuf> {
    if let Some(parent) = report_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    let report_json = report.to_json().context("Failed to serialize report")?;
    fs::write(report_path, report_json)
        .with_context(|| format!("Failed to write report: {}", report_path.display()))?;

    let meta_path = metadata_path(report_path);
    let metadata_json = serde_json::to_string_pretty(metadata)?;
    fs::write(&meta_path, metadata_json)
        .with_context(|| format!("Failed to write metadata: {}", meta_path.display()))?;

    Ok(meta_path)
}

/// Event counts per type name, sorted by name.
pub fn event_type_counts(events: &[MatchEvent]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for event in events {
        *counts.entry(event.event_type.to_string()).or_insert(0) += 1;
    }
    counts
}
