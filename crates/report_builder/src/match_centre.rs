//! Match-centre JSON (`matchdict.json`): rosters, the player name
//! dictionary and, optionally, the raw event array.

use anyhow::{Context, Result};
use match_core::models::{EventType, MatchContext, MatchEvent, Outcome, TeamRoster};
use match_core::AnalyticsError;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayName {
    pub display_name: String,
}

/// One event as embedded in the match-centre payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMatchCentreEvent {
    /// Globally unique id; large values arrive as floats.
    #[serde(default)]
    pub id: Option<f64>,
    /// Per-match sequence number, used when `id` is absent.
    #[serde(default)]
    pub event_id: Option<u64>,
    #[serde(default)]
    pub minute: u32,
    pub team_id: u64,
    #[serde(default)]
    pub player_id: Option<u64>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub end_x: Option<f64>,
    #[serde(default)]
    pub end_y: Option<f64>,
    #[serde(rename = "type")]
    pub event_type: DisplayName,
    #[serde(default)]
    pub outcome_type: Option<DisplayName>,
    #[serde(default)]
    pub qualifiers: serde_json::Value,
    #[serde(default)]
    pub is_touch: bool,
    #[serde(default)]
    pub is_shot: bool,
    #[serde(default)]
    pub is_goal: bool,
}

impl RawMatchCentreEvent {
    fn canonical_id(&self) -> Option<u64> {
        self.id
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v as u64)
            .or(self.event_id)
    }

    /// Reshape into the canonical event; `None` without an id or location.
    pub fn to_event(&self) -> Option<MatchEvent> {
        let mut event = MatchEvent::new(
            self.canonical_id()?,
            self.minute,
            self.team_id,
            self.player_id,
            EventType::from_display_name(&self.event_type.display_name),
            self.outcome_type
                .as_ref()
                .map(|o| Outcome::from_display_name(&o.display_name))
                .unwrap_or_default(),
            self.x?,
            self.y?,
        );
        event.end_x = self.end_x;
        event.end_y = self.end_y;
        event.qualifiers = match &self.qualifiers {
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        };
        event.is_touch = self.is_touch;
        event.is_shot = self.is_shot;
        event.is_goal = self.is_goal;
        Some(event)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDict {
    pub home: TeamRoster,
    pub away: TeamRoster,
    #[serde(default)]
    pub player_id_name_dictionary: FxHashMap<String, String>,
    #[serde(default)]
    pub events: Vec<RawMatchCentreEvent>,
}

impl MatchDict {
    pub fn context(&self) -> MatchContext {
        MatchContext::new(self.home.clone(), self.away.clone())
            .with_player_names(self.player_id_name_dictionary.clone())
    }

    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }
}

pub fn load_match_dict(path: &Path) -> Result<MatchDict> {
    if !path.exists() {
        return Err(AnalyticsError::MissingConfiguration(format!(
            "match dictionary {}",
            path.display()
        ))
        .into());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read match dictionary: {}", path.display()))?;
    let dict: MatchDict = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse match dictionary: {}", path.display()))?;
    debug!(
        home = %dict.home.name,
        away = %dict.away.name,
        raw_events = dict.events.len(),
        "match dictionary loaded"
    );
    Ok(dict)
}

/// Canonical events from the raw match-centre array, in feed order.
pub fn events_from_match_centre(raw: &[RawMatchCentreEvent]) -> Vec<MatchEvent> {
    let events: Vec<MatchEvent> = raw.iter().filter_map(RawMatchCentreEvent::to_event).collect();
    let dropped = raw.len() - events.len();
    if dropped > 0 {
        warn!(dropped, "match-centre events without id or location were dropped");
    }
    events
}
