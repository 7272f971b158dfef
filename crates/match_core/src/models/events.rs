use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AnalyticsError, Result};

pub type EventId = u64;
pub type TeamId = u64;
pub type PlayerId = u64;

/// Columns every event table must carry.
pub const REQUIRED_COLUMNS: [&str; 14] = [
    "id",
    "minute",
    "team_id",
    "player_id",
    "type_display_name",
    "outcome_type_display_name",
    "x",
    "y",
    "end_x",
    "end_y",
    "qualifiers",
    "is_touch",
    "is_shot",
    "is_goal",
];

/// Check a header row against [`REQUIRED_COLUMNS`].
///
/// Extra columns are allowed; the first absent column is reported.
pub fn validate_columns<S: AsRef<str>>(headers: &[S]) -> Result<()> {
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h.as_ref() == column) {
            return Err(AnalyticsError::MissingColumn {
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

/// A single on-pitch action, in source scale (0-100 on both axes).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchEvent {
    pub id: EventId,
    pub minute: u32,
    pub team_id: TeamId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<PlayerId>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub outcome: Outcome,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_y: Option<f64>,
    /// Raw qualifier tags as delivered by the feed.
    #[serde(default)]
    pub qualifiers: String,
    #[serde(default)]
    pub is_touch: bool,
    #[serde(default)]
    pub is_shot: bool,
    #[serde(default)]
    pub is_goal: bool,
}

impl MatchEvent {
    /// Minimal constructor; flags default to false and qualifiers to empty.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: EventId,
        minute: u32,
        team_id: TeamId,
        player_id: Option<PlayerId>,
        event_type: EventType,
        outcome: Outcome,
        x: f64,
        y: f64,
    ) -> Self {
        Self {
            id,
            minute,
            team_id,
            player_id,
            event_type,
            outcome,
            x,
            y,
            end_x: None,
            end_y: None,
            qualifiers: String::new(),
            is_touch: false,
            is_shot: false,
            is_goal: false,
        }
    }

    pub fn with_end(mut self, end_x: f64, end_y: f64) -> Self {
        self.end_x = Some(end_x);
        self.end_y = Some(end_y);
        self
    }

    pub fn with_qualifiers(mut self, qualifiers: impl Into<String>) -> Self {
        self.qualifiers = qualifiers.into();
        self
    }

    pub fn touch(mut self) -> Self {
        self.is_touch = true;
        self
    }

    /// End coordinates, when both are present.
    pub fn end(&self) -> Option<(f64, f64)> {
        Some((self.end_x?, self.end_y?))
    }

    pub fn is(&self, event_type: EventType, outcome: Outcome) -> bool {
        self.event_type == event_type && self.outcome == outcome
    }

    pub fn is_successful(&self) -> bool {
        self.outcome == Outcome::Successful
    }

    /// Whether the qualifier set marks this as a set-piece delivery.
    pub fn is_set_piece(&self) -> bool {
        SetPieceTag::ALL
            .iter()
            .any(|tag| self.qualifiers.contains(tag.marker()))
    }

    /// Reject coordinates that cannot be placed on the pitch.
    pub fn validate(&self) -> Result<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(AnalyticsError::InvalidEvent {
                id: self.id,
                reason: format!("non-finite origin ({}, {})", self.x, self.y),
            });
        }
        if let Some((ex, ey)) = self.end() {
            if !ex.is_finite() || !ey.is_finite() {
                return Err(AnalyticsError::InvalidEvent {
                    id: self.id,
                    reason: format!("non-finite end ({}, {})", ex, ey),
                });
            }
        }
        Ok(())
    }
}

// ============================================================================
// Event vocabulary
// ============================================================================

/// Action kinds, matched against feed display names exactly (case-sensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EventType {
    Pass,
    Carry,
    Tackle,
    Interception,
    BallRecovery,
    BlockedPass,
    Challenge,
    Clearance,
    Foul,
    Aerial,
    Dribble,
    TakeOn,
    Dispossessed,
    BallTouch,
    SavedShot,
    MissedShots,
    ShotOnPost,
    Goal,
    Save,
    KeeperPickup,
    Claim,
    Punch,
    CornerAwarded,
    Card,
    OffsidePass,
    OffsideProvoked,
    OffsideGiven,
    Start,
    End,
    FormationSet,
    FormationChange,
    SubstitutionOn,
    SubstitutionOff,
    /// Any display name outside the vocabulary. No component selects it.
    Other,
}

impl EventType {
    pub const KNOWN: [EventType; 33] = [
        EventType::Pass,
        EventType::Carry,
        EventType::Tackle,
        EventType::Interception,
        EventType::BallRecovery,
        EventType::BlockedPass,
        EventType::Challenge,
        EventType::Clearance,
        EventType::Foul,
        EventType::Aerial,
        EventType::Dribble,
        EventType::TakeOn,
        EventType::Dispossessed,
        EventType::BallTouch,
        EventType::SavedShot,
        EventType::MissedShots,
        EventType::ShotOnPost,
        EventType::Goal,
        EventType::Save,
        EventType::KeeperPickup,
        EventType::Claim,
        EventType::Punch,
        EventType::CornerAwarded,
        EventType::Card,
        EventType::OffsidePass,
        EventType::OffsideProvoked,
        EventType::OffsideGiven,
        EventType::Start,
        EventType::End,
        EventType::FormationSet,
        EventType::FormationChange,
        EventType::SubstitutionOn,
        EventType::SubstitutionOff,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Pass => "Pass",
            EventType::Carry => "Carry",
            EventType::Tackle => "Tackle",
            EventType::Interception => "Interception",
            EventType::BallRecovery => "BallRecovery",
            EventType::BlockedPass => "BlockedPass",
            EventType::Challenge => "Challenge",
            EventType::Clearance => "Clearance",
            EventType::Foul => "Foul",
            EventType::Aerial => "Aerial",
            EventType::Dribble => "Dribble",
            EventType::TakeOn => "TakeOn",
            EventType::Dispossessed => "Dispossessed",
            EventType::BallTouch => "BallTouch",
            EventType::SavedShot => "SavedShot",
            EventType::MissedShots => "MissedShots",
            EventType::ShotOnPost => "ShotOnPost",
            EventType::Goal => "Goal",
            EventType::Save => "Save",
            EventType::KeeperPickup => "KeeperPickup",
            EventType::Claim => "Claim",
            EventType::Punch => "Punch",
            EventType::CornerAwarded => "CornerAwarded",
            EventType::Card => "Card",
            EventType::OffsidePass => "OffsidePass",
            EventType::OffsideProvoked => "OffsideProvoked",
            EventType::OffsideGiven => "OffsideGiven",
            EventType::Start => "Start",
            EventType::End => "End",
            EventType::FormationSet => "FormationSet",
            EventType::FormationChange => "FormationChange",
            EventType::SubstitutionOn => "SubstitutionOn",
            EventType::SubstitutionOff => "SubstitutionOff",
            EventType::Other => "Other",
        }
    }

    /// Exact-name lookup; unknown names become [`EventType::Other`].
    pub fn from_display_name(name: &str) -> Self {
        Self::KNOWN
            .iter()
            .copied()
            .find(|t| t.as_str() == name)
            .unwrap_or(EventType::Other)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_display_name(s))
    }
}

impl TryFrom<String> for EventType {
    type Error = std::convert::Infallible;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Ok(Self::from_display_name(&value))
    }
}

impl From<EventType> for String {
    fn from(value: EventType) -> Self {
        value.as_str().to_string()
    }
}

/// Outcome of an action. Empty or unknown feed values are `Unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Outcome {
    Successful,
    Unsuccessful,
    #[default]
    Unset,
}

impl Outcome {
    pub fn from_display_name(name: &str) -> Self {
        match name {
            "Successful" => Outcome::Successful,
            "Unsuccessful" => Outcome::Unsuccessful,
            _ => Outcome::Unset,
        }
    }
}

// ============================================================================
// Closed sets used by the components
// ============================================================================

/// Event types that count as a defensive action for shape analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefensiveAction {
    Tackle,
    Interception,
    BallRecovery,
    BlockedPass,
    Challenge,
    Clearance,
    Foul,
    Aerial,
}

impl DefensiveAction {
    pub const ALL: [DefensiveAction; 8] = [
        DefensiveAction::Tackle,
        DefensiveAction::Interception,
        DefensiveAction::BallRecovery,
        DefensiveAction::BlockedPass,
        DefensiveAction::Challenge,
        DefensiveAction::Clearance,
        DefensiveAction::Foul,
        DefensiveAction::Aerial,
    ];

    pub fn event_type(self) -> EventType {
        match self {
            DefensiveAction::Tackle => EventType::Tackle,
            DefensiveAction::Interception => EventType::Interception,
            DefensiveAction::BallRecovery => EventType::BallRecovery,
            DefensiveAction::BlockedPass => EventType::BlockedPass,
            DefensiveAction::Challenge => EventType::Challenge,
            DefensiveAction::Clearance => EventType::Clearance,
            DefensiveAction::Foul => EventType::Foul,
            DefensiveAction::Aerial => EventType::Aerial,
        }
    }

    pub fn from_event_type(event_type: EventType) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.event_type() == event_type)
    }
}

/// Actions that count against the opponent's build-up in PPDA.
pub const PRESSING_ACTIONS: [EventType; 4] = [
    EventType::Interception,
    EventType::Tackle,
    EventType::Foul,
    EventType::Challenge,
];

/// Qualifier markers that identify set-piece deliveries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SetPieceTag {
    CornerTaken,
    Freekick,
}

impl SetPieceTag {
    pub const ALL: [SetPieceTag; 2] = [SetPieceTag::CornerTaken, SetPieceTag::Freekick];

    pub fn marker(self) -> &'static str {
        match self {
            SetPieceTag::CornerTaken => "CornerTaken",
            SetPieceTag::Freekick => "Freekick",
        }
    }
}
