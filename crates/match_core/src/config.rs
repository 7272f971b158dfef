//! Engine configuration.
//!
//! Style colors travel with every team-facing table so the rendering layer
//! never reaches for global constants.

use serde::{Deserialize, Serialize};

use crate::models::TeamSide;

/// Colors handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleConfig {
    pub background_color: String,
    pub line_color: String,
    pub home_color: String,
    pub away_color: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: "#0C0D0E".to_string(),
            line_color: "white".to_string(),
            home_color: "#43A1D5".to_string(),
            away_color: "#FF4C4C".to_string(),
        }
    }
}

impl StyleConfig {
    pub fn team_color(&self, side: TeamSide) -> &str {
        match side {
            TeamSide::Home => &self.home_color,
            TeamSide::Away => &self.away_color,
        }
    }
}

/// Which receiver resolver the normalizer uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiverPolicy {
    /// Next normalized pass row, regardless of team.
    #[default]
    AdjacentRow,
    /// Next normalized pass row only when it is a different player on the same team.
    SameTeamNextPass,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub receiver: ReceiverPolicy,
}
