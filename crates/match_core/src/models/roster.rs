use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::events::{PlayerId, TeamId};
use crate::error::{AnalyticsError, Result};

/// Position code for a centre-back.
pub const CENTRE_BACK: &str = "DC";

/// Position codes that make up the forward line.
pub const FORWARD_POSITIONS: [&str; 4] = ["FW", "AMC", "AML", "AMR"];

pub fn is_centre_back(position: &str) -> bool {
    position == CENTRE_BACK
}

pub fn is_forward(position: &str) -> bool {
    FORWARD_POSITIONS.contains(&position)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamSide {
    Home,
    Away,
}

/// One roster entry, as delivered by the match-centre feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterPlayer {
    pub player_id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub shirt_no: Option<u32>,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub is_first_eleven: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRoster {
    pub team_id: TeamId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub players: Vec<RosterPlayer>,
}

impl TeamRoster {
    pub fn player(&self, player_id: PlayerId) -> Option<&RosterPlayer> {
        self.players.iter().find(|p| p.player_id == player_id)
    }

    /// Index players by id for repeated lookups.
    pub fn index(&self) -> FxHashMap<PlayerId, &RosterPlayer> {
        self.players.iter().map(|p| (p.player_id, p)).collect()
    }
}

/// Everything the engine knows about the two teams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchContext {
    pub home: TeamRoster,
    pub away: TeamRoster,
    /// Global player id (stringified) -> display name.
    #[serde(default)]
    pub player_names: FxHashMap<String, String>,
}

impl MatchContext {
    pub fn new(home: TeamRoster, away: TeamRoster) -> Self {
        Self {
            home,
            away,
            player_names: FxHashMap::default(),
        }
    }

    pub fn with_player_names(mut self, player_names: FxHashMap<String, String>) -> Self {
        self.player_names = player_names;
        self
    }

    /// Both teams must be distinct; every downstream stage keys on team id.
    pub fn validate(&self) -> Result<()> {
        if self.home.team_id == self.away.team_id {
            return Err(AnalyticsError::DuplicateTeam {
                team_id: self.home.team_id,
            });
        }
        Ok(())
    }

    pub fn team(&self, side: TeamSide) -> &TeamRoster {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    pub fn side_of(&self, team_id: TeamId) -> Option<TeamSide> {
        if team_id == self.home.team_id {
            Some(TeamSide::Home)
        } else if team_id == self.away.team_id {
            Some(TeamSide::Away)
        } else {
            None
        }
    }

    /// Display name from the global dictionary, falling back to the roster name.
    pub fn display_name(&self, player: &RosterPlayer) -> String {
        self.player_names
            .get(&player.player_id.to_string())
            .cloned()
            .unwrap_or_else(|| player.name.clone())
    }
}
