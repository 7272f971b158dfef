//! Ball recoveries and possession losses for one team.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::StyleConfig;
use crate::coordinates::PitchTransform;
use crate::models::{EventId, EventType, MatchEvent, Outcome, PlayerId, TeamId, TeamSide};

pub const RECOVERY_TYPES: [EventType; 3] = [EventType::BallRecovery, EventType::Interception, EventType::Tackle];

/// Failed attempts at these lose the ball. Fouls always count.
pub const TURNOVER_TYPES: [EventType; 3] = [EventType::Pass, EventType::Dribble, EventType::Challenge];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Recovery,
    Turnover,
}

impl ActionType {
    pub fn classify(event: &MatchEvent) -> Option<Self> {
        if RECOVERY_TYPES.contains(&event.event_type) && event.outcome == Outcome::Successful {
            Some(ActionType::Recovery)
        } else if event.event_type == EventType::Foul
            || (TURNOVER_TYPES.contains(&event.event_type) && event.outcome == Outcome::Unsuccessful)
        {
            Some(ActionType::Turnover)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PossessionAction {
    pub id: EventId,
    pub minute: u32,
    pub player_id: Option<PlayerId>,
    pub event_type: EventType,
    pub action_type: ActionType,
    pub x_sb: f64,
    pub y_sb: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryTurnovers {
    pub team_id: TeamId,
    pub color: String,
    /// Recoveries first, then turnovers, each in event order.
    pub actions: Vec<PossessionAction>,
    pub recoveries: usize,
    pub turnovers: usize,
}

pub struct RecoveryTurnoverClassifier {
    transform: PitchTransform,
    style: StyleConfig,
}

impl RecoveryTurnoverClassifier {
    pub fn new(style: StyleConfig) -> Self {
        Self {
            transform: PitchTransform::default(),
            style,
        }
    }

    pub fn classify(&self, events: &[MatchEvent], team_id: TeamId, side: TeamSide) -> RecoveryTurnovers {
        let (mut recoveries, mut turnovers) = (Vec::new(), Vec::new());
        for event in events.iter().filter(|e| e.team_id == team_id) {
            let Some(action_type) = ActionType::classify(event) else {
                continue;
            };
            let point = self.transform.to_pitch(event.x, event.y);
            let action = PossessionAction {
                id: event.id,
                minute: event.minute,
                player_id: event.player_id,
                event_type: event.event_type,
                action_type,
                x_sb: point.x,
                y_sb: point.y,
            };
            match action_type {
                ActionType::Recovery => recoveries.push(action),
                ActionType::Turnover => turnovers.push(action),
            }
        }

        let (n_rec, n_turn) = (recoveries.len(), turnovers.len());
        debug!(team_id, recoveries = n_rec, turnovers = n_turn, "possession changes");
        recoveries.extend(turnovers);
        RecoveryTurnovers {
            team_id,
            color: self.style.team_color(side).to_string(),
            actions: recoveries,
            recoveries: n_rec,
            turnovers: n_turn,
        }
    }
}
