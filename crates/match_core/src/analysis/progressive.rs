//! # Progressive Pass Detection
//!
//! A pass is progressive when it brings the ball at least
//! [`PROGRESSIVE_DISTANCE`] closer to the goal reference point, starts at or
//! beyond [`PROGRESSIVE_MIN_START_X`] and is not a set-piece delivery.
//!
//! Distances are measured on the source coordinates against the fixed goal
//! reference [`GOAL_REFERENCE`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::StyleConfig;
use crate::coordinates::{PitchPoint, PitchTransform};
use crate::models::{EventId, EventType, MatchEvent, Outcome, PlayerId, TeamId, TeamSide};

/// Minimum reduction in distance to goal, roughly 10% of pitch length.
pub const PROGRESSIVE_DISTANCE: f64 = 9.11;

/// Passes starting deeper than this (source scale) are never progressive.
pub const PROGRESSIVE_MIN_START_X: f64 = 35.0;

/// Goal reference point used for progression distance.
pub const GOAL_REFERENCE: PitchPoint = PitchPoint { x: 105.0, y: 34.0 };

/// Reduction in distance to [`GOAL_REFERENCE`] from start to end.
///
/// Events without an end location make no progress.
pub fn progression_distance(event: &MatchEvent) -> f64 {
    let Some((end_x, end_y)) = event.end() else {
        return 0.0;
    };
    let start = PitchPoint::new(event.x, event.y);
    let end = PitchPoint::new(end_x, end_y);
    start.distance_to(&GOAL_REFERENCE) - end.distance_to(&GOAL_REFERENCE)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressivePass {
    pub id: EventId,
    pub minute: u32,
    pub player_id: Option<PlayerId>,
    pub x_sb: f64,
    pub y_sb: f64,
    pub end_x_sb: f64,
    pub end_y_sb: f64,
    pub progression: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressivePasses {
    pub team_id: TeamId,
    pub color: String,
    pub passes: Vec<ProgressivePass>,
    pub count: usize,
}

pub struct ProgressiveActionDetector {
    transform: PitchTransform,
    style: StyleConfig,
}

impl ProgressiveActionDetector {
    pub fn new(style: StyleConfig) -> Self {
        Self {
            transform: PitchTransform::default(),
            style,
        }
    }

    pub fn detect(&self, events: &[MatchEvent], team_id: TeamId, side: TeamSide) -> ProgressivePasses {
        let passes = self.detect_at(events, team_id, PROGRESSIVE_DISTANCE);
        debug!(team_id, count = passes.len(), "progressive passes");
        ProgressivePasses {
            team_id,
            color: self.style.team_color(side).to_string(),
            count: passes.len(),
            passes,
        }
    }

    fn detect_at(&self, events: &[MatchEvent], team_id: TeamId, threshold: f64) -> Vec<ProgressivePass> {
        events
            .iter()
            .filter(|e| e.team_id == team_id)
            .filter(|e| e.is(EventType::Pass, Outcome::Successful))
            .filter(|e| !e.is_set_piece())
            .filter(|e| e.x >= PROGRESSIVE_MIN_START_X)
            .filter_map(|e| {
                let progression = progression_distance(e);
                if progression < threshold {
                    return None;
                }
                let start = self.transform.to_pitch(e.x, e.y);
                let end = self.transform.end_to_pitch(e.end_x, e.end_y)?;
                Some(ProgressivePass {
                    id: e.id,
                    minute: e.minute,
                    player_id: e.player_id,
                    x_sb: start.x,
                    y_sb: start.y,
                    end_x_sb: end.x,
                    end_y_sb: end.y,
                    progression,
                })
            })
            .collect()
    }
}
