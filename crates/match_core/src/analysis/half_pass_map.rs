//! Passes played entirely inside the opponent half.

use serde::{Deserialize, Serialize};

use super::normalizer::NormalizedPass;
use crate::config::StyleConfig;
use crate::coordinates::PITCH_LENGTH;
use crate::models::{EventId, PlayerId, TeamId, TeamSide};

/// Halfway line on the 120x80 pitch.
pub const HALF_LINE_X: f64 = PITCH_LENGTH / 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HalfPass {
    pub id: EventId,
    pub minute: u32,
    pub player_id: Option<PlayerId>,
    pub x: f64,
    pub y: f64,
    pub end_x: f64,
    pub end_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HalfPassMap {
    pub team_id: TeamId,
    pub color: String,
    pub passes: Vec<HalfPass>,
    pub count: usize,
}

/// Passes of `team_id` that start and end at or beyond [`HALF_LINE_X`].
/// Passes without an end location never qualify.
pub fn half_pass_map(passes: &[NormalizedPass], team_id: TeamId, side: TeamSide, style: &StyleConfig) -> HalfPassMap {
    let passes: Vec<HalfPass> = passes
        .iter()
        .filter(|p| p.team_id == team_id && p.x >= HALF_LINE_X)
        .filter_map(|p| {
            let end = p.end()?;
            (end.x >= HALF_LINE_X).then(|| HalfPass {
                id: p.id,
                minute: p.minute,
                player_id: p.player_id,
                x: p.x,
                y: p.y,
                end_x: end.x,
                end_y: end.y,
            })
        })
        .collect();
    HalfPassMap {
        team_id,
        color: style.team_color(side).to_string(),
        count: passes.len(),
        passes,
    }
}
