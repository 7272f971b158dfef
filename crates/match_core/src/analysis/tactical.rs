//! # Tactical Metrics
//!
//! Team-level scalars derived from normalized passes and a position set:
//! verticality, defense line, forward line and team median x.
//!
//! The starters variant finds its lines by position code; the all-players
//! variant uses the raw minimum and maximum of the x positions. The two are
//! intentionally not unified.

use serde::{Deserialize, Serialize};

use super::normalizer::NormalizedPass;
use super::pass_network::{PlayerPositions, PositionSet};
use super::stats::{max, mean, median, min, round2};
use crate::models::{is_centre_back, is_forward, TeamId};

/// Largest absolute pass angle counted for verticality, in degrees.
pub const VERTICALITY_MAX_ANGLE: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TeamMetrics {
    /// 0-100, higher = passes point more directly forward.
    pub verticality: f64,
    pub defense_line: f64,
    pub forward_line: f64,
    pub team_median: f64,
}

/// Verticality for one team's passes. 0 when no pass qualifies.
///
/// Passes without an end location have no angle and are ignored.
pub fn verticality(passes: &[NormalizedPass], team_id: TeamId) -> f64 {
    let angles: Vec<f64> = passes
        .iter()
        .filter(|p| p.team_id == team_id)
        .filter_map(|p| p.pass_angle_abs)
        .filter(|a| (0.0..=VERTICALITY_MAX_ANGLE).contains(a))
        .collect();
    if angles.is_empty() {
        return 0.0;
    }
    round2((1.0 - median(&angles) / VERTICALITY_MAX_ANGLE) * 100.0)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TacticalMetricsCalculator;

impl TacticalMetricsCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Metrics for a position set, dispatching on the set's policy.
    ///
    /// An empty position set yields zero lines and median.
    pub fn calculate(&self, passes: &[NormalizedPass], positions: &PlayerPositions) -> TeamMetrics {
        let verticality = verticality(passes, positions.team_id);
        let xs = positions.x_values();
        let team_median = median(&xs);

        let (defense_line, forward_line) = match positions.set {
            PositionSet::Starters => {
                let centre_backs: Vec<f64> = positions
                    .players
                    .iter()
                    .filter(|p| is_centre_back(&p.position))
                    .map(|p| p.x_avg)
                    .collect();
                let attackers: Vec<f64> = positions
                    .players
                    .iter()
                    .filter(|p| is_forward(&p.position))
                    .map(|p| p.x_avg)
                    .collect();

                let defense = if centre_backs.is_empty() {
                    min(&xs)
                } else {
                    median(&centre_backs)
                };
                let forward = if attackers.is_empty() {
                    max(&xs)
                } else {
                    mean(&attackers)
                };
                (defense, forward)
            }
            PositionSet::AllPlayers => (min(&xs), max(&xs)),
        };

        TeamMetrics {
            verticality,
            defense_line,
            forward_line,
            team_median,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::pass_network::PlayerPosition;

    fn np(team_id: TeamId, angle: f64) -> NormalizedPass {
        NormalizedPass {
            id: 0,
            minute: 0,
            team_id,
            player_id: Some(1),
            x: 0.0,
            y: 0.0,
            end_x: Some(0.0),
            end_y: Some(0.0),
            pass_angle: Some(angle),
            pass_angle_abs: Some(angle.abs()),
            pass_length: Some(0.0),
            receiver: None,
        }
    }

    fn pos(id: u64, position: &str, x: f64) -> PlayerPosition {
        PlayerPosition {
            player_id: id,
            x_avg: x,
            y_avg: 40.0,
            count: 1,
            name: String::new(),
            shirt_no: None,
            position: position.to_string(),
            is_first_eleven: true,
        }
    }

    fn positions(set: PositionSet, players: Vec<PlayerPosition>) -> PlayerPositions {
        PlayerPositions {
            team_id: 1,
            set,
            players,
            unresolved_players: vec![],
        }
    }

    #[test]
    fn test_verticality_excludes_backward_passes() {
        let passes = vec![np(1, 0.0), np(1, -30.0), np(1, 60.0), np(1, 170.0), np(2, 0.0)];
        // angles kept: 0, 30, 60 -> median 30
        assert_eq!(verticality(&passes, 1), round2((1.0 - 30.0 / 90.0) * 100.0));
        assert_eq!(verticality(&passes, 1), 66.67);
    }

    #[test]
    fn test_verticality_ignores_passes_without_end() {
        let mut endless = np(1, 0.0);
        endless.pass_angle = None;
        endless.pass_angle_abs = None;
        // only the 60 degree pass has an angle
        assert_eq!(verticality(&[endless, np(1, 60.0)], 1), 33.33);
    }

    #[test]
    fn test_verticality_without_passes_is_zero() {
        assert_eq!(verticality(&[], 1), 0.0);
        assert_eq!(verticality(&[np(1, 135.0)], 1), 0.0);
    }

    #[test]
    fn test_starters_lines_use_position_codes() {
        let set = positions(
            PositionSet::Starters,
            vec![
                pos(1, "DC", 30.0),
                pos(2, "DC", 34.0),
                pos(3, "DMC", 50.0),
                pos(4, "FW", 80.0),
                pos(5, "AML", 70.0),
                pos(6, "GK", 8.0),
            ],
        );
        let m = TacticalMetricsCalculator::new().calculate(&[], &set);
        assert_eq!(m.defense_line, 32.0);
        assert_eq!(m.forward_line, 75.0);
        assert_eq!(m.team_median, 42.0);
    }

    #[test]
    fn test_starters_fallback_to_extremes() {
        let set = positions(
            PositionSet::Starters,
            vec![pos(1, "DR", 30.0), pos(2, "MC", 55.0), pos(3, "DMC", 40.0)],
        );
        let m = TacticalMetricsCalculator::new().calculate(&[], &set);
        assert_eq!(m.defense_line, 30.0);
        assert_eq!(m.forward_line, 55.0);
    }

    #[test]
    fn test_all_players_use_raw_extremes() {
        let set = positions(
            PositionSet::AllPlayers,
            vec![pos(1, "DC", 30.0), pos(2, "GK", 8.0), pos(3, "FW", 80.0), pos(4, "Sub", 95.0)],
        );
        let m = TacticalMetricsCalculator::new().calculate(&[], &set);
        assert_eq!(m.defense_line, 8.0);
        assert_eq!(m.forward_line, 95.0);
    }

    #[test]
    fn test_empty_position_set() {
        let m = TacticalMetricsCalculator::new().calculate(&[], &positions(PositionSet::Starters, vec![]));
        assert_eq!(m, TeamMetrics::default());
    }
}
