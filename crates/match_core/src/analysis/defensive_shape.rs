//! # Defensive Shape
//!
//! Where a team's starters make their defensive actions, and how high and
//! compact the resulting block is.
//!
//! ## Descriptors
//! - **DAH** (defensive action height): median of the starters' median x
//! - **Defense line**: median x of centre-back starters, else DAH
//! - **Forward pressing line**: mean x of the two highest starters, else DAH
//! - **Compactness**: `100 * (1 - (forward - defense) / 120)`

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::pass_network::group_by_player;
use super::stats::{mean, median, round2};
use crate::config::StyleConfig;
use crate::coordinates::{PitchPoint, PitchTransform, PITCH_LENGTH};
use crate::models::{
    is_centre_back, DefensiveAction, EventId, MatchContext, MatchEvent, PlayerId, TeamId,
    TeamRoster, TeamSide,
};

/// A defensive action on the 120x80 pitch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefensiveActionPoint {
    pub id: EventId,
    pub minute: u32,
    pub team_id: TeamId,
    pub player_id: Option<PlayerId>,
    pub action: DefensiveAction,
    pub x_sb: f64,
    pub y_sb: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefensivePosition {
    pub player_id: PlayerId,
    pub x: f64,
    pub y: f64,
    pub action_count: usize,
    /// `action_count` relative to the busiest starter, in (0, 1].
    pub marker_scale: f64,
    pub name: String,
    pub shirt_no: Option<u32>,
    pub position: String,
    pub is_starter: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefensiveDescriptors {
    pub defensive_action_height: f64,
    pub defense_line: f64,
    pub forward_line: f64,
    pub compactness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefensiveShape {
    pub team_id: TeamId,
    pub color: String,
    /// Keyed by player id. Empty is the "no data" sentinel.
    pub positions: BTreeMap<PlayerId, DefensivePosition>,
    /// `None` whenever `positions` is empty.
    pub descriptors: Option<DefensiveDescriptors>,
    /// Every defensive action by the team, for density plots.
    pub actions: Vec<DefensiveActionPoint>,
    pub unresolved_players: Vec<PlayerId>,
}

impl DefensiveShape {
    fn empty(team_id: TeamId, color: String, actions: Vec<DefensiveActionPoint>) -> Self {
        Self {
            team_id,
            color,
            positions: BTreeMap::new(),
            descriptors: None,
            actions,
            unresolved_players: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Compactness percentage for a pair of line heights, rounded to 2 decimals.
pub fn compactness(defense_line: f64, forward_line: f64) -> f64 {
    round2((1.0 - (forward_line - defense_line) / PITCH_LENGTH) * 100.0)
}

pub struct DefensiveShapeCalculator {
    transform: PitchTransform,
    style: StyleConfig,
}

impl DefensiveShapeCalculator {
    pub fn new(style: StyleConfig) -> Self {
        Self {
            transform: PitchTransform::default(),
            style,
        }
    }

    /// Defensive-type events for every team, rescaled to the pitch.
    pub fn filter_defensive_actions(&self, events: &[MatchEvent]) -> Vec<DefensiveActionPoint> {
        events
            .iter()
            .filter_map(|e| {
                let action = DefensiveAction::from_event_type(e.event_type)?;
                let PitchPoint { x, y } = self.transform.to_pitch(e.x, e.y);
                Some(DefensiveActionPoint {
                    id: e.id,
                    minute: e.minute,
                    team_id: e.team_id,
                    player_id: e.player_id,
                    action,
                    x_sb: x,
                    y_sb: y,
                })
            })
            .collect()
    }

    /// Shape for one team. Short-circuits to the empty sentinel when the team
    /// has no defensive actions or none by a starter.
    pub fn calculate(
        &self,
        actions: &[DefensiveActionPoint],
        roster: &TeamRoster,
        context: &MatchContext,
        side: TeamSide,
    ) -> DefensiveShape {
        let color = self.style.team_color(side).to_string();
        let team_actions: Vec<DefensiveActionPoint> = actions
            .iter()
            .filter(|a| a.team_id == roster.team_id)
            .cloned()
            .collect();

        if team_actions.is_empty() {
            debug!(team_id = roster.team_id, "no defensive actions");
            return DefensiveShape::empty(roster.team_id, color, team_actions);
        }

        let groups = group_by_player(team_actions.iter().map(|a| (a.player_id, a.x_sb, a.y_sb)));
        let index = roster.index();
        let mut unresolved_players = Vec::new();
        let mut positions = BTreeMap::new();

        for (player_id, group) in groups {
            let Some(info) = index.get(&player_id) else {
                unresolved_players.push(player_id);
                continue;
            };
            if !info.is_first_eleven {
                continue;
            }
            positions.insert(
                player_id,
                DefensivePosition {
                    player_id,
                    x: median(&group.xs),
                    y: median(&group.ys),
                    action_count: group.xs.len(),
                    marker_scale: 0.0,
                    name: context.display_name(info),
                    shirt_no: info.shirt_no,
                    position: info.position.clone(),
                    is_starter: true,
                },
            );
        }

        if !unresolved_players.is_empty() {
            warn!(
                team_id = roster.team_id,
                unresolved = ?unresolved_players,
                "defensive actions by players missing from the roster"
            );
        }

        if positions.is_empty() {
            let mut shape = DefensiveShape::empty(roster.team_id, color, team_actions);
            shape.unresolved_players = unresolved_players;
            return shape;
        }

        let busiest = positions.values().map(|p| p.action_count).max().unwrap_or(1) as f64;
        for p in positions.values_mut() {
            p.marker_scale = p.action_count as f64 / busiest;
        }

        let descriptors = Self::descriptors(&positions);
        debug!(
            team_id = roster.team_id,
            starters = positions.len(),
            dah = descriptors.defensive_action_height,
            compactness = descriptors.compactness,
            "defensive shape"
        );

        DefensiveShape {
            team_id: roster.team_id,
            color,
            positions,
            descriptors: Some(descriptors),
            actions: team_actions,
            unresolved_players,
        }
    }

    fn descriptors(positions: &BTreeMap<PlayerId, DefensivePosition>) -> DefensiveDescriptors {
        let xs: Vec<f64> = positions.values().map(|p| p.x).collect();
        let dah = round2(median(&xs));

        let centre_backs: Vec<f64> = positions
            .values()
            .filter(|p| is_centre_back(&p.position))
            .map(|p| p.x)
            .collect();
        let defense_line = if centre_backs.is_empty() {
            dah
        } else {
            round2(median(&centre_backs))
        };

        let mut starters_x: Vec<f64> = positions
            .values()
            .filter(|p| p.is_starter)
            .map(|p| p.x)
            .collect();
        let forward_line = if starters_x.len() >= 2 {
            starters_x.sort_by(|a, b| b.total_cmp(a));
            round2(mean(&starters_x[..2]))
        } else {
            dah
        };

        DefensiveDescriptors {
            defensive_action_height: dah,
            defense_line,
            forward_line,
            compactness: compactness(defense_line, forward_line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventType, Outcome, RosterPlayer};
    use proptest::prelude::*;

    const HOME: TeamId = 1;
    const AWAY: TeamId = 2;

    fn player(id: PlayerId, position: &str, starter: bool) -> RosterPlayer {
        RosterPlayer {
            player_id: id,
            name: format!("P{}", id),
            shirt_no: Some(id as u32),
            position: position.to_string(),
            is_first_eleven: starter,
        }
    }

    fn context() -> MatchContext {
        MatchContext::new(
            TeamRoster {
                team_id: HOME,
                name: "Home".to_string(),
                players: vec![
                    player(1, "DC", true),
                    player(2, "DC", true),
                    player(3, "FW", true),
                    player(4, "AMC", true),
                    player(5, "Sub", false),
                ],
            },
            TeamRoster {
                team_id: AWAY,
                name: "Away".to_string(),
                players: vec![player(20, "DC", true)],
            },
        )
    }

    fn action(id: u64, team: TeamId, player: PlayerId, event_type: EventType, x: f64) -> MatchEvent {
        MatchEvent::new(id, 10, team, Some(player), event_type, Outcome::Successful, x, 50.0)
    }

    fn calculator() -> DefensiveShapeCalculator {
        DefensiveShapeCalculator::new(StyleConfig::default())
    }

    #[test]
    fn test_filter_keeps_defensive_types_only() {
        let events = vec![
            action(1, HOME, 1, EventType::Tackle, 25.0),
            action(2, HOME, 1, EventType::Pass, 25.0),
            action(3, AWAY, 20, EventType::Aerial, 50.0),
            action(4, HOME, 3, EventType::Carry, 50.0),
        ];
        let actions = calculator().filter_defensive_actions(&events);
        assert_eq!(actions.len(), 2);
        assert!((actions[0].x_sb - 30.0).abs() < 1e-9);
        assert!((actions[0].y_sb - 40.0).abs() < 1e-9);
        assert_eq!(actions[1].action, DefensiveAction::Aerial);
    }

    #[test]
    fn test_descriptors_from_starters() {
        // rescaled x: 24, 36, 72, 84 (and a sub at 96)
        let events = vec![
            action(1, HOME, 1, EventType::Tackle, 20.0),
            action(2, HOME, 2, EventType::Interception, 30.0),
            action(3, HOME, 3, EventType::Foul, 70.0),
            action(4, HOME, 3, EventType::Challenge, 70.0),
            action(5, HOME, 4, EventType::BallRecovery, 60.0),
            action(6, HOME, 5, EventType::Clearance, 80.0),
        ];
        let ctx = context();
        let calc = calculator();
        let actions = calc.filter_defensive_actions(&events);
        let shape = calc.calculate(&actions, &ctx.home, &ctx, TeamSide::Home);

        assert_eq!(shape.positions.len(), 4);
        assert!(!shape.positions.contains_key(&5));
        assert_eq!(shape.actions.len(), 6);
        assert_eq!(shape.color, "#43A1D5");

        let d = shape.descriptors.unwrap();
        assert_eq!(d.defensive_action_height, 54.0); // median of 24, 36, 72, 84
        assert_eq!(d.defense_line, 30.0);
        assert_eq!(d.forward_line, 78.0);
        assert_eq!(d.compactness, 60.0);

        let forward = &shape.positions[&3];
        assert_eq!(forward.action_count, 2);
        assert!((forward.marker_scale - 1.0).abs() < 1e-9);
        assert!((shape.positions[&1].marker_scale - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_single_starter_falls_back_to_dah() {
        let events = vec![action(1, AWAY, 20, EventType::Tackle, 50.0)];
        let ctx = context();
        let calc = calculator();
        let actions = calc.filter_defensive_actions(&events);
        let shape = calc.calculate(&actions, &ctx.away, &ctx, TeamSide::Away);
        let d = shape.descriptors.unwrap();
        assert_eq!(d.defensive_action_height, 60.0);
        assert_eq!(d.forward_line, 60.0);
        assert_eq!(d.compactness, 100.0);
        assert_eq!(shape.color, "#FF4C4C");
    }

    #[test]
    fn test_team_without_defensive_events_is_empty_sentinel() {
        let events = vec![action(1, HOME, 1, EventType::Tackle, 20.0)];
        let ctx = context();
        let calc = calculator();
        let actions = calc.filter_defensive_actions(&events);
        let shape = calc.calculate(&actions, &ctx.away, &ctx, TeamSide::Away);
        assert!(shape.is_empty());
        assert!(shape.descriptors.is_none());
        assert!(shape.actions.is_empty());
    }

    #[test]
    fn test_unresolved_defenders_reported() {
        let events = vec![
            action(1, HOME, 1, EventType::Tackle, 20.0),
            action(2, HOME, 77, EventType::Tackle, 20.0),
        ];
        let ctx = context();
        let calc = calculator();
        let actions = calc.filter_defensive_actions(&events);
        let shape = calc.calculate(&actions, &ctx.home, &ctx, TeamSide::Home);
        assert_eq!(shape.unresolved_players, vec![77]);
        assert_eq!(shape.positions.len(), 1);
    }

    proptest! {
        #[test]
        fn prop_compactness_full_when_lines_meet(line in 0.1f64..120.0) {
            prop_assert_eq!(compactness(line, line), 100.0);
        }
    }
}
