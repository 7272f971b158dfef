//! # Pass Network Builder
//!
//! Average passing positions per player and unordered pair counts.
//!
//! ## Position sets
//!
//! - [`PositionSet::Starters`]: players with at least one pass who are in the
//!   starting eleven. A starter with no passes has no position.
//! - [`PositionSet::AllPlayers`]: every player with at least one pass.
//!
//! Players who passed but are missing from the roster cannot be placed on a
//! plot; they are listed in `unresolved_players` instead.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::normalizer::NormalizedPass;
use super::stats::median;
use crate::config::StyleConfig;
use crate::models::{MatchContext, PlayerId, TeamId, TeamRoster, TeamSide};

/// Widest edge in plot units.
pub const MAX_EDGE_WIDTH: f64 = 10.0;

/// Opacity floor for the weakest edge.
pub const MIN_EDGE_ALPHA: f64 = 0.3;

/// Opacity added for the strongest edge on top of the floor.
pub const EDGE_ALPHA_RANGE: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionSet {
    Starters,
    AllPlayers,
}

/// Median position of a player's actions plus roster attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerPosition {
    pub player_id: PlayerId,
    pub x_avg: f64,
    pub y_avg: f64,
    /// Number of actions the medians were taken over.
    pub count: usize,
    pub name: String,
    pub shirt_no: Option<u32>,
    pub position: String,
    pub is_first_eleven: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassCombination {
    pub pos_min: PlayerId,
    pub pos_max: PlayerId,
    pub pass_count: usize,
}

/// A combination joined with both endpoint positions, ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkEdge {
    pub pos_min: PlayerId,
    pub pos_max: PlayerId,
    pub pass_count: usize,
    pub x: f64,
    pub y: f64,
    pub x_end: f64,
    pub y_end: f64,
    pub line_width: f64,
    pub alpha: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerPositions {
    pub team_id: TeamId,
    pub set: PositionSet,
    /// Ordered by player id.
    pub players: Vec<PlayerPosition>,
    /// Players who passed but have no roster entry.
    pub unresolved_players: Vec<PlayerId>,
}

impl PlayerPositions {
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, player_id: PlayerId) -> Option<&PlayerPosition> {
        self.players.iter().find(|p| p.player_id == player_id)
    }

    pub fn x_values(&self) -> Vec<f64> {
        self.players.iter().map(|p| p.x_avg).collect()
    }
}

/// Coordinates of one player's actions.
pub(crate) struct PassGroup {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

pub(crate) fn group_by_player<I>(points: I) -> BTreeMap<PlayerId, PassGroup>
where
    I: IntoIterator<Item = (Option<PlayerId>, f64, f64)>,
{
    let mut groups: BTreeMap<PlayerId, PassGroup> = BTreeMap::new();
    for (player, x, y) in points {
        let Some(player) = player else { continue };
        let group = groups.entry(player).or_insert_with(|| PassGroup {
            xs: Vec::new(),
            ys: Vec::new(),
        });
        group.xs.push(x);
        group.ys.push(y);
    }
    groups
}

pub struct PassNetworkBuilder {
    style: StyleConfig,
}

impl PassNetworkBuilder {
    pub fn new(style: StyleConfig) -> Self {
        Self { style }
    }

    pub fn team_color(&self, side: TeamSide) -> &str {
        self.style.team_color(side)
    }

    /// Average positions for one team under the given position-set policy.
    ///
    /// # Arguments
    /// * `passes` - Normalized passes for the whole match
    /// * `roster` - The team's roster (also supplies the team id)
    /// * `context` - Supplies the global display-name lookup
    /// * `set` - Which players to keep
    pub fn positions(
        &self,
        passes: &[NormalizedPass],
        roster: &TeamRoster,
        context: &MatchContext,
        set: PositionSet,
    ) -> PlayerPositions {
        let groups = group_by_player(
            passes
                .iter()
                .filter(|p| p.team_id == roster.team_id)
                .map(|p| (p.player_id, p.x, p.y)),
        );
        let index = roster.index();

        let mut players = Vec::with_capacity(groups.len());
        let mut unresolved_players = Vec::new();

        for (player_id, group) in groups {
            let Some(info) = index.get(&player_id) else {
                unresolved_players.push(player_id);
                continue;
            };
            if set == PositionSet::Starters && !info.is_first_eleven {
                continue;
            }
            players.push(PlayerPosition {
                player_id,
                x_avg: median(&group.xs),
                y_avg: median(&group.ys),
                count: group.xs.len(),
                name: context.display_name(info),
                shirt_no: info.shirt_no,
                position: info.position.clone(),
                is_first_eleven: info.is_first_eleven,
            });
        }

        if !unresolved_players.is_empty() {
            warn!(
                team_id = roster.team_id,
                unresolved = ?unresolved_players,
                "players with passes are missing from the roster"
            );
        }
        debug!(team_id = roster.team_id, set = ?set, players = players.len(), "pass positions");

        PlayerPositions {
            team_id: roster.team_id,
            set,
            players,
            unresolved_players,
        }
    }

    /// Count unordered passer/receiver pairs for one team.
    ///
    /// A->B and B->A land on the same (min, max) combination. Self-pairs are
    /// kept as (a, a). Output is ordered by (pos_min, pos_max).
    pub fn combinations(&self, passes: &[NormalizedPass], team_id: TeamId) -> Vec<PassCombination> {
        let mut counts: BTreeMap<(PlayerId, PlayerId), usize> = BTreeMap::new();
        for pass in passes.iter().filter(|p| p.team_id == team_id) {
            let (Some(passer), Some(receiver)) = (pass.player_id, pass.receiver) else {
                continue;
            };
            *counts
                .entry((passer.min(receiver), passer.max(receiver)))
                .or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|((pos_min, pos_max), pass_count)| PassCombination {
                pos_min,
                pos_max,
                pass_count,
            })
            .collect()
    }

    /// Join combinations with positions on both endpoints and scale edge styling.
    ///
    /// Combinations with an endpoint outside the position set are dropped.
    pub fn edges(&self, combinations: &[PassCombination], positions: &PlayerPositions) -> Vec<NetworkEdge> {
        let joined: Vec<(&PassCombination, &PlayerPosition, &PlayerPosition)> = combinations
            .iter()
            .filter_map(|c| Some((c, positions.get(c.pos_min)?, positions.get(c.pos_max)?)))
            .collect();

        let max_passes = joined.iter().map(|(c, _, _)| c.pass_count).max().unwrap_or(0);
        if max_passes == 0 {
            return Vec::new();
        }

        joined
            .into_iter()
            .map(|(c, start, end)| {
                let share = c.pass_count as f64 / max_passes as f64;
                NetworkEdge {
                    pos_min: c.pos_min,
                    pos_max: c.pos_max,
                    pass_count: c.pass_count,
                    x: start.x_avg,
                    y: start.y_avg,
                    x_end: end.x_avg,
                    y_end: end.y_avg,
                    line_width: share * MAX_EDGE_WIDTH,
                    alpha: MIN_EDGE_ALPHA + share * EDGE_ALPHA_RANGE,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::normalizer::EventNormalizer;
    use crate::models::{EventType, MatchEvent, Outcome, RosterPlayer};
    use proptest::prelude::*;

    const TEAM: TeamId = 100;

    fn player(id: PlayerId, position: &str, starter: bool) -> RosterPlayer {
        RosterPlayer {
            player_id: id,
            name: format!("Player {}", id),
            shirt_no: Some(id as u32),
            position: position.to_string(),
            is_first_eleven: starter,
        }
    }

    fn context() -> MatchContext {
        let home = TeamRoster {
            team_id: TEAM,
            name: "Home".to_string(),
            players: vec![
                player(1, "DC", true),
                player(2, "FW", true),
                player(3, "Sub", false),
                player(4, "DC", true),
            ],
        };
        let away = TeamRoster {
            team_id: 200,
            name: "Away".to_string(),
            players: vec![],
        };
        MatchContext::new(home, away)
    }

    fn pass(id: u64, minute: u32, player: u64, x: f64, y: f64) -> MatchEvent {
        MatchEvent::new(id, minute, TEAM, Some(player), EventType::Pass, Outcome::Successful, x, y)
            .with_end(x + 5.0, y)
    }

    fn builder() -> PassNetworkBuilder {
        PassNetworkBuilder::new(StyleConfig::default())
    }

    #[test]
    fn test_two_pass_scenario() {
        let events = vec![pass(1, 10, 1, 40.0, 40.0), pass(2, 12, 2, 50.0, 50.0)];
        let passes = EventNormalizer::default().normalize(&events);
        assert_eq!(passes[0].receiver, Some(2));

        let combos = builder().combinations(&passes, TEAM);
        assert_eq!(combos.len(), 1);
        assert_eq!((combos[0].pos_min, combos[0].pos_max), (1, 2));
        assert!(combos[0].pass_count >= 1);
    }

    #[test]
    fn test_combinations_merge_directions() {
        let events = vec![
            pass(1, 1, 1, 40.0, 40.0),
            pass(2, 2, 2, 50.0, 50.0),
            pass(3, 3, 1, 40.0, 40.0),
            pass(4, 4, 2, 50.0, 50.0),
        ];
        let passes = EventNormalizer::default().normalize(&events);
        let combos = builder().combinations(&passes, TEAM);
        assert_eq!(combos, vec![PassCombination { pos_min: 1, pos_max: 2, pass_count: 3 }]);
    }

    #[test]
    fn test_starters_view_drops_subs_and_passless_starters() {
        let events = vec![
            pass(1, 1, 1, 20.0, 40.0),
            pass(2, 2, 1, 30.0, 60.0),
            pass(3, 3, 3, 70.0, 50.0),
            pass(4, 4, 2, 80.0, 50.0),
        ];
        let ctx = context();
        let passes = EventNormalizer::default().normalize(&events);
        let starters = builder().positions(&passes, &ctx.home, &ctx, PositionSet::Starters);
        let ids: Vec<_> = starters.players.iter().map(|p| p.player_id).collect();
        // player 4 started but never passed
        assert_eq!(ids, vec![1, 2]);

        let p1 = starters.get(1).unwrap();
        assert_eq!(p1.count, 2);
        assert!((p1.x_avg - 30.0).abs() < 1e-9); // median of 24, 36
        assert!((p1.y_avg - 40.0).abs() < 1e-9); // median of 32, 48

        let all = builder().positions(&passes, &ctx.home, &ctx, PositionSet::AllPlayers);
        let ids: Vec<_> = all.players.iter().map(|p| p.player_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_unresolved_players_reported() {
        let events = vec![pass(1, 1, 1, 20.0, 40.0), pass(2, 2, 99, 30.0, 60.0)];
        let ctx = context();
        let passes = EventNormalizer::default().normalize(&events);
        let positions = builder().positions(&passes, &ctx.home, &ctx, PositionSet::AllPlayers);
        assert_eq!(positions.players.len(), 1);
        assert_eq!(positions.unresolved_players, vec![99]);
    }

    #[test]
    fn test_edges_scale_with_max_count() {
        let events = vec![
            pass(1, 1, 1, 20.0, 40.0),
            pass(2, 2, 2, 60.0, 40.0),
            pass(3, 3, 1, 20.0, 40.0),
            pass(4, 4, 4, 25.0, 20.0),
            pass(5, 5, 1, 20.0, 40.0),
            pass(6, 6, 4, 25.0, 20.0),
        ];
        let ctx = context();
        let b = builder();
        let passes = EventNormalizer::default().normalize(&events);
        let positions = b.positions(&passes, &ctx.home, &ctx, PositionSet::Starters);
        let combos = b.combinations(&passes, TEAM);
        let edges = b.edges(&combos, &positions);

        let strongest = edges.iter().find(|e| (e.pos_min, e.pos_max) == (1, 4)).unwrap();
        assert_eq!(strongest.pass_count, 3);
        assert!((strongest.line_width - 10.0).abs() < 1e-9);
        assert!((strongest.alpha - 0.9).abs() < 1e-9);

        let weaker = edges.iter().find(|e| (e.pos_min, e.pos_max) == (1, 2)).unwrap();
        assert_eq!(weaker.pass_count, 2);
        assert!((weaker.line_width - 20.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_team_yields_empty_tables() {
        let ctx = context();
        let b = builder();
        let positions = b.positions(&[], &ctx.home, &ctx, PositionSet::Starters);
        assert!(positions.is_empty());
        assert!(b.combinations(&[], TEAM).is_empty());
        assert!(b.edges(&[], &positions).is_empty());
    }

    proptest! {
        #[test]
        fn prop_combination_counts_symmetric(
            pairs in proptest::collection::vec((1u64..6, 1u64..6), 0..40)
        ) {
            let to_passes = |swap: bool| -> Vec<NormalizedPass> {
                pairs
                    .iter()
                    .enumerate()
                    .map(|(i, &(a, b))| {
                        let (passer, receiver) = if swap { (b, a) } else { (a, b) };
                        NormalizedPass {
                            id: i as u64,
                            minute: i as u32,
                            team_id: TEAM,
                            player_id: Some(passer),
                            x: 10.0,
                            y: 10.0,
                            end_x: Some(20.0),
                            end_y: Some(20.0),
                            pass_angle: Some(45.0),
                            pass_angle_abs: Some(45.0),
                            pass_length: Some(14.1),
                            receiver: Some(receiver),
                        }
                    })
                    .collect()
            };
            let b = builder();
            let forward = b.combinations(&to_passes(false), TEAM);
            let swapped = b.combinations(&to_passes(true), TEAM);
            prop_assert_eq!(forward, swapped);
        }
    }
}
