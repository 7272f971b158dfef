//! # Match Stats Aggregator
//!
//! Home/away statistic pairs computed from the raw event table, in source
//! scale (0-100). Each statistic applies its own filter.
//!
//! ## Statistics
//! - **Possession**: share of all pass attempts
//! - **Field Tilt**: share of touches in the attacking third (x >= 70)
//! - **PPDA**: opponent successful passes with x < 70 per own defensive
//!   action with x > 35
//! - **Tackles (Wins)**, **Interceptions**, **Clearance**, **Aerials (Wins)**:
//!   counts

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::stats::{percentage_split, ratio_or_zero, round2};
use crate::models::{EventType, MatchEvent, Outcome, TeamId, PRESSING_ACTIONS};

/// Attacking-third boundary in source scale.
pub const FINAL_THIRD_X: f64 = 70.0;

/// Pressing actions only count beyond this line, in source scale.
pub const PRESSING_ZONE_X: f64 = 35.0;

pub const POSSESSION: &str = "Possession";
pub const FIELD_TILT: &str = "Field Tilt";
pub const PPDA: &str = "PPDA";
pub const TACKLES_WON: &str = "Tackles (Wins)";
pub const INTERCEPTIONS: &str = "Interceptions";
pub const CLEARANCES: &str = "Clearance";
pub const AERIALS_WON: &str = "Aerials (Wins)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    /// Percentage split of a count pair; sums to 100 unless both are 0.
    Percentage,
    Ratio,
    Count,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStat {
    pub name: String,
    pub kind: StatKind,
    pub home: f64,
    pub away: f64,
}

/// Statistics in display order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchStats {
    pub stats: Vec<MatchStat>,
}

impl MatchStats {
    pub fn get(&self, name: &str) -> Option<&MatchStat> {
        self.stats.iter().find(|s| s.name == name)
    }

    fn push(&mut self, name: &str, kind: StatKind, home: f64, away: f64) {
        self.stats.push(MatchStat {
            name: name.to_string(),
            kind,
            home,
            away,
        });
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MatchStatsAggregator {
    home_team_id: TeamId,
    away_team_id: TeamId,
}

impl MatchStatsAggregator {
    pub fn new(home_team_id: TeamId, away_team_id: TeamId) -> Self {
        Self {
            home_team_id,
            away_team_id,
        }
    }

    pub fn calculate(&self, events: &[MatchEvent]) -> MatchStats {
        let mut stats = MatchStats::default();

        // Possession
        let (home, away) = self.count_pair(events, |e| e.event_type == EventType::Pass);
        let (h, a) = percentage_split(home, away);
        stats.push(POSSESSION, StatKind::Percentage, h, a);

        // Field tilt
        let (home, away) = self.count_pair(events, |e| e.is_touch && e.x >= FINAL_THIRD_X);
        let (h, a) = percentage_split(home, away);
        stats.push(FIELD_TILT, StatKind::Percentage, h, a);

        // PPDA
        let (home_def, away_def) = self.count_pair(events, |e| {
            PRESSING_ACTIONS.contains(&e.event_type) && e.x > PRESSING_ZONE_X
        });
        let (home_passes, away_passes) = self.count_pair(events, |e| {
            e.is(EventType::Pass, Outcome::Successful) && e.x < FINAL_THIRD_X
        });
        stats.push(
            PPDA,
            StatKind::Ratio,
            round2(ratio_or_zero(away_passes as f64, home_def as f64)),
            round2(ratio_or_zero(home_passes as f64, away_def as f64)),
        );

        let (home, away) = self.count_pair(events, |e| e.is(EventType::Tackle, Outcome::Successful));
        stats.push(TACKLES_WON, StatKind::Count, home as f64, away as f64);

        let (home, away) = self.count_pair(events, |e| e.event_type == EventType::Interception);
        stats.push(INTERCEPTIONS, StatKind::Count, home as f64, away as f64);

        let (home, away) = self.count_pair(events, |e| e.event_type == EventType::Clearance);
        stats.push(CLEARANCES, StatKind::Count, home as f64, away as f64);

        let (home, away) = self.count_pair(events, |e| e.is(EventType::Aerial, Outcome::Successful));
        stats.push(AERIALS_WON, StatKind::Count, home as f64, away as f64);

        debug!(stats = stats.stats.len(), "match stats");
        stats
    }

    fn count_pair<F>(&self, events: &[MatchEvent], predicate: F) -> (usize, usize)
    where
        F: Fn(&MatchEvent) -> bool,
    {
        events
            .iter()
            .filter(|e| predicate(e))
            .fold((0, 0), |(home, away), e| {
                if e.team_id == self.home_team_id {
                    (home + 1, away)
                } else if e.team_id == self.away_team_id {
                    (home, away + 1)
                } else {
                    (home, away)
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const HOME: TeamId = 1;
    const AWAY: TeamId = 2;

    fn ev(team: TeamId, event_type: EventType, outcome: Outcome, x: f64) -> MatchEvent {
        MatchEvent::new(0, 1, team, Some(9), event_type, outcome, x, 50.0)
    }

    fn aggregator() -> MatchStatsAggregator {
        MatchStatsAggregator::new(HOME, AWAY)
    }

    #[test]
    fn test_possession_counts_all_pass_attempts() {
        let events = vec![
            ev(HOME, EventType::Pass, Outcome::Successful, 50.0),
            ev(HOME, EventType::Pass, Outcome::Unsuccessful, 50.0),
            ev(HOME, EventType::Pass, Outcome::Successful, 50.0),
            ev(AWAY, EventType::Pass, Outcome::Successful, 50.0),
            ev(AWAY, EventType::Tackle, Outcome::Successful, 50.0),
        ];
        let stats = aggregator().calculate(&events);
        let p = stats.get(POSSESSION).unwrap();
        assert_eq!((p.home, p.away), (75.0, 25.0));
        assert_eq!(p.kind, StatKind::Percentage);
    }

    #[test]
    fn test_field_tilt_uses_touches_in_final_third() {
        let events = vec![
            ev(HOME, EventType::Pass, Outcome::Successful, 75.0).touch(),
            ev(HOME, EventType::Pass, Outcome::Successful, 70.0).touch(),
            ev(HOME, EventType::Pass, Outcome::Successful, 69.9).touch(),
            ev(AWAY, EventType::Carry, Outcome::Successful, 90.0).touch(),
            ev(AWAY, EventType::Carry, Outcome::Successful, 90.0),
        ];
        let stats = aggregator().calculate(&events);
        let t = stats.get(FIELD_TILT).unwrap();
        assert_eq!((t.home, t.away), (66.67, 33.33));
    }

    #[test]
    fn test_ppda() {
        let mut events = vec![
            // home defensive actions beyond x=35: 2 (one at 30 is ignored)
            ev(HOME, EventType::Tackle, Outcome::Successful, 40.0),
            ev(HOME, EventType::Foul, Outcome::Unsuccessful, 60.0),
            ev(HOME, EventType::Interception, Outcome::Successful, 30.0),
        ];
        // away successful passes with x < 70: 5
        for _ in 0..5 {
            events.push(ev(AWAY, EventType::Pass, Outcome::Successful, 50.0));
        }
        events.push(ev(AWAY, EventType::Pass, Outcome::Successful, 80.0));
        events.push(ev(AWAY, EventType::Pass, Outcome::Unsuccessful, 50.0));

        let stats = aggregator().calculate(&events);
        let ppda = stats.get(PPDA).unwrap();
        assert_eq!(ppda.home, 2.5);
        // away made no defensive actions
        assert_eq!(ppda.away, 0.0);
    }

    #[test]
    fn test_ppda_zero_home_defensive_actions() {
        let events = vec![ev(AWAY, EventType::Pass, Outcome::Successful, 20.0)];
        let stats = aggregator().calculate(&events);
        assert_eq!(stats.get(PPDA).unwrap().home, 0.0);
    }

    #[test]
    fn test_counts() {
        let events = vec![
            ev(HOME, EventType::Tackle, Outcome::Successful, 50.0),
            ev(HOME, EventType::Tackle, Outcome::Unsuccessful, 50.0),
            ev(HOME, EventType::Interception, Outcome::Unset, 50.0),
            ev(AWAY, EventType::Clearance, Outcome::Unsuccessful, 10.0),
            ev(AWAY, EventType::Aerial, Outcome::Successful, 50.0),
            ev(AWAY, EventType::Aerial, Outcome::Unsuccessful, 50.0),
            ev(3, EventType::Aerial, Outcome::Successful, 50.0),
        ];
        let stats = aggregator().calculate(&events);
        let pair = |name: &str| {
            let s = stats.get(name).unwrap();
            (s.home, s.away)
        };
        assert_eq!(pair(TACKLES_WON), (1.0, 0.0));
        assert_eq!(pair(INTERCEPTIONS), (1.0, 0.0));
        assert_eq!(pair(CLEARANCES), (0.0, 1.0));
        assert_eq!(pair(AERIALS_WON), (0.0, 1.0));
    }

    #[test]
    fn test_empty_table_is_all_zero() {
        let stats = aggregator().calculate(&[]);
        assert_eq!(stats.stats.len(), 7);
        assert!(stats.stats.iter().all(|s| s.home == 0.0 && s.away == 0.0));
        let names: Vec<&str> = stats.stats.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![POSSESSION, FIELD_TILT, PPDA, TACKLES_WON, INTERCEPTIONS, CLEARANCES, AERIALS_WON]
        );
    }

    proptest! {
        #[test]
        fn prop_possession_sums_to_hundred(home in 0usize..200, away in 0usize..200) {
            let mut events = Vec::new();
            for _ in 0..home {
                events.push(ev(HOME, EventType::Pass, Outcome::Successful, 50.0));
            }
            for _ in 0..away {
                events.push(ev(AWAY, EventType::Pass, Outcome::Unsuccessful, 50.0));
            }
            let stats = aggregator().calculate(&events);
            let p = stats.get(POSSESSION).unwrap();
            if home + away == 0 {
                prop_assert_eq!((p.home, p.away), (0.0, 0.0));
            } else {
                prop_assert!((p.home + p.away - 100.0).abs() <= 0.011);
            }
        }
    }
}
