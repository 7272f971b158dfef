//! # xT Momentum
//!
//! Expected-threat gain per successful pass or carry, turned into a
//! time-decayed home-minus-away differential and smoothed with a Gaussian
//! kernel.
//!
//! ## Pipeline
//! 1. Rescale, look up the grid value at start and end, clip the gain to
//!    `[0, XT_CLIP_MAX]`.
//! 2. Keep the largest gain per (team, minute).
//! 3. For every distinct minute `m`, sum `exp(-DECAY_RATE * (m - t)) * gain`
//!    over `m - WINDOW_MINUTES < t <= m`, per team.
//! 4. `momentum = home - away`, smoothed with sigma [`SMOOTHING_SIGMA`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::StyleConfig;
use crate::coordinates::PitchTransform;
use crate::models::{EventType, MatchEvent, TeamId, XtGrid};

pub const XT_CLIP_MAX: f64 = 0.1;
pub const WINDOW_MINUTES: u32 = 4;
pub const DECAY_RATE: f64 = 0.25;
pub const SMOOTHING_SIGMA: f64 = 1.0;

/// Kernel radius in standard deviations.
const TRUNCATE: f64 = 4.0;

/// Best clipped gain of one team in one minute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinuteGain {
    pub team_id: TeamId,
    pub minute: u32,
    pub gain: f64,
}

/// Momentum keyed by minute; `minutes` and `values` are parallel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MomentumSeries {
    pub minutes: Vec<u32>,
    /// Smoothed home-minus-away momentum.
    pub values: Vec<f64>,
    /// Unsmoothed differential.
    pub raw: Vec<f64>,
    pub home_color: String,
    pub away_color: String,
}

impl MomentumSeries {
    pub fn is_empty(&self) -> bool {
        self.minutes.is_empty()
    }
}

pub struct XtMomentumCalculator {
    transform: PitchTransform,
    style: StyleConfig,
    grid: XtGrid,
}

impl XtMomentumCalculator {
    pub fn new(style: StyleConfig, grid: XtGrid) -> Self {
        Self {
            transform: PitchTransform::default(),
            style,
            grid,
        }
    }

    pub fn grid(&self) -> &XtGrid {
        &self.grid
    }

    /// Clipped xT gain of a single event, `None` when it does not qualify.
    pub fn action_gain(&self, event: &MatchEvent) -> Option<f64> {
        if !matches!(event.event_type, EventType::Pass | EventType::Carry) || !event.is_successful() {
            return None;
        }
        let start = self.transform.to_pitch(event.x, event.y);
        let end = self.transform.end_to_pitch(event.end_x, event.end_y)?;
        let gain = self.grid.value_at(end.x, end.y) - self.grid.value_at(start.x, start.y);
        Some(gain.clamp(0.0, XT_CLIP_MAX))
    }

    /// Largest gain per (team, minute) for the two participating teams.
    pub fn minute_gains(&self, events: &[MatchEvent], home_team_id: TeamId, away_team_id: TeamId) -> Vec<MinuteGain> {
        let mut best: BTreeMap<(TeamId, u32), f64> = BTreeMap::new();
        for event in events {
            if event.team_id != home_team_id && event.team_id != away_team_id {
                continue;
            }
            let Some(gain) = self.action_gain(event) else {
                continue;
            };
            best.entry((event.team_id, event.minute))
                .and_modify(|g| *g = g.max(gain))
                .or_insert(gain);
        }
        best.into_iter()
            .map(|((team_id, minute), gain)| MinuteGain { team_id, minute, gain })
            .collect()
    }

    pub fn calculate(&self, events: &[MatchEvent], home_team_id: TeamId, away_team_id: TeamId) -> MomentumSeries {
        let gains = self.minute_gains(events, home_team_id, away_team_id);
        let mut minutes: Vec<u32> = gains.iter().map(|g| g.minute).collect();
        minutes.sort_unstable();
        minutes.dedup();

        let raw: Vec<f64> = minutes
            .iter()
            .map(|&m| decayed_sum(&gains, home_team_id, m) - decayed_sum(&gains, away_team_id, m))
            .collect();
        let values = gaussian_filter1d(&raw, SMOOTHING_SIGMA);

        debug!(minutes = minutes.len(), "xT momentum");
        MomentumSeries {
            minutes,
            values,
            raw,
            home_color: self.style.home_color.clone(),
            away_color: self.style.away_color.clone(),
        }
    }
}

fn decayed_sum(gains: &[MinuteGain], team_id: TeamId, minute: u32) -> f64 {
    gains
        .iter()
        .filter(|g| g.team_id == team_id && g.minute <= minute && minute - g.minute < WINDOW_MINUTES)
        .map(|g| (-DECAY_RATE * f64::from(minute - g.minute)).exp() * g.gain)
        .sum()
}

/// Mirror an out-of-range index back into `0..n` (half-sample symmetric).
fn reflect_index(i: i64, n: usize) -> usize {
    let n = n as i64;
    let k = i.rem_euclid(2 * n);
    (if k >= n { 2 * n - 1 - k } else { k }) as usize
}

/// One-dimensional Gaussian filter with reflected boundaries.
pub fn gaussian_filter1d(input: &[f64], sigma: f64) -> Vec<f64> {
    if input.is_empty() || sigma <= 0.0 {
        return input.to_vec();
    }
    let radius = (TRUNCATE * sigma + 0.5) as i64;
    let mut weights: Vec<f64> = (-radius..=radius)
        .map(|x| (-0.5 * (x as f64 / sigma).powi(2)).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    weights.iter_mut().for_each(|w| *w /= total);

    (0..input.len() as i64)
        .map(|i| {
            (-radius..=radius)
                .zip(&weights)
                .map(|(offset, w)| w * input[reflect_index(i + offset, input.len())])
                .sum()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Outcome;

    const HOME: TeamId = 1;
    const AWAY: TeamId = 2;

    /// 1 row, 4 columns: value grows with x.
    fn grid() -> XtGrid {
        XtGrid::from_rows(vec![vec![0.0, 0.02, 0.05, 0.3]]).unwrap()
    }

    fn calc() -> XtMomentumCalculator {
        XtMomentumCalculator::new(StyleConfig::default(), grid())
    }

    fn ev(team: TeamId, minute: u32, event_type: EventType, x: f64, end_x: f64) -> MatchEvent {
        MatchEvent::new(0, minute, team, Some(4), event_type, Outcome::Successful, x, 50.0).with_end(end_x, 50.0)
    }

    #[test]
    fn test_same_bin_gain_is_zero() {
        assert_eq!(calc().action_gain(&ev(HOME, 1, EventType::Pass, 10.0, 20.0)), Some(0.0));
    }

    #[test]
    fn test_gain_is_clipped() {
        let c = calc();
        // 0.0 -> 0.3 clipped to 0.1
        assert_eq!(c.action_gain(&ev(HOME, 1, EventType::Carry, 10.0, 90.0)), Some(XT_CLIP_MAX));
        // backwards
        assert_eq!(c.action_gain(&ev(HOME, 1, EventType::Pass, 90.0, 10.0)), Some(0.0));
        // 0.0 -> 0.02
        let g = c.action_gain(&ev(HOME, 1, EventType::Pass, 10.0, 30.0)).unwrap();
        assert!((g - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_non_qualifying_events() {
        let c = calc();
        assert_eq!(c.action_gain(&ev(HOME, 1, EventType::SavedShot, 10.0, 90.0)), None);
        let failed = MatchEvent::new(0, 1, HOME, None, EventType::Pass, Outcome::Unsuccessful, 10.0, 50.0).with_end(90.0, 50.0);
        assert_eq!(c.action_gain(&failed), None);
        let no_end = MatchEvent::new(0, 1, HOME, None, EventType::Pass, Outcome::Successful, 10.0, 50.0);
        assert_eq!(c.action_gain(&no_end), None);
    }

    #[test]
    fn test_minute_gains_keep_maximum_and_skip_other_teams() {
        let events = vec![
            ev(HOME, 3, EventType::Pass, 10.0, 30.0),
            ev(HOME, 3, EventType::Pass, 30.0, 60.0),
            ev(99, 3, EventType::Pass, 10.0, 90.0),
        ];
        let gains = calc().minute_gains(&events, HOME, AWAY);
        assert_eq!(gains.len(), 1);
        assert!((gains[0].gain - 0.03).abs() < 1e-12);
    }

    #[test]
    fn test_decayed_window() {
        let gains = vec![
            MinuteGain { team_id: HOME, minute: 10, gain: 0.05 },
            MinuteGain { team_id: HOME, minute: 12, gain: 0.02 },
        ];
        let at_12 = decayed_sum(&gains, HOME, 12);
        assert!((at_12 - ((-0.5f64).exp() * 0.05 + 0.02)).abs() < 1e-12);
        // minute 10 falls out of the window at 14
        assert!((decayed_sum(&gains, HOME, 14) - (-0.5f64).exp() * 0.02).abs() < 1e-12);
        assert_eq!(decayed_sum(&gains, AWAY, 12), 0.0);
    }

    #[test]
    fn test_momentum_sign_and_keys() {
        let events = vec![ev(HOME, 5, EventType::Pass, 10.0, 90.0), ev(AWAY, 30, EventType::Carry, 10.0, 90.0)];
        let series = calc().calculate(&events, HOME, AWAY);
        assert_eq!(series.minutes, vec![5, 30]);
        assert!((series.raw[0] - 0.1).abs() < 1e-12);
        assert!((series.raw[1] + 0.1).abs() < 1e-12);
        assert_eq!(series.home_color, StyleConfig::default().home_color);
    }

    #[test]
    fn test_no_actions_yields_empty_series() {
        let series = calc().calculate(&[], HOME, AWAY);
        assert!(series.is_empty());
        assert!(series.values.is_empty());
    }

    #[test]
    fn test_recomputation_is_idempotent() {
        let events = vec![ev(HOME, 5, EventType::Pass, 10.0, 60.0), ev(AWAY, 6, EventType::Pass, 30.0, 90.0)];
        let c = calc();
        assert_eq!(c.calculate(&events, HOME, AWAY), c.calculate(&events, HOME, AWAY));
    }

    #[test]
    fn test_reflect_index() {
        assert_eq!(reflect_index(-1, 5), 0);
        assert_eq!(reflect_index(-2, 5), 1);
        assert_eq!(reflect_index(5, 5), 4);
        assert_eq!(reflect_index(6, 5), 3);
        assert_eq!(reflect_index(3, 1), 0);
    }

    #[test]
    fn test_gaussian_filter_preserves_constant_and_mass() {
        let smoothed = gaussian_filter1d(&[2.0; 7], 1.0);
        assert!(smoothed.iter().all(|v| (v - 2.0).abs() < 1e-12));

        let single = gaussian_filter1d(&[0.4], 1.0);
        assert!((single[0] - 0.4).abs() < 1e-12);

        let impulse = gaussian_filter1d(&[0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0], 1.0);
        let total: f64 = impulse.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!(impulse[4] > impulse[3] && impulse[3] > impulse[2]);
        assert!((impulse[3] - impulse[5]).abs() < 1e-12);
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-12, "{} != {}", a, e);
        }
    }

    // Reference outputs of scipy.ndimage.gaussian_filter1d(x, sigma=1),
    // default mode="reflect", truncate=4.0.
    #[test]
    fn test_gaussian_filter_matches_reference_values() {
        // two samples: the radius-4 kernel wraps the reflection several times
        assert_close(
            &gaussian_filter1d(&[1.0, 0.0], 1.0),
            &[0.6456144378819593, 0.3543855621180408],
        );

        assert_close(
            &gaussian_filter1d(&[0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0], 1.0),
            &[
                0.00013383062461474175,
                0.0044318616200312655,
                0.05399112742070441,
                0.24197144565660073,
                0.39894346935609776,
                0.24197144565660073,
                0.05399112742070441,
                0.0044318616200312655,
                0.00013383062461474175,
            ],
        );

        assert_close(
            &gaussian_filter1d(&[0.05, -0.02, 0.1], 1.0),
            &[0.0324226858051347, 0.03625831670336478, 0.06131899749150055],
        );
    }
}
