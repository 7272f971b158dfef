//! # Event Normalizer
//!
//! Reshapes the raw event table into the canonical successful-pass table:
//! pitch-scale coordinates, pass angle and length, and a resolved receiver.
//!
//! ## Receiver linkage
//!
//! Receivers are not delivered by the feed. They are inferred from the
//! passes that follow, in table order, so callers must hand events over in
//! chronological order. A [`ReceiverResolver`] decides how the inference is
//! made; [`AdjacentRowResolver`] mirrors the classic "next passer received
//! it" approximation and can mislabel receivers across possession changes.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ReceiverPolicy;
use crate::coordinates::{PitchPoint, PitchTransform};
use crate::models::{EventId, EventType, MatchEvent, Outcome, PlayerId, TeamId};

/// A successful pass on the 120x80 pitch.
///
/// End location, angle and length are absent together when the feed did not
/// record where the pass went.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPass {
    pub id: EventId,
    pub minute: u32,
    pub team_id: TeamId,
    pub player_id: Option<PlayerId>,
    pub x: f64,
    pub y: f64,
    pub end_x: Option<f64>,
    pub end_y: Option<f64>,
    /// Degrees, atan2(end - start), in (-180, 180].
    pub pass_angle: Option<f64>,
    pub pass_angle_abs: Option<f64>,
    pub pass_length: Option<f64>,
    pub receiver: Option<PlayerId>,
}

impl NormalizedPass {
    pub fn start(&self) -> PitchPoint {
        PitchPoint::new(self.x, self.y)
    }

    pub fn end(&self) -> Option<PitchPoint> {
        Some(PitchPoint::new(self.end_x?, self.end_y?))
    }
}

// ============================================================================
// Receiver resolution
// ============================================================================

/// Assigns a receiver to each pass of an ordered pass table.
pub trait ReceiverResolver: Send + Sync {
    /// Returns one entry per input row, in the same order.
    fn resolve(&self, passes: &[NormalizedPass]) -> Vec<Option<PlayerId>>;
}

/// The next row's passer, whoever that is. `None` at table end.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdjacentRowResolver;

impl ReceiverResolver for AdjacentRowResolver {
    fn resolve(&self, passes: &[NormalizedPass]) -> Vec<Option<PlayerId>> {
        (0..passes.len())
            .map(|i| passes.get(i + 1).and_then(|next| next.player_id))
            .collect()
    }
}

/// The next row's passer, only when it is a teammate other than the passer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SameTeamNextPassResolver;

impl ReceiverResolver for SameTeamNextPassResolver {
    fn resolve(&self, passes: &[NormalizedPass]) -> Vec<Option<PlayerId>> {
        passes
            .iter()
            .enumerate()
            .map(|(i, pass)| {
                let next = passes.get(i + 1)?;
                if next.team_id != pass.team_id || next.player_id == pass.player_id {
                    return None;
                }
                next.player_id
            })
            .collect()
    }
}

impl ReceiverPolicy {
    pub fn resolver(self) -> Box<dyn ReceiverResolver> {
        match self {
            ReceiverPolicy::AdjacentRow => Box::new(AdjacentRowResolver),
            ReceiverPolicy::SameTeamNextPass => Box::new(SameTeamNextPassResolver),
        }
    }
}

// ============================================================================
// Normalizer
// ============================================================================

pub struct EventNormalizer {
    transform: PitchTransform,
    resolver: Box<dyn ReceiverResolver>,
}

impl Default for EventNormalizer {
    fn default() -> Self {
        Self::new(Box::new(AdjacentRowResolver))
    }
}

impl EventNormalizer {
    pub fn new(resolver: Box<dyn ReceiverResolver>) -> Self {
        Self {
            transform: PitchTransform::default(),
            resolver,
        }
    }

    pub fn from_policy(policy: ReceiverPolicy) -> Self {
        Self::new(policy.resolver())
    }

    /// Build the successful-pass table, preserving input order.
    ///
    /// Every successful pass gets a row, with or without an end location, so
    /// a pass missing its end still counts as the next pass for receiver
    /// inference.
    pub fn normalize(&self, events: &[MatchEvent]) -> Vec<NormalizedPass> {
        let mut passes: Vec<NormalizedPass> = events
            .iter()
            .filter(|e| e.is(EventType::Pass, Outcome::Successful))
            .map(|e| {
                let start = self.transform.to_pitch(e.x, e.y);
                let end = self.transform.end_to_pitch(e.end_x, e.end_y);
                let pass_angle = end.map(|end| start.angle_to(&end));
                NormalizedPass {
                    id: e.id,
                    minute: e.minute,
                    team_id: e.team_id,
                    player_id: e.player_id,
                    x: start.x,
                    y: start.y,
                    end_x: end.map(|p| p.x),
                    end_y: end.map(|p| p.y),
                    pass_angle,
                    pass_angle_abs: pass_angle.map(f64::abs),
                    pass_length: end.map(|end| start.distance_to(&end)),
                    receiver: None,
                }
            })
            .collect();
        let without_end = passes.iter().filter(|p| p.end_x.is_none()).count();

        let receivers = self.resolver.resolve(&passes);
        for (pass, receiver) in passes.iter_mut().zip(receivers) {
            pass.receiver = receiver;
        }

        debug!(
            passes = passes.len(),
            without_end,
            "normalized successful passes"
        );
        passes
    }
}
