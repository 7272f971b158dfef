//! # match_core - Post-Match Tactical Analytics Engine
//!
//! Turns a match-centre event table plus team rosters into plot-ready
//! tables: passing networks, defensive shapes, match statistics,
//! progressive passes, xT momentum and recovery/turnover maps.
//!
//! ## Features
//! - Pure functions over in-memory tables; no I/O, no shared state
//! - One coordinate transform (100x100 feed scale to a 120x80 pitch)
//! - Pluggable receiver inference for pass networks
//! - Serializable [`MatchReport`] for rendering layers

pub mod analysis;
pub mod config;
pub mod coordinates;
pub mod error;
pub mod models;
pub mod report;

pub use config::{AnalyticsConfig, ReceiverPolicy, StyleConfig};
pub use coordinates::{PitchPoint, PitchTransform, PITCH_LENGTH, PITCH_WIDTH};
pub use error::{AnalyticsError, Result};
pub use models::{
    EventType, MatchContext, MatchEvent, Outcome, RosterPlayer, TeamRoster, TeamSide, XtGrid,
};
pub use report::{MatchAnalyzer, MatchReport, PassNetwork, TeamReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Report schema version, bumped on breaking output changes.
pub const SCHEMA_VERSION: &str = "1.0";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_engine_types_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MatchAnalyzer>();
        assert_send_sync::<MatchReport>();
        assert_send_sync::<MatchContext>();
    }
}
