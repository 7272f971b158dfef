//! # Analysis Module
//!
//! One component per dashboard panel. Every component is a pure function of
//! the event table, the match context and its construction-time style.
//!
//! ## Submodules
//!
//! - `normalizer` - Successful-pass table with receivers
//! - `pass_network` - Average positions, combinations, edges
//! - `tactical` - Verticality and line heights
//! - `defensive_shape` - Defensive action positions and block descriptors
//! - `match_stats` - Possession, field tilt, PPDA, counts
//! - `progressive` - Progressive passes
//! - `xt_momentum` - Decayed xT differential per minute
//! - `recovery` - Recoveries and turnovers
//! - `half_pass_map` - Passes inside the opponent half
//! - `stats` - Median/mean helpers with zero-on-empty semantics

pub mod defensive_shape;
pub mod half_pass_map;
pub mod match_stats;
pub mod normalizer;
pub mod pass_network;
pub mod progressive;
pub mod recovery;
pub mod stats;
pub mod tactical;
pub mod xt_momentum;

pub use defensive_shape::{
    compactness, DefensiveActionPoint, DefensiveDescriptors, DefensivePosition, DefensiveShape,
    DefensiveShapeCalculator,
};
pub use half_pass_map::{half_pass_map, HalfPass, HalfPassMap, HALF_LINE_X};
pub use match_stats::{MatchStat, MatchStats, MatchStatsAggregator, StatKind};
pub use normalizer::{
    AdjacentRowResolver, EventNormalizer, NormalizedPass, ReceiverResolver, SameTeamNextPassResolver,
};
pub use pass_network::{
    NetworkEdge, PassCombination, PassNetworkBuilder, PlayerPosition, PlayerPositions, PositionSet,
};
pub use progressive::{
    progression_distance, ProgressiveActionDetector, ProgressivePass, ProgressivePasses,
    PROGRESSIVE_DISTANCE,
};
pub use recovery::{ActionType, PossessionAction, RecoveryTurnoverClassifier, RecoveryTurnovers};
pub use tactical::{verticality, TacticalMetricsCalculator, TeamMetrics};
pub use xt_momentum::{gaussian_filter1d, MinuteGain, MomentumSeries, XtMomentumCalculator};
