//! # Match Report
//!
//! Runs every analysis component for both teams and collects the results in
//! one serializable [`MatchReport`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::{
    half_pass_map, DefensiveActionPoint, DefensiveShape, DefensiveShapeCalculator, EventNormalizer,
    HalfPassMap, MatchStats, MatchStatsAggregator, MomentumSeries, NetworkEdge, NormalizedPass,
    PassCombination, PassNetworkBuilder, PlayerPositions, PositionSet, ProgressiveActionDetector,
    ProgressivePasses, RecoveryTurnoverClassifier, RecoveryTurnovers, TacticalMetricsCalculator,
    TeamMetrics, XtMomentumCalculator,
};
use crate::config::{AnalyticsConfig, StyleConfig};
use crate::error::Result;
use crate::models::{MatchContext, MatchEvent, PlayerId, TeamId, TeamSide, XtGrid};
use crate::SCHEMA_VERSION;

/// Positions, metrics and edges for one position set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassNetwork {
    pub positions: PlayerPositions,
    pub metrics: TeamMetrics,
    pub edges: Vec<NetworkEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamReport {
    pub side: TeamSide,
    pub team_id: TeamId,
    pub name: String,
    pub color: String,
    pub starters: PassNetwork,
    pub all_players: PassNetwork,
    pub combinations: Vec<PassCombination>,
    pub defensive_shape: DefensiveShape,
    pub progressive: ProgressivePasses,
    pub half_pass_map: HalfPassMap,
    pub recoveries: RecoveryTurnovers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub schema_version: String,
    pub home: TeamReport,
    pub away: TeamReport,
    pub stats: MatchStats,
    pub momentum: MomentumSeries,
    pub style: StyleConfig,
    /// Players with actions but no roster entry, across every component.
    pub unresolved_players: Vec<PlayerId>,
    /// Events dropped by validation.
    pub skipped_events: usize,
    /// Valid events whose team is neither home nor away. They stay out of
    /// every team-keyed output.
    #[serde(default)]
    pub foreign_team_events: usize,
}

impl MatchReport {
    pub fn team(&self, side: TeamSide) -> &TeamReport {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Owns one instance of each component; holds no per-match state.
pub struct MatchAnalyzer {
    config: AnalyticsConfig,
    normalizer: EventNormalizer,
    networks: PassNetworkBuilder,
    tactical: TacticalMetricsCalculator,
    defensive: DefensiveShapeCalculator,
    progressive: ProgressiveActionDetector,
    recoveries: RecoveryTurnoverClassifier,
    momentum: XtMomentumCalculator,
}

impl MatchAnalyzer {
    pub fn new(config: AnalyticsConfig, grid: XtGrid) -> Self {
        let style = config.style.clone();
        Self {
            normalizer: EventNormalizer::from_policy(config.receiver),
            networks: PassNetworkBuilder::new(style.clone()),
            tactical: TacticalMetricsCalculator::new(),
            defensive: DefensiveShapeCalculator::new(style.clone()),
            progressive: ProgressiveActionDetector::new(style.clone()),
            recoveries: RecoveryTurnoverClassifier::new(style.clone()),
            momentum: XtMomentumCalculator::new(style, grid),
            config,
        }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Full report for one match.
    ///
    /// Fails only on an unusable match context. Invalid events are logged
    /// and skipped.
    pub fn analyze(&self, events: &[MatchEvent], context: &MatchContext) -> Result<MatchReport> {
        context.validate()?;

        let mut valid = Vec::with_capacity(events.len());
        let mut skipped_events = 0usize;
        for event in events {
            match event.validate() {
                Ok(()) => valid.push(event.clone()),
                Err(e) if !e.is_fatal() => {
                    warn!("Skipping event: {}", e);
                    skipped_events += 1;
                }
                Err(e) => return Err(e),
            }
        }

        let foreign_team_events = valid
            .iter()
            .filter(|e| context.side_of(e.team_id).is_none())
            .count();
        if foreign_team_events > 0 {
            warn!(count = foreign_team_events, "events from teams outside the match context");
        }

        let passes = self.normalizer.normalize(&valid);
        let defensive_actions = self.defensive.filter_defensive_actions(&valid);

        let home = self.team_report(TeamSide::Home, &valid, &passes, &defensive_actions, context);
        let away = self.team_report(TeamSide::Away, &valid, &passes, &defensive_actions, context);

        let stats = MatchStatsAggregator::new(context.home.team_id, context.away.team_id).calculate(&valid);
        let momentum = self
            .momentum
            .calculate(&valid, context.home.team_id, context.away.team_id);

        let unresolved_players: Vec<PlayerId> = [&home, &away]
            .into_iter()
            .flat_map(|t| {
                t.starters
                    .positions
                    .unresolved_players
                    .iter()
                    .chain(&t.all_players.positions.unresolved_players)
                    .chain(&t.defensive_shape.unresolved_players)
                    .copied()
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        info!(
            home = %context.home.name,
            away = %context.away.name,
            events = valid.len(),
            passes = passes.len(),
            skipped = skipped_events,
            "match analyzed"
        );

        Ok(MatchReport {
            schema_version: SCHEMA_VERSION.to_string(),
            home,
            away,
            stats,
            momentum,
            style: self.config.style.clone(),
            unresolved_players,
            skipped_events,
            foreign_team_events,
        })
    }

    fn team_report(
        &self,
        side: TeamSide,
        events: &[MatchEvent],
        passes: &[NormalizedPass],
        defensive_actions: &[DefensiveActionPoint],
        context: &MatchContext,
    ) -> TeamReport {
        let roster = context.team(side);
        let team_id = roster.team_id;
        let combinations = self.networks.combinations(passes, team_id);

        let network = |set: PositionSet| {
            let positions = self.networks.positions(passes, roster, context, set);
            PassNetwork {
                metrics: self.tactical.calculate(passes, &positions),
                edges: self.networks.edges(&combinations, &positions),
                positions,
            }
        };
        let starters = network(PositionSet::Starters);
        let all_players = network(PositionSet::AllPlayers);

        TeamReport {
            side,
            team_id,
            name: roster.name.clone(),
            color: self.config.style.team_color(side).to_string(),
            starters,
            all_players,
            defensive_shape: self.defensive.calculate(defensive_actions, roster, context, side),
            progressive: self.progressive.detect(events, team_id, side),
            half_pass_map: half_pass_map(passes, team_id, side, &self.config.style),
            recoveries: self.recoveries.classify(events, team_id, side),
            combinations,
        }
    }
}
