//! Behavioral analysis engine for delegate fatigue
//!
//! # Pipeline
//!
//! 1. [`timeline`]: validate proposals and votes, one sorted timeline per delegate
//! 2. [`participation`]: windowed participation rate, absent when a window is empty
//! 3. [`scorer`]: gap, burnout and trend signals composed into a 0-100 score
//! 4. [`aggregator`]: DAO-wide means, at-risk counts and the fatigue ranking
//!
//! Every stage is a pure function of its inputs and an explicit reference time,
//! so results are reproducible and historical runs (backtests) need no special
//! handling.

#![warn(missing_docs)]

pub mod aggregator;
pub mod participation;
pub mod report;
pub mod scorer;
pub mod targeting;
pub mod timeline;

#[cfg(test)]
mod testutil;

pub use aggregator::{summarize, HealthAggregator, HealthSummary, RankedDelegate};
pub use participation::{participation_rate, ParticipationResult};
pub use report::{AnalysisReport, DelegateReport, TrendDirection};
pub use scorer::{fatigue_score, FatigueFlags, FatigueResult, FatigueScorer, RiskBand};
pub use targeting::{high_value_targets, HighValueTarget, TargetCriteria};
pub use timeline::{normalize, normalize_with_set, with_universe, DelegateTimeline, Timelines};

use chrono::{DateTime, Utc};
use fatigue_common::{EngineConfig, EngineResult, ProposalSet, SpaceData};
use std::sync::Arc;

/// Runs the full pipeline over one governance space
#[derive(Debug, Clone, Default)]
pub struct BehavioralEngine {
    aggregator: HealthAggregator,
}

impl BehavioralEngine {
    /// Create engine, rejecting invalid configuration
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { aggregator: HealthAggregator::new(config) })
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        self.aggregator.config()
    }

    /// Analyze a space as of `reference_time`.
    ///
    /// An integrity failure anywhere in the data aborts the whole space.
    pub fn analyze(&self, data: SpaceData, reference_time: DateTime<Utc>) -> EngineResult<AnalysisReport> {
        let SpaceData { space, proposals, votes, known_delegates } = data;

        let proposals = Arc::new(ProposalSet::new(proposals)?);
        let timelines = normalize_with_set(Arc::clone(&proposals), votes)?;
        let timelines = with_universe(timelines, known_delegates.iter().map(String::as_str), &proposals);

        let delegates = self.aggregator.assess_all(&timelines, &proposals, reference_time);
        let summary = self.aggregator.summarize_reports(&delegates);

        tracing::info!(
            "Analyzed {}: {} delegates, {} proposals, mean fatigue {:.2}, {} at risk",
            space,
            summary.total_delegates,
            proposals.len(),
            summary.mean_fatigue_score,
            summary.at_risk_count
        );

        Ok(AnalysisReport {
            space,
            reference_time,
            config: self.config().clone(),
            summary,
            delegates,
        })
    }
}
