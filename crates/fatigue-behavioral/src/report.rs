//! Records handed to the output layer

use crate::aggregator::HealthSummary;
use crate::participation::ParticipationResult;
use crate::scorer::{FatigueResult, RiskBand};
use chrono::{DateTime, Utc};
use fatigue_common::EngineConfig;
use serde::{Deserialize, Serialize};

/// Direction of participation between the short and baseline windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    /// Short-window rate below the baseline
    Declining,
    /// Short-window rate at or above the baseline
    Stable,
    /// One of the windows held no proposals
    InsufficientData,
}

impl TrendDirection {
    /// Classify from the two participation windows and the scorer's decline flag
    pub fn classify(short: &ParticipationResult, baseline: &ParticipationResult, is_declining: bool) -> Self {
        if is_declining {
            TrendDirection::Declining
        } else if short.has_data() && baseline.has_data() {
            TrendDirection::Stable
        } else {
            TrendDirection::InsufficientData
        }
    }
}

/// Everything known about one delegate after a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelegateReport {
    /// Delegate address
    pub delegate_id: String,
    /// Distinct proposals voted on
    pub total_votes: usize,
    /// Mean voting power per vote
    pub avg_voting_power: f64,
    /// Primary window participation (`window_days`, 30 by default)
    pub participation_30d: ParticipationResult,
    /// Baseline window participation (`trend_baseline_days`, 90 by default)
    pub participation_90d: ParticipationResult,
    /// Fatigue assessment
    pub fatigue: FatigueResult,
    /// Interpretation band of the composite
    pub band: RiskBand,
    /// Participation trend
    pub trend: TrendDirection,
}

/// Complete output of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Governance space analyzed
    pub space: String,
    /// Instant the analysis was computed for
    pub reference_time: DateTime<Utc>,
    /// Parameters used
    pub config: EngineConfig,
    /// DAO-wide aggregates and ranking
    pub summary: HealthSummary,
    /// Per-delegate results in ascending delegate id order
    pub delegates: Vec<DelegateReport>,
}

impl AnalysisReport {
    /// Report of one delegate
    pub fn delegate(&self, delegate_id: &str) -> Option<&DelegateReport> {
        self.delegates
            .binary_search_by(|d| d.delegate_id.as_str().cmp(delegate_id))
            .ok()
            .map(|i| &self.delegates[i])
    }
}
