//! High-value targeting: fatigued delegates that still carry large voting power

use crate::report::DelegateReport;
use crate::scorer::RiskBand;
use serde::{Deserialize, Serialize};

/// Selection floor for [`high_value_targets`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetCriteria {
    /// Minimum mean voting power (inclusive)
    pub min_voting_power: f64,
    /// Composite the delegate must exceed
    pub min_fatigue: f64,
}

impl Default for TargetCriteria {
    fn default() -> Self {
        Self {
            min_voting_power: 50_000.0,
            min_fatigue: 50.0,
        }
    }
}

/// A delegate worth direct outreach
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighValueTarget {
    /// Delegate address
    pub delegate_id: String,
    /// Mean voting power per vote
    pub avg_voting_power: f64,
    /// Composite fatigue score
    pub composite: f64,
    /// Interpretation band
    pub band: RiskBand,
}

/// Delegates meeting `criteria`, by voting power then fatigue, both descending.
///
/// Remaining ties fall back to ascending delegate id.
pub fn high_value_targets(reports: &[DelegateReport], criteria: &TargetCriteria) -> Vec<HighValueTarget> {
    let mut targets: Vec<HighValueTarget> = reports
        .iter()
        .filter(|r| r.avg_voting_power >= criteria.min_voting_power)
        .filter(|r| r.fatigue.composite > criteria.min_fatigue)
        .map(|r| HighValueTarget {
            delegate_id: r.delegate_id.clone(),
            avg_voting_power: r.avg_voting_power,
            composite: r.fatigue.composite,
            band: r.band,
        })
        .collect();

    targets.sort_by(|a, b| {
        b.avg_voting_power
            .total_cmp(&a.avg_voting_power)
            .then_with(|| b.composite.total_cmp(&a.composite))
            .then_with(|| a.delegate_id.cmp(&b.delegate_id))
    });

    tracing::debug!("Selected {} high-value targets out of {}", targets.len(), reports.len());
    targets
}
