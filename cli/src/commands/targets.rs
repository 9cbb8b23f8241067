//! High-value outreach targets

use super::Context;
use crate::output::{targets_table, OutputFormat};
use fatigue_behavioral::{high_value_targets, TargetCriteria};

pub fn handle(ctx: &Context, criteria: TargetCriteria, format: OutputFormat) -> anyhow::Result<()> {
    let report = ctx.analyze()?;
    let targets = high_value_targets(&report.delegates, &criteria);

    tracing::info!(
        "{} targets with voting power >= {} and fatigue > {}",
        targets.len(),
        criteria.min_voting_power,
        criteria.min_fatigue
    );

    format.print(&targets, || targets_table(&targets))
}
