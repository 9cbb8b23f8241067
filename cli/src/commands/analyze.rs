//! DAO health summary and fatigue ranking

use super::Context;
use crate::output::{summary_table, OutputFormat};
use serde::Serialize;

#[derive(Serialize)]
struct AnalyzeOutput<'a> {
    space: &'a str,
    reference_time: String,
    summary: &'a fatigue_behavioral::HealthSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    delegates: Option<&'a [fatigue_behavioral::DelegateReport]>,
}

pub fn handle(ctx: &Context, top: usize, full: bool, format: OutputFormat) -> anyhow::Result<()> {
    let report = ctx.analyze()?;

    let output = AnalyzeOutput {
        space: &report.space,
        reference_time: report.reference_time.to_rfc3339(),
        summary: &report.summary,
        delegates: full.then_some(report.delegates.as_slice()),
    };

    format.print(&output, || {
        let table = summary_table(&report.summary, report.config.window_days, top);
        format!("{} @ {}\n{}", report.space, output.reference_time, table)
    })
}
