//! Single delegate report

use super::Context;
use crate::output::{delegate_table, OutputFormat};
use anyhow::anyhow;

pub fn handle(ctx: &Context, delegate_id: &str, format: OutputFormat) -> anyhow::Result<()> {
    let report = ctx.analyze()?;

    // addresses are compared case-insensitively
    let delegate = report
        .delegates
        .iter()
        .find(|d| d.delegate_id.eq_ignore_ascii_case(delegate_id))
        .ok_or_else(|| anyhow!("Delegate {} not found in {}", delegate_id, report.space))?;

    format.print(delegate, || delegate_table(delegate))
}
