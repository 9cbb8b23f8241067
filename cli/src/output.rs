//! Output formatting

use clap::ValueEnum;
use fatigue_behavioral::{
    DelegateReport, HealthSummary, HighValueTarget, ParticipationResult, RankedDelegate,
};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Print `data` as JSON/YAML, or the rendered table
    pub fn print<T: Serialize>(&self, data: &T, table: impl FnOnce() -> String) -> anyhow::Result<()> {
        match self {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(data)?),
            OutputFormat::Table => println!("{}", table()),
        }
        Ok(())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
    }
}

#[derive(Tabled)]
struct RankingRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Delegate")]
    delegate: String,
    #[tabled(rename = "Fatigue")]
    composite: String,
    #[tabled(rename = "Band")]
    band: &'static str,
}

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct TargetRow {
    #[tabled(rename = "Delegate")]
    delegate: String,
    #[tabled(rename = "Avg VP")]
    voting_power: String,
    #[tabled(rename = "Fatigue")]
    composite: String,
    #[tabled(rename = "Band")]
    band: &'static str,
}

pub fn rate(rate: Option<f64>) -> String {
    rate.map(|r| format!("{:.1}%", r * 100.0))
        .unwrap_or_else(|| "n/a".into())
}

fn days(days: Option<f64>) -> String {
    days.map(|d| format!("{:.1}d", d)).unwrap_or_else(|| "n/a".into())
}

pub fn summary_table(summary: &HealthSummary, window_days: i64, top: usize) -> String {
    let metrics = vec![
        MetricRow { metric: "Delegates".into(), value: summary.total_delegates.to_string() },
        MetricRow {
            metric: format!("Avg participation ({}d)", window_days),
            value: rate(summary.mean_participation_30d),
        },
        MetricRow { metric: "Avg fatigue".into(), value: format!("{:.2}", summary.mean_fatigue_score) },
        MetricRow {
            metric: "At risk".into(),
            value: format!("{} ({:.1}%)", summary.at_risk_count, summary.at_risk_percentage),
        },
        MetricRow {
            metric: "Active".into(),
            value: format!("{} ({:.1}%)", summary.active_count, summary.active_percentage),
        },
        MetricRow { metric: "Declining".into(), value: summary.declining_count.to_string() },
        MetricRow { metric: "Burned out".into(), value: summary.burned_out_count.to_string() },
    ];

    let mut out = Table::new(metrics).with(Style::rounded()).to_string();
    if !summary.ranking.is_empty() {
        out.push('\n');
        out.push_str(&ranking_table(&summary.ranking[..top.min(summary.ranking.len())]));
    }
    out
}

fn ranking_table(ranking: &[RankedDelegate]) -> String {
    let rows = ranking.iter().map(|r| RankingRow {
        rank: r.rank,
        delegate: r.delegate_id.clone(),
        composite: format!("{:.2}", r.composite),
        band: r.band.as_str(),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

pub fn delegate_table(report: &DelegateReport) -> String {
    let f = &report.fatigue;
    let metrics = vec![
        MetricRow { metric: "Delegate".into(), value: report.delegate_id.clone() },
        MetricRow { metric: "Votes".into(), value: report.total_votes.to_string() },
        MetricRow { metric: "Avg voting power".into(), value: format!("{:.0}", report.avg_voting_power) },
        participation_row(&report.participation_30d),
        participation_row(&report.participation_90d),
        MetricRow { metric: "Longest gap".into(), value: days(Some(f.longest_gap_days)) },
        MetricRow { metric: "Avg gap".into(), value: days(f.avg_gap_days) },
        MetricRow { metric: "Silent for".into(), value: days(f.recent_silence_days) },
        MetricRow { metric: "Gap score".into(), value: format!("{:.2}", f.gap_score) },
        MetricRow { metric: "Burnout score".into(), value: format!("{:.2}", f.burnout_score) },
        MetricRow { metric: "Trend score".into(), value: format!("{:.2}", f.trend_score) },
        MetricRow { metric: "Fatigue".into(), value: format!("{:.2} ({})", f.composite, report.band.as_str()) },
        MetricRow { metric: "Burned out".into(), value: f.flags.is_burned_out.to_string() },
        MetricRow { metric: "Declining".into(), value: f.flags.is_declining.to_string() },
    ];
    Table::new(metrics).with(Style::rounded()).to_string()
}

fn participation_row(participation: &ParticipationResult) -> MetricRow {
    MetricRow {
        metric: format!("Participation ({}d)", participation.window_days),
        value: rate(participation.rate),
    }
}

pub fn targets_table(targets: &[HighValueTarget]) -> String {
    if targets.is_empty() {
        return "No delegates match the targeting criteria".into();
    }
    let rows = targets.iter().map(|t| TargetRow {
        delegate: t.delegate_id.clone(),
        voting_power: format!("{:.0}", t.avg_voting_power),
        composite: format!("{:.2}", t.composite),
        band: t.band.as_str(),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}
