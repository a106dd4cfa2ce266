//! Rendering finalized pair statistics.

use chrono::TimeDelta;
use serde::Serialize;

use crate::aggregator::{elapsed_secs, format_elapsed, PairStats};
use crate::config::Config;

/// Serializable view of a finalized [`PairStats`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub pair: String,
    pub trade_count: usize,
    pub average_completion_time: String,
    pub average_completion_secs: f64,
    pub average_profit: f64,
    pub profit_per_hour: f64,
}

impl From<&PairStats> for ReportRow {
    fn from(stats: &PairStats) -> Self {
        let elapsed = stats.average_completion_time.unwrap_or(TimeDelta::zero());
        Self {
            pair: stats.pair.clone(),
            trade_count: stats.trade_count(),
            average_completion_time: format_elapsed(elapsed),
            average_completion_secs: elapsed_secs(elapsed),
            average_profit: stats.average_profit.unwrap_or_default(),
            profit_per_hour: stats.profit_per_hour.unwrap_or_default(),
        }
    }
}

/// Lines describing the active filters, printed ahead of the rows.
pub fn header_lines(config: &Config) -> Vec<String> {
    let mut lines = Vec::new();
    if config.trades_lower_bound > 0 {
        lines.push(format!("Filter out pairs with trades < {}", config.trades_lower_bound));
    }
    if let Some(start) = config.start_date {
        lines.push(format!("Filter out trades before {}", start.format(crate::message::DATE_FORMAT)));
    }
    if let Some(end) = config.end_date {
        lines.push(format!("Filter out trades after {}", end.format(crate::message::DATE_FORMAT)));
    }
    lines.push(format!("Analysing pairs with base coin(s): {:?}", config.primary_coins));
    lines.push(config.sort_by.to_string());
    lines
}

pub fn render_text(rows: &[PairStats]) -> String {
    rows.iter().map(|r| format!("{}\n", r)).collect()
}

pub fn render_json(rows: &[PairStats]) -> serde_json::Result<String> {
    let rows: Vec<ReportRow> = rows.iter().map(ReportRow::from).collect();
    serde_json::to_string_pretty(&rows)
}
