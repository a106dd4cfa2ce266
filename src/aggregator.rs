//! Per-pair accumulation and statistics

use chrono::TimeDelta;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use crate::config::SortBy;
use crate::duration::parse_duration;
use crate::error::{AnalysisError, Result};
use crate::extractor::TradeEvent;

/// Accumulated deals and derived metrics for one pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PairStats {
    pub pair: String,
    durations: Vec<TimeDelta>,
    profits: Vec<f64>,
    pub average_completion_time: Option<TimeDelta>,
    pub average_profit: Option<f64>,
    pub profit_per_hour: Option<f64>,
}

impl PairStats {
    pub fn new(pair: impl Into<String>) -> Self {
        Self {
            pair: pair.into(),
            durations: Vec::new(),
            profits: Vec::new(),
            average_completion_time: None,
            average_profit: None,
            profit_per_hour: None,
        }
    }

    pub fn trade_count(&self) -> usize {
        self.durations.len()
    }

    pub fn durations(&self) -> &[TimeDelta] {
        &self.durations
    }

    pub fn profits(&self) -> &[f64] {
        &self.profits
    }

    fn push(&mut self, duration: TimeDelta, profit: f64) {
        self.durations.push(duration);
        self.profits.push(profit);
    }

    pub fn compute_average_completion_time(&mut self) -> Result<TimeDelta> {
        if self.durations.is_empty() {
            return Err(self.empty("durations"));
        }
        let overflow = || AnalysisError::DurationOverflow { pair: self.pair.clone() };
        let total = self
            .durations
            .iter()
            .try_fold(TimeDelta::zero(), |acc, d| acc.checked_add(d))
            .ok_or_else(overflow)?;
        let count = i32::try_from(self.durations.len()).map_err(|_| overflow())?;
        let average = total.checked_div(count).ok_or_else(overflow)?;
        self.average_completion_time = Some(average);
        Ok(average)
    }

    pub fn compute_average_profit(&mut self) -> Result<f64> {
        if self.profits.is_empty() {
            return Err(self.empty("profits"));
        }
        let average = self.profits.iter().sum::<f64>() / self.profits.len() as f64;
        self.average_profit = Some(average);
        Ok(average)
    }

    /// Average profit normalized to one hour of average completion time.
    ///
    /// A zero average completion time (every deal reported as `0 minutes`)
    /// yields `±inf`, or `NaN` when the average profit is zero too.
    pub fn compute_profit_per_hour(&mut self) -> Result<f64> {
        let (Some(profit), Some(elapsed)) = (self.average_profit, self.average_completion_time) else {
            return Err(AnalysisError::MissingPrerequisite { pair: self.pair.clone() });
        };
        let ratio = profit / elapsed_secs(elapsed) * 3600.0;
        self.profit_per_hour = Some(ratio);
        Ok(ratio)
    }

    pub fn finalize(&mut self) -> Result<()> {
        self.compute_average_completion_time()?;
        self.compute_average_profit()?;
        self.compute_profit_per_hour()?;
        Ok(())
    }

    fn empty(&self, series: &'static str) -> AnalysisError {
        AnalysisError::EmptyAccumulation { pair: self.pair.clone(), series }
    }
}

/// Elapsed time in fractional seconds, nanoseconds included.
pub fn elapsed_secs(elapsed: TimeDelta) -> f64 {
    elapsed.num_seconds() as f64 + f64::from(elapsed.subsec_nanos()) / 1e9
}

/// `H:MM:SS`, or `N day(s), H:MM:SS` past 24 hours; sub-seconds dropped.
/// Negative values borrow a whole day, e.g. `-1 day, 23:55:00` for -5 minutes.
pub fn format_elapsed(elapsed: TimeDelta) -> String {
    let mut total = elapsed.num_seconds();
    if elapsed.subsec_nanos() < 0 {
        total -= 1;
    }
    let days = total.div_euclid(86_400);
    let rem = total.rem_euclid(86_400);
    let clock = format!("{}:{:02}:{:02}", rem / 3600, (rem % 3600) / 60, rem % 60);
    match days {
        0 => clock,
        1 | -1 => format!("{} day, {}", days, clock),
        n => format!("{} days, {}", n, clock),
    }
}

/// Descending by profit per hour. `-0.0` and `0.0` tie; NaN goes last.
fn by_profit_per_hour_desc(a: &PairStats, b: &PairStats) -> Ordering {
    let a = a.profit_per_hour.unwrap_or(f64::NAN);
    let b = b.profit_per_hour.unwrap_or(f64::NAN);
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

impl fmt::Display for PairStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pair_tabbed = if self.pair.len() > 7 {
            self.pair.clone()
        } else {
            format!("{}\t", self.pair)
        };
        let completion = self
            .average_completion_time
            .map(format_elapsed)
            .unwrap_or_else(|| "n/a".to_string());
        write!(
            f,
            "{}\ttrades={};\t avg completion: {};\t avg profit: {:.3};\t profit/h: {:.3}",
            pair_tabbed,
            self.trade_count(),
            completion,
            self.average_profit.unwrap_or(f64::NAN),
            self.profit_per_hour.unwrap_or(f64::NAN),
        )
    }
}

/// Owns every [`PairStats`], keyed by pair, in first-seen order.
#[derive(Debug, Default)]
pub struct PairAggregator {
    pairs: Vec<PairStats>,
    index: HashMap<String, usize>,
}

impl PairAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Both fields are parsed before any state is touched, so a rejected
    /// event leaves the aggregator unchanged.
    pub fn record(&mut self, event: TradeEvent) -> Result<()> {
        let duration = parse_duration(&event.duration)?;
        let profit: f64 = event
            .profit
            .trim()
            .parse()
            .map_err(|_| AnalysisError::InvalidProfit { value: event.profit.clone() })?;

        let slot = match self.index.get(&event.pair) {
            Some(&slot) => slot,
            None => {
                self.pairs.push(PairStats::new(event.pair.clone()));
                let slot = self.pairs.len() - 1;
                self.index.insert(event.pair, slot);
                slot
            }
        };
        self.pairs[slot].push(duration, profit);
        Ok(())
    }

    pub fn get(&self, pair: &str) -> Option<&PairStats> {
        self.index.get(pair).map(|&i| &self.pairs[i])
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PairStats> {
        self.pairs.iter()
    }

    /// Filter by trade count (0 disables), finalize survivors, sort stably.
    pub fn report(&self, min_trade_count: usize, sort_by: SortBy) -> Result<Vec<PairStats>> {
        let mut rows: Vec<PairStats> = self
            .pairs
            .iter()
            .filter(|p| min_trade_count == 0 || p.trade_count() >= min_trade_count)
            .cloned()
            .collect();
        for row in &mut rows {
            row.finalize()?;
        }

        match sort_by {
            SortBy::AverageCompletionTime => {
                rows.sort_by_key(|r| r.average_completion_time);
            }
            SortBy::AverageProfitPerHour => {
                rows.sort_by(by_profit_per_hour_desc);
            }
        }
        Ok(rows)
    }
}
