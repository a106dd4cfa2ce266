//! Drives messages through the extractor and the aggregator.

use log::{debug, info};

use crate::aggregator::{PairAggregator, PairStats};
use crate::config::{Config, SortBy};
use crate::error::Result;
use crate::extractor::EventExtractor;
use crate::history::DateWindow;
use crate::message::ChatMessage;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub scanned: usize,
    pub undated: usize,
    pub out_of_window: usize,
    pub without_text: usize,
    pub completed_deals: usize,
    pub recorded: usize,
    pub skipped: usize,
}

#[derive(Debug)]
pub struct Analysis {
    pub rows: Vec<PairStats>,
    pub aggregator: PairAggregator,
    pub summary: RunSummary,
}

#[derive(Debug)]
pub struct Pipeline {
    extractor: EventExtractor,
    window: DateWindow,
    min_trade_count: usize,
    sort_by: SortBy,
}

impl Pipeline {
    /// Fails on invalid configuration before any message is looked at.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            extractor: EventExtractor::new(&config.primary_coins)?,
            window: DateWindow::new(config.start_date, config.end_date),
            min_trade_count: config.trades_lower_bound,
            sort_by: config.sort_by,
        })
    }

    /// Per-message failures are logged at debug and skipped. Only
    /// statistics sequencing errors come back as `Err`.
    pub fn run<'a, I>(&self, messages: I) -> Result<Analysis>
    where
        I: IntoIterator<Item = &'a ChatMessage>,
    {
        let mut aggregator = PairAggregator::new();
        let mut summary = RunSummary::default();

        for message in messages {
            summary.scanned += 1;
            let Some(ts) = message.timestamp() else {
                debug!("message {:?} has no usable date, skipping", message.id);
                summary.undated += 1;
                continue;
            };
            if !self.window.contains(ts) {
                summary.out_of_window += 1;
                continue;
            }
            let Some(body) = &message.text else {
                summary.without_text += 1;
                continue;
            };

            let event = match self.extractor.extract(body) {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(e) if !e.is_recoverable() => return Err(e),
                Err(e) => {
                    debug!("message {:?}: {}", message.id, e);
                    summary.completed_deals += 1;
                    summary.skipped += 1;
                    continue;
                }
            };
            summary.completed_deals += 1;

            match aggregator.record(event) {
                Ok(()) => summary.recorded += 1,
                Err(e) if !e.is_recoverable() => return Err(e),
                Err(e) => {
                    debug!("message {:?}: {}", message.id, e);
                    summary.skipped += 1;
                }
            }
        }

        info!(
            "Scanned {} messages: {} completed deals, {} recorded, {} skipped, {} outside date window, {} pairs",
            summary.scanned,
            summary.completed_deals,
            summary.recorded,
            summary.skipped,
            summary.out_of_window,
            aggregator.len()
        );

        let rows = aggregator.report(self.min_trade_count, self.sort_by)?;
        Ok(Analysis { rows, aggregator, summary })
    }
}

/// Convenience wrapper: build a [`Pipeline`] from `config` and run it once.
pub fn analyse<'a, I>(messages: I, config: &Config) -> Result<Analysis>
where
    I: IntoIterator<Item = &'a ChatMessage>,
{
    Pipeline::new(config)?.run(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::message::MessageBody;

    fn msg(date: Option<&str>, text: Option<&str>) -> ChatMessage {
        ChatMessage {
            id: None,
            date: date.map(str::to_string),
            text: text.map(MessageBody::from),
        }
    }

    #[test]
    fn test_empty_primary_coins_fail_before_processing() {
        let config = Config { primary_coins: vec![], ..Config::default() };
        assert!(matches!(Pipeline::new(&config), Err(AnalysisError::Config(_))));
    }

    #[test]
    fn test_skips_and_counts() {
        let config = Config {
            trades_lower_bound: 0,
            start_date: chrono::NaiveDateTime::parse_from_str("2021-02-19T00:00:00", crate::message::DATE_FORMAT).ok(),
            ..Config::default()
        };
        let messages = vec![
            msg(None, Some("Deal completed (BUSD_ETH) +1.0 BUSD\n5 minutes")),
            msg(Some("2021-02-18T10:00:00"), Some("Deal completed (BUSD_ETH) +1.0 BUSD\n5 minutes")),
            msg(Some("2021-02-19T10:00:00"), None),
            msg(Some("2021-02-19T10:00:00"), Some("Deal started (BUSD_ETH)")),
            msg(Some("2021-02-19T10:00:00"), Some("Deal completed without details")),
            msg(Some("2021-02-19T10:00:00"), Some("Deal completed (BUSD_ETH) +1.0 BUSD\n5 weeks")),
            msg(Some("2021-02-19T10:00:00"), Some("Deal completed (BUSD_ETH) +1.0 BUSD\n5 minutes")),
        ];
        let analysis = analyse(&messages, &config).unwrap();
        assert_eq!(
            analysis.summary,
            RunSummary {
                scanned: 7,
                undated: 1,
                out_of_window: 1,
                without_text: 1,
                completed_deals: 3,
                recorded: 1,
                skipped: 2,
            }
        );
        assert_eq!(analysis.rows.len(), 1);
        assert_eq!(analysis.rows[0].trade_count(), 1);
    }

    #[test]
    fn test_nothing_qualifies_gives_empty_report() {
        let config = Config { sort_by: SortBy::AverageProfitPerHour, ..Config::default() };
        let messages = vec![msg(Some("2021-02-19T10:00:00"), Some("hello"))];
        let analysis = analyse(&messages, &config).unwrap();
        assert!(analysis.rows.is_empty());
        assert!(analysis.aggregator.is_empty());
    }
}
