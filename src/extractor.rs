//! Completed-deal detection.
//!
//! A message qualifies when it contains `"Deal completed"`. The pair is the
//! first `<COIN>_<TOKEN>` directly followed by `)`, and the profit is the first
//! signed decimal directly followed by ` <COIN>`.

use regex::Regex;

use crate::error::{AnalysisError, Result};
use crate::message::PlainText;

pub const DEAL_COMPLETED_MARKER: &str = "Deal completed";

/// One detected completed deal, fields still in their raw textual form.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeEvent {
    pub pair: String,
    /// Sign-prefixed decimal, e.g. `"-1.23456789"` or `" 0.5"`.
    pub profit: String,
    /// Raw duration descriptor, e.g. `"Duration: 3 minutes"`.
    pub duration: String,
}

#[derive(Debug, Clone)]
pub struct EventExtractor {
    pair_re: Regex,
    profit_re: Regex,
}

impl EventExtractor {
    pub fn new(primary_coins: &[String]) -> Result<Self> {
        if primary_coins.is_empty() {
            return Err(AnalysisError::Config("primary_coins must not be empty".into()));
        }
        if let Some(blank) = primary_coins.iter().find(|c| c.trim().is_empty()) {
            return Err(AnalysisError::Config(format!("invalid primary coin {:?}", blank)));
        }

        let coins = primary_coins
            .iter()
            .map(|c| regex::escape(c.trim()))
            .collect::<Vec<_>>()
            .join("|");
        let pair_re = Regex::new(&format!(r"((?:{})_\w{{1,10}})\)", coins))
            .map_err(|e| AnalysisError::Config(format!("pair pattern: {}", e)))?;
        let profit_re = Regex::new(&format!(r"([+\- ]\d+\.\d{{0,8}}) (?:{})", coins))
            .map_err(|e| AnalysisError::Config(format!("profit pattern: {}", e)))?;

        Ok(Self { pair_re, profit_re })
    }

    /// `Ok(None)` for messages that are not completed deals; no pattern is
    /// evaluated in that case.
    pub fn extract<B: PlainText + ?Sized>(&self, body: &B) -> Result<Option<TradeEvent>> {
        let text = body.as_plain_text();
        if !text.contains(DEAL_COMPLETED_MARKER) {
            return Ok(None);
        }

        let pair = self
            .pair_re
            .captures(&text)
            .and_then(|c| c.get(1))
            .ok_or_else(|| AnalysisError::NoMatch { field: "pair", text: text.clone() })?
            .as_str()
            .to_string();
        let profit = self
            .profit_re
            .captures(&text)
            .and_then(|c| c.get(1))
            .ok_or_else(|| AnalysisError::NoMatch { field: "profit", text: text.clone() })?
            .as_str()
            .to_string();

        Ok(Some(TradeEvent {
            pair,
            profit,
            duration: body.trailing_text().to_string(),
        }))
    }
}
