//! Per-pair performance report built from an exported deal notification chat.
//!
//! Messages containing "Deal completed" are turned into [`TradeEvent`]s by the
//! [`EventExtractor`], grouped per pair by the [`PairAggregator`], and reported
//! with average completion time, average profit and profit per hour.

pub mod aggregator;
pub mod config;
pub mod duration;
pub mod error;
pub mod extractor;
pub mod history;
pub mod message;
pub mod pipeline;
pub mod report;

pub use aggregator::{PairAggregator, PairStats};
pub use config::{Config, SortBy};
pub use error::AnalysisError;
pub use extractor::{EventExtractor, TradeEvent};
pub use message::{ChatExport, ChatMessage, MessageBody, PlainText};
pub use pipeline::{analyse, Analysis, Pipeline, RunSummary};
