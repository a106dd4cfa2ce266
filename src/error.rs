//! Error types for deal extraction and pair aggregation

use thiserror::Error;

/// Errors raised by the extractor and the aggregator.
///
/// `NoMatch`, `InvalidProfit` and `UnknownDurationFormat` are per-message
/// conditions: the pipeline logs them at debug level and moves on.
/// `EmptyAccumulation` and `MissingPrerequisite` mean the statistics were
/// computed out of sequence and abort the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// "Deal completed" was present but the pair or profit pattern was not
    #[error("no {field} match in completed deal message: {text:?}")]
    NoMatch {
        /// Which field failed to match ("pair" or "profit")
        field: &'static str,
        /// Message text the patterns were evaluated against
        text: String,
    },

    /// Captured profit figure did not parse as a number
    #[error("invalid profit value {value:?}")]
    InvalidProfit {
        /// Raw captured value, sign included
        value: String,
    },

    /// Duration descriptor carried no known unit or no integer magnitude
    #[error("Unknown time format '{descriptor}'")]
    UnknownDurationFormat {
        /// Raw descriptor as found in the message
        descriptor: String,
    },

    /// Averages requested for a pair with no recorded trades
    #[error("pair {pair} has no recorded {series}")]
    EmptyAccumulation {
        /// Pair identifier
        pair: String,
        /// Series that was empty ("durations" or "profits")
        series: &'static str,
    },

    /// Summed or averaged completion time left the representable range
    #[error("pair {pair}: completion time out of range")]
    DurationOverflow {
        /// Pair identifier
        pair: String,
    },

    /// Ratio requested before both averages were computed
    #[error("pair {pair}: must have both average_profit and average_completion_time for calculating the ratio")]
    MissingPrerequisite {
        /// Pair identifier
        pair: String,
    },

    /// Configuration rejected before processing started
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AnalysisError {
    /// True for errors that should only cause the current message to be skipped.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalysisError::NoMatch { .. }
                | AnalysisError::InvalidProfit { .. }
                | AnalysisError::UnknownDurationFormat { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_split() {
        assert!(AnalysisError::NoMatch { field: "pair", text: String::new() }.is_recoverable());
        assert!(AnalysisError::UnknownDurationFormat { descriptor: "5 weeks".into() }.is_recoverable());
        assert!(!AnalysisError::MissingPrerequisite { pair: "BUSD_ETH".into() }.is_recoverable());
        assert!(!AnalysisError::Config("empty".into()).is_recoverable());
    }

    #[test]
    fn test_unknown_duration_message() {
        let err = AnalysisError::UnknownDurationFormat { descriptor: "5 weeks".into() };
        assert_eq!(err.to_string(), "Unknown time format '5 weeks'");
    }
}
