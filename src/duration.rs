use chrono::TimeDelta;

use crate::error::{AnalysisError, Result};

/// Normalize a duration descriptor such as `"Duration: 3 minutes"`.
///
/// The magnitude is the second-to-last space-separated token; the unit is the
/// first of `minute`, `hour`, `day` found anywhere in the descriptor. Negative
/// magnitudes are rejected; zero is accepted.
pub fn parse_duration(descriptor: &str) -> Result<TimeDelta> {
    let unknown = || AnalysisError::UnknownDurationFormat {
        descriptor: descriptor.to_string(),
    };

    let tokens: Vec<&str> = descriptor.split(' ').collect();
    if tokens.len() < 2 {
        return Err(unknown());
    }
    let magnitude: i64 = tokens[tokens.len() - 2].trim().parse().map_err(|_| unknown())?;
    if magnitude < 0 {
        return Err(unknown());
    }

    let delta = if descriptor.contains("minute") {
        TimeDelta::try_minutes(magnitude)
    } else if descriptor.contains("hour") {
        TimeDelta::try_hours(magnitude)
    } else if descriptor.contains("day") {
        TimeDelta::try_days(magnitude)
    } else {
        None
    };
    delta.ok_or_else(unknown)
}
