use anyhow::Context;
use chrono::NaiveDateTime;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::AnalysisError;

#[derive(Parser, Debug)]
#[command(author, version, about = "Per-pair performance report from an exported deal notification chat")]
pub struct Args {
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,

    /// Chat export to analyse; overrides chat_history_path from the config file
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Drop pairs with fewer trades than this (0 keeps every pair)
    #[arg(long)]
    pub min_trades: Option<usize>,

    #[arg(long, value_enum)]
    pub sort_by: Option<SortBy>,

    /// Comma separated primary coins, e.g. BUSD,USDT
    #[arg(long, value_delimiter = ',')]
    pub coins: Option<Vec<String>>,

    /// Also append log output to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[value(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortBy {
    /// Fastest completing pairs first
    AverageCompletionTime,
    /// Highest profit per hour first
    AverageProfitPerHour,
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortBy::AverageCompletionTime => write!(f, "SortBy.AVERAGE_COMPLETION_TIME"),
            SortBy::AverageProfitPerHour => write!(f, "SortBy.AVERAGE_PROFIT_PER_HOUR"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_chat_history_path")]
    pub chat_history_path: PathBuf,
    /// Pairs with fewer completed deals are left out of the report. 0 = no filter.
    #[serde(default = "default_trades_lower_bound")]
    pub trades_lower_bound: usize,
    /// Inclusive lower bound on message date, `%Y-%m-%dT%H:%M:%S`.
    #[serde(default)]
    pub start_date: Option<NaiveDateTime>,
    /// Inclusive upper bound on message date.
    #[serde(default)]
    pub end_date: Option<NaiveDateTime>,
    /// Base coins recognised in pair names, e.g. ["BUSD", "USDT"].
    #[serde(default = "default_primary_coins")]
    pub primary_coins: Vec<String>,
    #[serde(default = "default_sort_by")]
    pub sort_by: SortBy,
}

fn default_chat_history_path() -> PathBuf {
    PathBuf::from("resources/chat_export.json")
}

fn default_trades_lower_bound() -> usize {
    10
}

fn default_primary_coins() -> Vec<String> {
    vec!["BUSD".to_string()]
}

fn default_sort_by() -> SortBy {
    SortBy::AverageCompletionTime
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chat_history_path: default_chat_history_path(),
            trades_lower_bound: default_trades_lower_bound(),
            start_date: None,
            end_date: None,
            primary_coins: default_primary_coins(),
            sort_by: default_sort_by(),
        }
    }
}

impl Config {
    /// Reads `path` (TOML for `.toml`, JSON otherwise). A missing file is
    /// created with the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            let is_toml = path.extension().map_or(false, |ext| ext == "toml");
            let config = if is_toml {
                toml::from_str(&content)
                    .with_context(|| format!("Failed to parse TOML config {}", path.display()))?
            } else {
                serde_json::from_str(&content)
                    .with_context(|| format!("Failed to parse JSON config {}", path.display()))?
            };
            Ok(config)
        } else {
            let config = Config::default();
            let content = serde_json::to_string_pretty(&config)?;
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write default config {}", path.display()))?;
            Ok(config)
        }
    }

    /// Command line values take precedence over the file.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(input) = &args.input {
            self.chat_history_path = input.clone();
        }
        if let Some(min) = args.min_trades {
            self.trades_lower_bound = min;
        }
        if let Some(sort_by) = args.sort_by {
            self.sort_by = sort_by;
        }
        if let Some(coins) = &args.coins {
            self.primary_coins = coins.iter().map(|c| c.trim().to_uppercase()).collect();
        }
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.primary_coins.is_empty() {
            return Err(AnalysisError::Config(
                "No primary coins configured. Add primary_coins to config (e.g. [\"BUSD\", \"USDT\"])".into(),
            ));
        }
        if let Some(blank) = self.primary_coins.iter().find(|c| c.trim().is_empty()) {
            return Err(AnalysisError::Config(format!("invalid primary coin {:?}", blank)));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(AnalysisError::Config(format!(
                    "start_date {} is after end_date {}",
                    start, end
                )));
            }
        }
        Ok(())
    }
}
