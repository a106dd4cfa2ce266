//! Export file in, ordered report rows out.

use anyhow::Result;
use approx::assert_abs_diff_eq;
use chrono::TimeDelta;
use deal_history_analyzer::history::load_chat_export;
use deal_history_analyzer::report::{render_json, render_text};
use deal_history_analyzer::{analyse, Config, SortBy};
use serde_json::json;
use std::io::Write;

fn deal(id: i64, pair: &str, profit: &str, duration: &str) -> serde_json::Value {
    json!({
        "id": id,
        "type": "message",
        "date": "2021-02-20T12:00:00",
        "from": "3commas",
        "text": [
            "✅ Deal completed (",
            { "type": "bold", "text": pair },
            format!(")\nProfit: {} BUSD (0.5%)\n", profit),
            format!("Duration: {}", duration)
        ]
    })
}

fn write_export(messages: Vec<serde_json::Value>) -> Result<tempfile::NamedTempFile> {
    let mut file = tempfile::NamedTempFile::new()?;
    let export = json!({ "name": "deals", "type": "personal_chat", "id": 42, "messages": messages });
    file.write_all(serde_json::to_string(&export)?.as_bytes())?;
    Ok(file)
}

#[test]
fn test_ten_identical_deals_produce_one_row() -> Result<()> {
    let messages = (0..10).map(|i| deal(i, "BUSD_ETH", "-1.50", "5 minutes")).collect();
    let file = write_export(messages)?;
    let export = load_chat_export(file.path())?;

    let config = Config { trades_lower_bound: 10, ..Config::default() };
    let analysis = analyse(&export.messages, &config)?;

    assert_eq!(analysis.rows.len(), 1);
    let row = &analysis.rows[0];
    assert_eq!(row.pair, "BUSD_ETH");
    assert_eq!(row.trade_count(), 10);
    assert_eq!(row.average_completion_time, Some(TimeDelta::minutes(5)));
    assert_abs_diff_eq!(row.average_profit.unwrap(), -1.5, epsilon = 1e-12);
    assert_abs_diff_eq!(row.profit_per_hour.unwrap(), -18.0, epsilon = 1e-9);

    assert_eq!(
        render_text(&analysis.rows),
        "BUSD_ETH\ttrades=10;\t avg completion: 0:05:00;\t avg profit: -1.500;\t profit/h: -18.000\n"
    );
    Ok(())
}

#[test]
fn test_mixed_export_filters_and_sorts() -> Result<()> {
    let mut messages = Vec::new();
    let mut id = 0;
    let mut push = |pair: &str, profit: &str, duration: &str, n: usize| {
        for _ in 0..n {
            id += 1;
            messages.push(deal(id, pair, profit, duration));
        }
    };
    push("BUSD_FAST", "+0.10", "5 minutes", 3);
    push("BUSD_SLOW", "+2.00", "1 hour", 3);
    push("BUSD_RARE", "+9.00", "1 minute", 1);
    push("BUSD_BAD", "+1.00", "3 weeks", 4);
    messages.push(json!({ "id": 900, "type": "service", "date": "2021-02-20T12:00:00" }));
    messages.push(json!({ "id": 901, "type": "message", "text": "Deal completed (BUSD_NODATE) +1.0 BUSD\n1 minute" }));
    messages.push(json!({ "id": 902, "type": "message", "date": "2021-02-20T12:00:00", "text": "Deal completed, details unavailable" }));
    let file = write_export(messages)?;
    let export = load_chat_export(file.path())?;

    let by_time = Config { trades_lower_bound: 2, ..Config::default() };
    let rows = analyse(&export.messages, &by_time)?.rows;
    let order: Vec<&str> = rows.iter().map(|r| r.pair.as_str()).collect();
    assert_eq!(order, vec!["BUSD_FAST", "BUSD_SLOW"]);

    let by_ratio = Config {
        trades_lower_bound: 0,
        sort_by: SortBy::AverageProfitPerHour,
        ..Config::default()
    };
    let analysis = analyse(&export.messages, &by_ratio)?;
    let order: Vec<&str> = analysis.rows.iter().map(|r| r.pair.as_str()).collect();
    // 540/h, 2/h, 1.2/h
    assert_eq!(order, vec!["BUSD_RARE", "BUSD_SLOW", "BUSD_FAST"]);
    assert_eq!(analysis.summary.skipped, 5);
    assert_eq!(analysis.summary.undated, 1);

    let json: serde_json::Value = serde_json::from_str(&render_json(&analysis.rows)?)?;
    assert_eq!(json[0]["pair"], "BUSD_RARE");
    assert_eq!(json[0]["trade_count"], 1);
    assert_eq!(json[1]["average_completion_time"], "1:00:00");
    Ok(())
}

#[test]
fn test_date_window_limits_input() -> Result<()> {
    let mut early = deal(1, "BUSD_ETH", "+1.00", "10 minutes");
    early["date"] = json!("2021-02-10T08:00:00");
    let late = deal(2, "BUSD_ETH", "+3.00", "10 minutes");
    let file = write_export(vec![early, late])?;
    let export = load_chat_export(file.path())?;

    let config = Config {
        trades_lower_bound: 0,
        start_date: chrono::NaiveDateTime::parse_from_str("2021-02-19T00:00:00", "%Y-%m-%dT%H:%M:%S").ok(),
        ..Config::default()
    };
    let analysis = analyse(&export.messages, &config)?;
    assert_eq!(analysis.rows.len(), 1);
    assert_eq!(analysis.rows[0].trade_count(), 1);
    assert_abs_diff_eq!(analysis.rows[0].average_profit.unwrap(), 3.0);
    assert_eq!(analysis.summary.out_of_window, 1);
    Ok(())
}
