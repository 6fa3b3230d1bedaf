//! Plain-text results table for the console.

use crate::domain::backtest::InstrumentResult;
use crate::domain::metrics::{BacktestSummary, TradeStats};

pub fn format_table(summary: &BacktestSummary, top: usize) -> String {
    let mut output = String::new();
    let rows = summary.top(top);

    output.push_str(&format!(
        "{:<4} {:<12} {:>10} {:>7} {:>9} {:>14}\n",
        "#", "Ticker", "Return %", "Trades", "Win %", "Final Equity"
    ));
    output.push_str(&"-".repeat(61));
    output.push('\n');

    for (i, row) in rows.iter().enumerate() {
        let win_rate = row
            .win_rate_pct
            .map(|w| format!("{:.1}", w))
            .unwrap_or_else(|| "n/a".to_string());
        output.push_str(&format!(
            "{:<4} {:<12} {:>10.2} {:>7} {:>9} {:>14.2}\n",
            i + 1,
            row.ticker,
            row.total_return_pct,
            row.trade_count,
            win_rate,
            row.final_equity
        ));
    }

    if rows.len() < summary.rows.len() {
        output.push_str(&format!(
            "({} more not shown)\n",
            summary.rows.len() - rows.len()
        ));
    }

    output.push('\n');
    match summary.mean_return_pct() {
        Some(mean) => output.push_str(&format!("Mean Return:      {:.2}%\n", mean)),
        None => output.push_str("Mean Return:      n/a\n"),
    }
    output.push_str(&format!(
        "Combined Equity:  {:.2} (from {:.2})\n",
        summary.combined_final_equity(),
        summary.combined_initial_capital()
    ));
    output.push_str(&format!("Total Trades:     {}\n", summary.total_trades()));
    output.push_str(&format!(
        "Instruments:      {} processed, {} skipped\n",
        summary.rows.len(),
        summary.skipped.len()
    ));

    output
}

/// Trade breakdown for one instrument.
pub fn format_trade_stats(result: &InstrumentResult) -> String {
    let mut output = String::new();
    let stats = TradeStats::compute(&result.account);

    output.push_str(&format!("{} ({} bars)\n", result.ticker, result.frame_len));
    output.push_str(&format!(
        "  Trades:          {} won, {} lost, {} flat\n",
        stats.trades_won, stats.trades_lost, stats.trades_breakeven
    ));
    let profit_factor = if stats.profit_factor.is_finite() {
        format!("{:.2}", stats.profit_factor)
    } else {
        "inf".to_string()
    };
    output.push_str(&format!("  Profit Factor:   {}\n", profit_factor));
    output.push_str(&format!(
        "  Avg Win/Loss:    {:.2} / {:.2}\n",
        stats.avg_win, stats.avg_loss
    ));
    output.push_str(&format!(
        "  Largest W/L:     {:.2} / {:.2}\n",
        stats.largest_win, stats.largest_loss
    ));
    output.push_str(&format!(
        "  Max Drawdown:    {:.2}%\n",
        stats.max_drawdown * 100.0
    ));
    output.push_str(&format!(
        "  Avg Holding:     {:.1} bars\n",
        stats.avg_holding_bars
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::Account;
    use crate::domain::universe::{SkipReason, SkippedTicker};

    fn result(ticker: &str, equity: f64) -> InstrumentResult {
        InstrumentResult {
            ticker: ticker.into(),
            account: Account {
                equity,
                ..Account::new(100_000.0)
            },
            frame_len: 10,
        }
    }

    #[test]
    fn table_lists_rows_and_summary() {
        let summary = BacktestSummary::new(
            100_000.0,
            vec![result("AAPL", 110_000.0), result("MSFT", 95_000.0)],
            vec![SkippedTicker {
                ticker: "GONE".into(),
                reason: SkipReason::NoData,
            }],
        );
        let table = format_table(&summary, 20);

        assert!(table.contains("AAPL"));
        assert!(table.contains("10.00"));
        assert!(table.contains("-5.00"));
        assert!(table.contains("n/a"));
        assert!(table.contains("Mean Return:      2.50%"));
        assert!(table.contains("Combined Equity:  205000.00 (from 200000.00)"));
        assert!(table.contains("2 processed, 1 skipped"));
        let aapl = table.find("AAPL").unwrap();
        let msft = table.find("MSFT").unwrap();
        assert!(aapl < msft);
    }

    #[test]
    fn table_truncates_to_top() {
        let summary = BacktestSummary::new(
            100_000.0,
            vec![result("A", 101_000.0), result("B", 102_000.0), result("C", 99_000.0)],
            vec![],
        );
        let table = format_table(&summary, 2);
        assert!(table.contains("(1 more not shown)"));
        assert!(!table.contains(" C "));
    }

    #[test]
    fn trade_stats_block() {
        use crate::domain::execution::Direction;
        use crate::domain::trade::{ExitReason, Trade};
        use chrono::NaiveDate;

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let trade = Trade {
            direction: Direction::Long,
            entry_index: 1,
            exit_index: 3,
            entry_date: date,
            exit_date: date + chrono::Duration::days(2),
            entry_price: 100.0,
            size: 500,
            stop_loss: 98.0,
            take_profit: 104.0,
            exit_price: 104.0,
            exit_reason: ExitReason::TakeProfit,
            return_frac: 0.04,
            pnl: 2000.0,
        };
        let r = InstrumentResult {
            ticker: "AAPL".into(),
            account: Account::new(100_000.0).settle(trade),
            frame_len: 30,
        };

        let text = format_trade_stats(&r);
        assert!(text.starts_with("AAPL (30 bars)"));
        assert!(text.contains("1 won, 0 lost, 0 flat"));
        assert!(text.contains("Profit Factor:   inf"));
        assert!(text.contains("Avg Win/Loss:    2000.00 / 0.00"));
        assert!(text.contains("Max Drawdown:    0.00%"));
        assert!(text.contains("Avg Holding:     2.0 bars"));
    }

    #[test]
    fn table_line_layout() {
        let summary = BacktestSummary::new(100_000.0, vec![result("AAPL", 110_000.0)], vec![]);
        let table = format_table(&summary, 20);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(
            lines[0],
            "#    Ticker         Return %  Trades     Win %   Final Equity"
        );
        assert_eq!(lines[1], "-".repeat(61));
        assert!(lines[2].starts_with("1    AAPL"));
        assert_eq!(lines[3], "");
        assert_eq!(lines.len(), 8);
        assert!(table.ends_with("1 processed, 0 skipped\n"));
    }

    #[test]
    fn table_empty_summary() {
        let summary = BacktestSummary::new(100_000.0, vec![], vec![]);
        let table = format_table(&summary, 20);
        assert!(table.contains("Mean Return:      n/a"));
        assert!(table.contains("0 processed, 0 skipped"));
    }
}
