//! Account state and equity tracking for one instrument's backtest.

use chrono::NaiveDate;

use super::trade::Trade;

/// Equity right after a trade settles, dated by that trade's exit.
#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

/// Running equity plus the trade log. Each settled trade produces the next
/// account value; equity is never reset within a scan.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub initial_capital: f64,
    pub equity: f64,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
}

impl Account {
    pub fn new(initial_capital: f64) -> Self {
        Account {
            initial_capital,
            equity: initial_capital,
            trades: Vec::new(),
            equity_curve: Vec::new(),
        }
    }

    /// Realize a trade's P&L and append it to the log. Trades settle in entry
    /// order, so under overlapping positions `equity_curve` dates can go
    /// backwards.
    pub fn settle(mut self, trade: Trade) -> Self {
        self.equity += trade.pnl;
        self.equity_curve.push(EquityPoint {
            date: trade.exit_date,
            equity: self.equity,
        });
        self.trades.push(trade);
        self
    }

    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }

    pub fn total_return_pct(&self) -> f64 {
        if self.initial_capital > 0.0 {
            (self.equity - self.initial_capital) / self.initial_capital * 100.0
        } else {
            0.0
        }
    }

    /// None when no trade was taken.
    pub fn win_rate_pct(&self) -> Option<f64> {
        if self.trades.is_empty() {
            return None;
        }
        let wins = self.trades.iter().filter(|t| t.is_win()).count();
        Some(wins as f64 / self.trades.len() as f64 * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::execution::Direction;
    use crate::domain::trade::ExitReason;

    fn trade(pnl: f64, day: u32) -> Trade {
        Trade {
            direction: Direction::Long,
            entry_index: 0,
            exit_index: 1,
            entry_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            exit_date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            entry_price: 100.0,
            size: 10,
            stop_loss: 98.0,
            take_profit: 104.0,
            exit_price: 100.0 + pnl / 10.0,
            exit_reason: ExitReason::EndOfData,
            return_frac: pnl / 1000.0,
            pnl,
        }
    }

    #[test]
    fn new_account() {
        let account = Account::new(100_000.0);
        assert!((account.equity - 100_000.0).abs() < f64::EPSILON);
        assert!((account.initial_capital - 100_000.0).abs() < f64::EPSILON);
        assert!(account.trades.is_empty());
        assert!(account.equity_curve.is_empty());
    }

    #[test]
    fn settle_adds_pnl_in_order() {
        let account = Account::new(100_000.0)
            .settle(trade(500.0, 2))
            .settle(trade(-200.0, 3));

        assert!((account.equity - 100_300.0).abs() < 1e-9);
        assert_eq!(account.trade_count(), 2);
        assert_eq!(account.equity_curve.len(), 2);
        assert!((account.equity_curve[0].equity - 100_500.0).abs() < 1e-9);
        assert!((account.equity_curve[1].equity - 100_300.0).abs() < 1e-9);
        assert_eq!(
            account.equity_curve[1].date,
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()
        );
    }

    #[test]
    fn total_return_pct() {
        let account = Account::new(100_000.0).settle(trade(5_000.0, 2));
        assert!((account.total_return_pct() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn unchanged_equity_is_zero_return() {
        let account = Account::new(100_000.0);
        assert_eq!(account.total_return_pct(), 0.0);
    }

    #[test]
    fn win_rate_none_without_trades() {
        assert_eq!(Account::new(100_000.0).win_rate_pct(), None);
    }

    #[test]
    fn win_rate_counts_positive_pnl_only() {
        let account = Account::new(100_000.0)
            .settle(trade(100.0, 2))
            .settle(trade(0.0, 3))
            .settle(trade(-50.0, 4))
            .settle(trade(20.0, 5));
        assert!((account.win_rate_pct().unwrap() - 50.0).abs() < 1e-9);
    }
}
