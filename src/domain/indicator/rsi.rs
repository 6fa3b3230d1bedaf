//! RSI-style oscillator over simple moving averages of gains and losses.
//!
//! change[t] = close[t] - close[t-1]; gain = max(change, 0), loss = max(-change, 0).
//! avg_gain/avg_loss = mean of the last `window` gains/losses.
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: first `window` bars are None (need `window` changes).

pub fn calculate_rsi(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut values = vec![None; closes.len()];
    if window == 0 || closes.len() <= window {
        return values;
    }

    let mut gains = vec![0.0; closes.len()];
    let mut losses = vec![0.0; closes.len()];
    for i in 1..closes.len() {
        let change = closes[i] - closes[i - 1];
        gains[i] = if change > 0.0 { change } else { 0.0 };
        losses[i] = if change < 0.0 { -change } else { 0.0 };
    }

    for i in window..closes.len() {
        let start = i + 1 - window;
        let avg_gain = gains[start..=i].iter().sum::<f64>() / window as f64;
        let avg_loss = losses[start..=i].iter().sum::<f64>() / window as f64;
        values[i] = Some(oscillator(avg_gain, avg_loss));
    }

    values
}

fn oscillator(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
