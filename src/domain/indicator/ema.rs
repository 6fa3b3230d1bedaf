//! Exponential Moving Average of a value series.
//!
//! alpha = 2/(span+1). Both modes produce a value for every input, the first
//! being the first input itself.
//!
//! Adjusted: EMA[t] = sum((1-a)^i * x[t-i]) / sum((1-a)^i), i = 0..=t
//! Recursive: EMA[0] = x[0], EMA[t] = a*x[t] + (1-a)*EMA[t-1]

use super::EmaMode;

pub fn calculate_ema(values: &[f64], span: usize, mode: EmaMode) -> Vec<f64> {
    if span == 0 || values.is_empty() {
        return Vec::new();
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let decay = 1.0 - alpha;
    let mut out = Vec::with_capacity(values.len());

    match mode {
        EmaMode::Adjusted => {
            let mut num = 0.0;
            let mut den = 0.0;
            for &x in values {
                num = x + decay * num;
                den = 1.0 + decay * den;
                out.push(num / den);
            }
        }
        EmaMode::Recursive => {
            let mut ema = values[0];
            for &x in values {
                ema = alpha * x + decay * ema;
                out.push(ema);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_empty_values() {
        assert!(calculate_ema(&[], 3, EmaMode::Adjusted).is_empty());
    }

    #[test]
    fn ema_span_0() {
        assert!(calculate_ema(&[10.0, 20.0], 0, EmaMode::Recursive).is_empty());
    }

    #[test]
    fn ema_aligned_to_input() {
        let out = calculate_ema(&[10.0, 20.0, 30.0, 40.0], 3, EmaMode::Adjusted);
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn ema_first_value_is_input() {
        for mode in [EmaMode::Adjusted, EmaMode::Recursive] {
            let out = calculate_ema(&[42.0, 50.0], 10, mode);
            assert!((out[0] - 42.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn ema_span_1_tracks_input() {
        for mode in [EmaMode::Adjusted, EmaMode::Recursive] {
            let out = calculate_ema(&[10.0, 20.0, 30.0], 1, mode);
            assert!((out[1] - 20.0).abs() < 1e-12);
            assert!((out[2] - 30.0).abs() < 1e-12);
        }
    }

    #[test]
    fn ema_recursive_calculation() {
        let out = calculate_ema(&[10.0, 20.0, 30.0], 3, EmaMode::Recursive);
        let k = 0.5;
        let e1 = 20.0 * k + 10.0 * (1.0 - k);
        let e2 = 30.0 * k + e1 * (1.0 - k);
        assert!((out[1] - e1).abs() < f64::EPSILON);
        assert!((out[2] - e2).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_adjusted_calculation() {
        let out = calculate_ema(&[10.0, 20.0, 30.0], 3, EmaMode::Adjusted);
        // decay = 0.5
        let e1 = (20.0 + 0.5 * 10.0) / (1.0 + 0.5);
        let e2 = (30.0 + 0.5 * 20.0 + 0.25 * 10.0) / (1.0 + 0.5 + 0.25);
        assert!((out[1] - e1).abs() < 1e-12);
        assert!((out[2] - e2).abs() < 1e-12);
    }

    #[test]
    fn ema_adjusted_weights_recent_more_than_recursive() {
        // The adjusted form forgets the seed faster early on.
        let values = [10.0, 20.0, 20.0, 20.0];
        let adj = calculate_ema(&values, 5, EmaMode::Adjusted);
        let rec = calculate_ema(&values, 5, EmaMode::Recursive);
        assert!(adj[3] > rec[3]);
        assert!(adj[3] < 20.0);
    }

    #[test]
    fn ema_equal_values() {
        for mode in [EmaMode::Adjusted, EmaMode::Recursive] {
            let out = calculate_ema(&[100.0; 6], 4, mode);
            for v in out {
                assert!((v - 100.0).abs() < 1e-12);
            }
        }
    }
}
