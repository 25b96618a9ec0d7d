use session_core::Signal;

pub const DEFAULT_SHORT_WINDOW: usize = 5;
pub const DEFAULT_LONG_WINDOW: usize = 20;

/// Rolling mean aligned to the input length.
///
/// The first `window - 1` entries use the expanding mean of the available
/// prefix, so the output can sit alongside the price series it was derived
/// from.
pub fn rolling_mean(data: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || data.is_empty() {
        return vec![];
    }

    let mut result = Vec::with_capacity(data.len());
    let mut sum = 0.0;
    for i in 0..data.len() {
        sum += data[i];
        if i >= window {
            sum -= data[i - window];
        }
        let span = (i + 1).min(window);
        result.push(sum / span as f64);
    }
    result
}

/// Moving averages plus crossover positions for one close series.
#[derive(Debug, Clone)]
pub struct MomentumSignals {
    pub short_mavg: Vec<f64>,
    pub long_mavg: Vec<f64>,
    pub positions: Vec<Signal>,
}

/// Crossover strategy: long while the short mean sits above the long mean.
///
/// A position marker fires only on the bar where the state flips: `Buy`
/// when the short mean crosses above, `Sell` when it crosses back below,
/// `Hold` everywhere else. The first `short_window` bars are warm-up and
/// never carry a state.
pub fn momentum_signals(closes: &[f64], short_window: usize, long_window: usize) -> MomentumSignals {
    let short_mavg = rolling_mean(closes, short_window);
    let long_mavg = rolling_mean(closes, long_window);

    let mut state = vec![0i8; closes.len()];
    for i in short_window..closes.len() {
        state[i] = if short_mavg[i] > long_mavg[i] { 1 } else { 0 };
    }

    let mut positions = Vec::with_capacity(closes.len());
    for i in 0..closes.len() {
        let diff = if i == 0 { 0 } else { state[i] - state[i - 1] };
        positions.push(match diff {
            1 => Signal::Buy,
            -1 => Signal::Sell,
            _ => Signal::Hold,
        });
    }

    MomentumSignals {
        short_mavg,
        long_mavg,
        positions,
    }
}

/// `momentum_signals` with the strategy's standard 5/20 windows.
pub fn default_momentum_signals(closes: &[f64]) -> MomentumSignals {
    momentum_signals(closes, DEFAULT_SHORT_WINDOW, DEFAULT_LONG_WINDOW)
}
