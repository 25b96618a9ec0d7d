use serde::{Deserialize, Serialize};
use session_core::{ModelPerformance, PredictionSet, SeriesStats};

/// One label/value tile, optionally carrying a signed percent delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
    pub delta: Option<f64>,
}

impl MetricCard {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            delta: None,
        }
    }

    pub fn with_delta(label: impl Into<String>, value: impl Into<String>, delta: f64) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            delta: Some(delta),
        }
    }

    /// Rendered delta, e.g. `+2.34%`.
    pub fn delta_text(&self) -> Option<String> {
        self.delta.map(format_signed_pct)
    }

    pub fn is_positive(&self) -> Option<bool> {
        self.delta.map(|d| d >= 0.0)
    }
}

pub fn format_price(value: f64) -> String {
    format!("${:.2}", value)
}

pub fn format_signed_pct(value: f64) -> String {
    if value >= 0.0 {
        format!("+{:.2}%", value)
    } else {
        format!("{:.2}%", value)
    }
}

/// Metric cards for one instrument series.
pub fn series_stat_cards(stats: &SeriesStats) -> Vec<MetricCard> {
    vec![
        MetricCard::with_delta(
            "Last Price",
            format_price(stats.last_price),
            stats.price_change_pct,
        ),
        MetricCard::new("Trades", stats.trade_count.to_string()),
        MetricCard::new("Buy Signals", stats.buy_signals.to_string()),
        MetricCard::new("Sell Signals", stats.sell_signals.to_string()),
    ]
}

/// Metric cards for model evaluation metrics.
pub fn performance_cards(performance: &ModelPerformance) -> Vec<MetricCard> {
    vec![
        MetricCard::new("MSE", format!("{:.4}", performance.mse)),
        MetricCard::new("MAE", format!("{:.4}", performance.mae)),
        MetricCard::new("R\u{b2}", format!("{:.4}", performance.r2)),
        MetricCard::new("Accuracy", format!("{:.1}%", performance.accuracy * 100.0)),
    ]
}

/// Metric cards for the four forecast horizons, each with its move versus
/// the current price.
pub fn horizon_cards(prediction: &PredictionSet) -> Vec<MetricCard> {
    let current = prediction.current_price();
    let horizons = prediction.horizons();
    let delta = |target: f64| {
        if current != 0.0 {
            (target - current) / current * 100.0
        } else {
            0.0
        }
    };

    vec![
        MetricCard::with_delta(
            "Next Day",
            format_price(horizons.next_day),
            delta(horizons.next_day),
        ),
        MetricCard::with_delta(
            "3 Days",
            format_price(horizons.three_day),
            delta(horizons.three_day),
        ),
        MetricCard::with_delta("1 Week", format_price(horizons.week), delta(horizons.week)),
        MetricCard::with_delta("1 Month", format_price(horizons.month), delta(horizons.month)),
    ]
}
