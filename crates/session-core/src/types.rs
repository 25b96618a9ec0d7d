use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::WorkbenchError;

/// Per-bar trading signal derived from the moving-average crossover.
///
/// Wire representation is the integer -1 / 0 / 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Signal {
    Sell,
    Hold,
    Buy,
}

impl From<Signal> for i8 {
    fn from(signal: Signal) -> i8 {
        match signal {
            Signal::Sell => -1,
            Signal::Hold => 0,
            Signal::Buy => 1,
        }
    }
}

impl TryFrom<i8> for Signal {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Signal::Sell),
            0 => Ok(Signal::Hold),
            1 => Ok(Signal::Buy),
            other => Err(format!("signal value out of range: {}", other)),
        }
    }
}

/// Chart timeframe selection, mirroring the UI's fixed choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1D")]
    Day1,
    #[serde(rename = "1W")]
    Week1,
    #[serde(rename = "1M")]
    Month1,
    #[default]
    #[serde(rename = "3M")]
    Month3,
    #[serde(rename = "6M")]
    Month6,
    #[serde(rename = "1Y")]
    Year1,
    #[serde(rename = "5Y")]
    Year5,
}

impl Timeframe {
    pub const ALL: [Timeframe; 7] = [
        Timeframe::Day1,
        Timeframe::Week1,
        Timeframe::Month1,
        Timeframe::Month3,
        Timeframe::Month6,
        Timeframe::Year1,
        Timeframe::Year5,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Day1 => "1D",
            Timeframe::Week1 => "1W",
            Timeframe::Month1 => "1M",
            Timeframe::Month3 => "3M",
            Timeframe::Month6 => "6M",
            Timeframe::Year1 => "1Y",
            Timeframe::Year5 => "5Y",
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Timeframe {
    type Err = WorkbenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timeframe::ALL
            .iter()
            .copied()
            .find(|tf| tf.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| WorkbenchError::InvalidData(format!("unknown timeframe: {}", s)))
    }
}

/// Historical price series for one instrument with derived momentum signals.
///
/// All five vectors are the same length, dates are strictly ascending.
/// Instances are validated on construction, never mutated afterwards, and
/// replaced wholesale on re-fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentSeries {
    pub symbol: String,
    pub prices: Vec<f64>,
    pub dates: Vec<NaiveDate>,
    pub short_mavg: Vec<f64>,
    pub long_mavg: Vec<f64>,
    pub positions: Vec<Signal>,
}

impl InstrumentSeries {
    pub fn new(
        symbol: impl Into<String>,
        prices: Vec<f64>,
        dates: Vec<NaiveDate>,
        short_mavg: Vec<f64>,
        long_mavg: Vec<f64>,
        positions: Vec<Signal>,
    ) -> Result<Self, WorkbenchError> {
        let n = prices.len();
        if n == 0 {
            return Err(WorkbenchError::InvalidData("empty instrument series".into()));
        }
        if dates.len() != n || short_mavg.len() != n || long_mavg.len() != n || positions.len() != n
        {
            return Err(WorkbenchError::InvalidData(format!(
                "misaligned series arrays: prices={} dates={} short={} long={} positions={}",
                n,
                dates.len(),
                short_mavg.len(),
                long_mavg.len(),
                positions.len()
            )));
        }
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(WorkbenchError::InvalidData(
                "series dates are not strictly ascending".into(),
            ));
        }

        Ok(Self {
            symbol: symbol.into(),
            prices,
            dates,
            short_mavg,
            long_mavg,
            positions,
        })
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// The four aligned arrays submitted to the analysis service.
    pub fn signal_frame(&self) -> SignalFrame {
        SignalFrame {
            price: self.prices.clone(),
            short_mavg: self.short_mavg.clone(),
            long_mavg: self.long_mavg.clone(),
            positions: self.positions.clone(),
        }
    }

    /// Summary statistics displayed as metric cards.
    pub fn stats(&self) -> SeriesStats {
        let first = self.prices[0];
        let last = self.prices[self.len() - 1];
        SeriesStats {
            trade_count: self.positions.iter().filter(|p| **p != Signal::Hold).count(),
            buy_signals: self.positions.iter().filter(|p| **p == Signal::Buy).count(),
            sell_signals: self.positions.iter().filter(|p| **p == Signal::Sell).count(),
            price_change_pct: if first != 0.0 {
                (last - first) / first * 100.0
            } else {
                0.0
            },
            last_price: last,
        }
    }
}

/// Aligned signal arrays sent with an analysis request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalFrame {
    pub price: Vec<f64>,
    pub short_mavg: Vec<f64>,
    pub long_mavg: Vec<f64>,
    pub positions: Vec<Signal>,
}

/// Summary statistics over one instrument series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SeriesStats {
    pub trade_count: usize,
    pub buy_signals: usize,
    pub sell_signals: usize,
    pub price_change_pct: f64,
    pub last_price: f64,
}

/// Point forecasts for the four supported horizons.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PredictionHorizons {
    pub next_day: f64,
    pub three_day: f64,
    pub week: f64,
    pub month: f64,
}

/// Model evaluation metrics reported by the prediction service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModelPerformance {
    pub mse: f64,
    pub mae: f64,
    pub r2: f64,
    pub accuracy: f64,
}

/// Output of the prediction service.
///
/// The two variants drive the two synthesizer modes: `RealSeries` carries
/// full per-date historical/predicted arrays, `PointForecasts` only the
/// four horizon values (the chart history is then synthesized).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PredictionSet {
    RealSeries {
        symbol: String,
        current_price: f64,
        horizons: PredictionHorizons,
        performance: Option<ModelPerformance>,
        dates: Vec<NaiveDate>,
        historical: Vec<Option<f64>>,
        predicted: Vec<Option<f64>>,
    },
    PointForecasts {
        symbol: String,
        current_price: f64,
        horizons: PredictionHorizons,
        performance: Option<ModelPerformance>,
    },
}

impl PredictionSet {
    /// Build the real-series variant, validating array alignment.
    pub fn real_series(
        symbol: impl Into<String>,
        current_price: f64,
        horizons: PredictionHorizons,
        performance: Option<ModelPerformance>,
        dates: Vec<NaiveDate>,
        historical: Vec<Option<f64>>,
        predicted: Vec<Option<f64>>,
    ) -> Result<Self, WorkbenchError> {
        let n = dates.len();
        if historical.len() != n || predicted.len() != n {
            return Err(WorkbenchError::InvalidData(format!(
                "misaligned prediction arrays: dates={} historical={} predicted={}",
                n,
                historical.len(),
                predicted.len()
            )));
        }
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(WorkbenchError::InvalidData(
                "prediction dates are not strictly ascending".into(),
            ));
        }

        Ok(PredictionSet::RealSeries {
            symbol: symbol.into(),
            current_price,
            horizons,
            performance,
            dates,
            historical,
            predicted,
        })
    }

    pub fn symbol(&self) -> &str {
        match self {
            PredictionSet::RealSeries { symbol, .. } => symbol,
            PredictionSet::PointForecasts { symbol, .. } => symbol,
        }
    }

    pub fn current_price(&self) -> f64 {
        match self {
            PredictionSet::RealSeries { current_price, .. } => *current_price,
            PredictionSet::PointForecasts { current_price, .. } => *current_price,
        }
    }

    pub fn horizons(&self) -> &PredictionHorizons {
        match self {
            PredictionSet::RealSeries { horizons, .. } => horizons,
            PredictionSet::PointForecasts { horizons, .. } => horizons,
        }
    }

    pub fn performance(&self) -> Option<&ModelPerformance> {
        match self {
            PredictionSet::RealSeries { performance, .. } => performance.as_ref(),
            PredictionSet::PointForecasts { performance, .. } => performance.as_ref(),
        }
    }
}

/// One renderable point of the merged historical/forecast chart series.
///
/// Produced only by the forecast synthesizer and never mutated afterwards.
/// A point is either a past observation (`historical` set) or a forecast
/// (`predicted`, and usually `upper`/`lower`, set) — not both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub historical: Option<f64>,
    pub predicted: Option<f64>,
    pub upper: Option<f64>,
    pub lower: Option<f64>,
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One message of a session conversation. Insertion order is meaningful;
/// the first message of every session is the system-authored narrative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Narrative and session identity issued by the analysis service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReply {
    pub narrative: String,
    pub session_id: String,
}

/// One user-initiated analysis lifecycle: the fetched series, the narrative
/// that seeded the conversation, and the conversation itself. Replaced as a
/// whole by each new analysis; never resumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSession {
    pub session_id: String,
    pub symbol: String,
    pub timeframe: Timeframe,
    pub series: InstrumentSeries,
    pub narrative: String,
    pub messages: Vec<ChatMessage>,
}

impl AnalysisSession {
    /// Create a session seeded with the narrative as its single system
    /// message.
    pub fn seeded(
        reply: AnalysisReply,
        symbol: impl Into<String>,
        timeframe: Timeframe,
        series: InstrumentSeries,
    ) -> Self {
        let messages = vec![ChatMessage::system(reply.narrative.clone())];
        Self {
            session_id: reply.session_id,
            symbol: symbol.into(),
            timeframe,
            series,
            narrative: reply.narrative,
            messages,
        }
    }
}
