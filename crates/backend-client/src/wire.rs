//! JSON wire shapes for the analysis service, converted to core types at
//! the client boundary.

use chrono::NaiveDate;
use momentum_signals::default_momentum_signals;
use serde::{Deserialize, Serialize};
use session_core::{
    InstrumentSeries, ModelPerformance, PredictionHorizons, PredictionSet, Signal, SignalFrame,
    WorkbenchError,
};

#[derive(Debug, Serialize)]
pub(crate) struct StockDataRequest {
    pub symbol: String,
    pub timeframe: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SignalRow {
    pub date: NaiveDate,
    pub price: f64,
    #[serde(default)]
    pub short_mavg: Option<f64>,
    #[serde(default)]
    pub long_mavg: Option<f64>,
    #[serde(default)]
    pub positions: Option<i8>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StockDataResponse {
    pub symbol: String,
    pub signals: Vec<SignalRow>,
}

impl StockDataResponse {
    /// Convert the row-oriented payload into a validated series.
    ///
    /// When any row lacks precomputed averages or positions, all signals
    /// are rederived locally from the prices.
    pub fn into_series(self) -> Result<InstrumentSeries, WorkbenchError> {
        let dates: Vec<NaiveDate> = self.signals.iter().map(|r| r.date).collect();
        let prices: Vec<f64> = self.signals.iter().map(|r| r.price).collect();

        let complete = self
            .signals
            .iter()
            .all(|r| r.short_mavg.is_some() && r.long_mavg.is_some() && r.positions.is_some());

        let (short_mavg, long_mavg, positions) = if complete {
            let positions = self
                .signals
                .iter()
                .map(|r| {
                    Signal::try_from(r.positions.unwrap_or(0))
                        .map_err(WorkbenchError::InvalidData)
                })
                .collect::<Result<Vec<Signal>, WorkbenchError>>()?;
            (
                self.signals.iter().map(|r| r.short_mavg.unwrap_or(r.price)).collect(),
                self.signals.iter().map(|r| r.long_mavg.unwrap_or(r.price)).collect(),
                positions,
            )
        } else {
            tracing::debug!(
                "payload for {} has no precomputed signals, deriving locally",
                self.symbol
            );
            let derived = default_momentum_signals(&prices);
            (derived.short_mavg, derived.long_mavg, derived.positions)
        };

        InstrumentSeries::new(self.symbol, prices, dates, short_mavg, long_mavg, positions)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AnalysisRequest<'a> {
    pub symbol: String,
    pub signals: &'a SignalFrame,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnalysisResponse {
    pub response: String,
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest {
    pub message: String,
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PredictResponse {
    pub symbol: String,
    pub current_price: f64,
    pub predictions: PredictionHorizons,
    #[serde(default)]
    pub performance: Option<ModelPerformance>,
    #[serde(default)]
    pub dates: Option<Vec<NaiveDate>>,
    #[serde(default)]
    pub historical: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub predicted: Option<Vec<Option<f64>>>,
}

impl PredictResponse {
    /// Real-series mode requires all three per-date arrays; anything less
    /// is a point-forecast payload.
    pub fn into_prediction(self) -> Result<PredictionSet, WorkbenchError> {
        match (self.dates, self.historical, self.predicted) {
            (Some(dates), Some(historical), Some(predicted)) => PredictionSet::real_series(
                self.symbol,
                self.current_price,
                self.predictions,
                self.performance,
                dates,
                historical,
                predicted,
            ),
            _ => Ok(PredictionSet::PointForecasts {
                symbol: self.symbol,
                current_price: self.current_price,
                horizons: self.predictions,
                performance: self.performance,
            }),
        }
    }
}
