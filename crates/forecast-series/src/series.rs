use chrono::{Duration, Local, NaiveDate};
use rand::Rng;
use session_core::{ChartPoint, PredictionSet};

/// Trailing days of synthetic history generated in point-forecast mode.
pub const HISTORY_DAYS: usize = 30;

/// Synthetic walk parameters, all relative to the current price.
const SEED_FRACTION: f64 = 0.9;
const STEP_VOLATILITY_FRACTION: f64 = 0.01;
const DRIFT_OFFSET: f64 = 0.45;

/// Confidence band half-width per horizon, widening with distance.
const NEXT_DAY_BAND: f64 = 0.05;
const THREE_DAY_BAND: f64 = 0.05;
const WEEK_BAND: f64 = 0.07;
const MONTH_BAND: f64 = 0.15;

/// Confidence band half-width applied to real predicted values.
const REAL_SERIES_BAND: f64 = 0.05;

/// Day increments between consecutive forecast points. Applied to a running
/// date cursor, so the offsets compound: today+1, +3, +7, +30. Carried over
/// from the original horizon semantics; switching to independent offsets
/// from "today" would be a change of product behavior.
const HORIZON_STEPS: [i64; 4] = [1, 2, 4, 23];

/// Build the renderable chart series for a prediction.
///
/// Pure apart from the injected RNG: the same prediction, `today` and seed
/// always produce the same series. In point-forecast mode the trailing
/// history is a synthetic random walk, generated strictly for visual
/// continuity — those values carry no analytical meaning.
pub fn build_series(
    prediction: &PredictionSet,
    today: NaiveDate,
    rng: &mut impl Rng,
) -> Vec<ChartPoint> {
    match prediction {
        PredictionSet::RealSeries {
            dates,
            historical,
            predicted,
            ..
        } => real_series_points(dates, historical, predicted),
        PredictionSet::PointForecasts {
            current_price,
            horizons,
            ..
        } => {
            let mut points = synthetic_history(*current_price, today, rng);
            points.extend(forecast_points(horizons, today));
            points
        }
    }
}

/// [`build_series`] anchored at the local calendar date with a thread RNG.
pub fn build_series_today(prediction: &PredictionSet) -> Vec<ChartPoint> {
    build_series(prediction, Local::now().date_naive(), &mut rand::thread_rng())
}

fn real_series_points(
    dates: &[NaiveDate],
    historical: &[Option<f64>],
    predicted: &[Option<f64>],
) -> Vec<ChartPoint> {
    dates
        .iter()
        .zip(historical.iter().zip(predicted.iter()))
        .map(|(date, (historical, predicted))| ChartPoint {
            date: *date,
            historical: *historical,
            predicted: *predicted,
            upper: predicted.map(|p| p * (1.0 + REAL_SERIES_BAND)),
            lower: predicted.map(|p| p * (1.0 - REAL_SERIES_BAND)),
        })
        .collect()
}

fn synthetic_history(
    current_price: f64,
    today: NaiveDate,
    rng: &mut impl Rng,
) -> Vec<ChartPoint> {
    let volatility = current_price * STEP_VOLATILITY_FRACTION;
    let mut price = current_price * SEED_FRACTION;

    let mut points = Vec::with_capacity(HISTORY_DAYS + HORIZON_STEPS.len());
    for i in 0..HISTORY_DAYS {
        points.push(ChartPoint {
            date: today - Duration::days((HISTORY_DAYS - i) as i64),
            historical: Some(price),
            predicted: None,
            upper: None,
            lower: None,
        });
        // Uniform step with a slight downward bias.
        price += (rng.gen::<f64>() - DRIFT_OFFSET) * volatility;
    }
    points
}

fn forecast_points(
    horizons: &session_core::PredictionHorizons,
    today: NaiveDate,
) -> Vec<ChartPoint> {
    let values = [
        (horizons.next_day, NEXT_DAY_BAND),
        (horizons.three_day, THREE_DAY_BAND),
        (horizons.week, WEEK_BAND),
        (horizons.month, MONTH_BAND),
    ];

    let mut cursor = today;
    values
        .iter()
        .zip(HORIZON_STEPS.iter())
        .map(|((value, band), step)| {
            cursor = cursor + Duration::days(*step);
            ChartPoint {
                date: cursor,
                historical: None,
                predicted: Some(*value),
                upper: Some(value * (1.0 + band)),
                lower: Some(value * (1.0 - band)),
            }
        })
        .collect()
}
