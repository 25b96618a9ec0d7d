//! Terminal front end for the ChartMind workbench.
//!
//! Runs one analysis, then an interactive loop: plain lines are chat
//! turns, slash commands drive the rest of the workflow.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Result;
use backend_client::BackendClient;
use forecast_series::build_series_today;
use presentation::{
    horizon_cards, performance_cards, render_message, series_stat_cards, MetricCard,
};
use recent_symbols::RecentSymbols;
use session_controller::{Phase, SessionController};
use session_core::Timeframe;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let symbol = args.next().unwrap_or_else(|| "NVDA".to_string());
    let timeframe = match args.next() {
        Some(tf) => tf.parse::<Timeframe>()?,
        None => Timeframe::default(),
    };

    let backend = Arc::new(BackendClient::with_defaults());
    let controller = SessionController::new(backend.clone(), RecentSymbols::open_default());

    run_analysis(&controller, &symbol, timeframe).await;

    println!();
    println!("commands: /analyze <symbol> [timeframe], /predict, /recent, /reset, /clear, /quit");
    println!("anything else is sent to the analyst as a chat message");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        match line.split_whitespace().next() {
            None => continue,
            Some("/quit") => break,
            Some("/recent") => {
                let recent = controller.recent_symbols().await;
                if recent.is_empty() {
                    println!("no recent symbols");
                } else {
                    println!("{}", recent.join(", "));
                }
            }
            Some("/analyze") => {
                let mut parts = line.split_whitespace().skip(1);
                let symbol = parts.next().unwrap_or_default().to_string();
                let timeframe = parts
                    .next()
                    .and_then(|tf| tf.parse::<Timeframe>().ok())
                    .unwrap_or_default();
                run_analysis(&controller, &symbol, timeframe).await;
            }
            Some("/predict") => run_prediction(&backend, &controller).await,
            Some("/reset") => match controller.reset().await {
                Ok(()) => println!("prediction model reset"),
                Err(e) => eprintln!("reset failed: {}", e),
            },
            Some("/clear") => match controller.clear_remote_session().await {
                Ok(()) => println!("remote session cleared"),
                Err(e) => eprintln!("clear failed: {}", e),
            },
            Some(_) => {
                match controller.send_message(line).await {
                    Some(reply) => println!("assistant> {}", reply),
                    None => {
                        let state = controller.snapshot().await;
                        if let Some(session) = state.session {
                            // The fallback turn is already in the transcript.
                            if let Some(last) = session.messages.last() {
                                println!("{}", render_message(last));
                            }
                        } else {
                            println!("no active session; run /analyze first");
                        }
                    }
                }
                drain_notices(&controller).await;
            }
        }
    }

    Ok(())
}

async fn run_analysis(controller: &SessionController, symbol: &str, timeframe: Timeframe) {
    if controller.request_analysis(symbol, timeframe).await.is_err() {
        drain_notices(controller).await;
        return;
    }
    drain_notices(controller).await;

    let state = controller.snapshot().await;
    if state.phase != Phase::Ready {
        return;
    }
    if let Some(session) = &state.session {
        println!();
        println!("== {} ({}) ==", session.symbol, session.timeframe);
        println!("{}", session.narrative);
    }
    if let Some(stats) = &state.stats {
        println!();
        print_cards(&series_stat_cards(stats));
    }
}

async fn run_prediction(backend: &BackendClient, controller: &SessionController) {
    let Some(session) = controller.snapshot().await.session else {
        println!("no active session; run /analyze first");
        return;
    };

    match backend.fetch_prediction(&session.symbol, session.timeframe).await {
        Ok(prediction) => {
            println!();
            println!("== {} forecast ==", prediction.symbol());
            print_cards(&horizon_cards(&prediction));
            if let Some(performance) = prediction.performance() {
                println!();
                print_cards(&performance_cards(performance));
            }

            let points = build_series_today(&prediction);
            let forecasts = points.iter().filter(|p| p.predicted.is_some()).count();
            println!();
            println!(
                "chart series: {} points ({} historical, {} forecast)",
                points.len(),
                points.len() - forecasts,
                forecasts
            );
        }
        Err(e) => eprintln!("prediction failed: {}", e),
    }
}

fn print_cards(cards: &[MetricCard]) {
    for card in cards {
        match card.delta_text() {
            Some(delta) => println!("  {:<12} {:>10}  {}", card.label, card.value, delta),
            None => println!("  {:<12} {:>10}", card.label, card.value),
        }
    }
}

async fn drain_notices(controller: &SessionController) {
    for notice in controller.take_notices().await {
        eprintln!("! {}: {}", notice.title, notice.detail);
    }
}
