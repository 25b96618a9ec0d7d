//! Stateless presentation adapters.
//!
//! Formats controller state into metric cards and transcript lines; no
//! state, no I/O, consumable by any rendering surface.

pub mod cards;
pub mod transcript;

pub use cards::{
    format_price, format_signed_pct, horizon_cards, performance_cards, series_stat_cards,
    MetricCard,
};
pub use transcript::{render_message, render_transcript, role_label};
