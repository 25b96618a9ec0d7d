//! Moving-average crossover signals.
//!
//! Derives the short/long rolling means and the buy/sell position markers
//! the analysis service expects, for payloads that carry raw prices only.

pub mod signals;


pub use signals::*;
