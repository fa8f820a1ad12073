//! sdg_tracker
//!
//! Fetch World Bank sustainability indicators for one country at a time and
//! turn the loosely-typed API responses into clean, ascending time series.
//! Pairs with the `sdg` CLI and the `sdg-gui` dashboard.
//!
//! ### Features
//! - Country catalog with aggregates (regions, income groups) filtered out
//! - Static catalog of tracked indicators tagged with their SDG
//! - Tolerant series normalization: nulls and junk dropped, numeric year order
//! - A view-state controller that only ever shows the latest selection
//! - Summary statistics for a series
//!
//! ### Example
//! ```no_run
//! use sdg_tracker::{Client, DateRange};
//!
//! let client = Client::default();
//! let countries = client.load_countries()?;
//! println!("{} countries", countries.len());
//!
//! let series = client.fetch_series("USA", "EN.ATM.CO2E.PC", DateRange::DEFAULT)?;
//! for obs in series.observations() {
//!     println!("{}: {}", obs.date, obs.value);
//! }
//! let summary = sdg_tracker::stats::summarize(&series);
//! println!("{:#?}", summary);
//! # Ok::<(), sdg_tracker::FetchError>(())
//! ```

pub mod api;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod normalize;
pub mod stats;

pub use api::Client;
pub use catalog::{Indicator, list_indicators};
pub use config::Settings;
pub use dashboard::{Dashboard, IndicatorSource, Selection, ViewState};
pub use error::FetchError;
pub use models::{Country, DateRange, Observation, SeriesResult};
