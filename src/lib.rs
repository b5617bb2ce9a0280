//! ListIQ: compare real-estate listings side by side.
//!
//! The comparison core (`mortgage`, `compare`, `sort`) is pure and
//! synchronous. `app::Comparison` owns the working state and persists it
//! through a [`store::StateStore`]. `summary` and `picks` use an optional
//! [`ai::TextModel`] and fall back to deterministic output without one.

pub mod ai;
pub mod app;
pub mod compare;
pub mod config;
pub mod error;
pub mod models;
pub mod mortgage;
pub mod picks;
pub mod share;
pub mod sort;
pub mod sources;
pub mod store;
pub mod summary;

#[cfg(test)]
mod testing;

pub use app::{AppState, Comparison, PropertyRow, SaveOutcome};
pub use config::Config;
pub use error::{Error, Result};
pub use models::{FavoriteSet, MortgageSettings, Property, PropertyDraft, SavedSearch};
