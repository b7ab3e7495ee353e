#![forbid(unsafe_code)]

//! Core domain model and business logic for the Physique fitness-profile
//! system.
//!
//! This crate provides:
//! - Domain types (profiles, heart rate zones, metric records)
//! - Heart rate zone calculation (Karvonen and percentage-of-max)
//! - Measurement value objects with metric/imperial conversion
//! - Persistence (profile store, append-only metric time series)
//! - Onboarding orchestration
//! - CSV export of measurement history

pub mod types;
pub mod error;
pub mod measure;
pub mod zones;
pub mod profile;
pub mod config;
pub mod logging;
pub mod store;
pub mod timeseries;
pub mod onboarding;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use measure::{Height, MeasurementSystem, Weight};
pub use zones::estimate_max_heart_rate;
pub use store::{JsonProfileStore, ProfileStore};
pub use timeseries::{JsonlMetricsStore, MetricsStore};
pub use onboarding::OnboardingService;
pub use export::export_metrics_csv;
