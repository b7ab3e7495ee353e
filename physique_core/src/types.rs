//! Core domain types for the Physique fitness-profile system.
//!
//! This module defines the fundamental types used throughout the system:
//! - User physical profiles and their attribute enums
//! - Heart rate zones and zone tables
//! - Time-series metric records
//! - Onboarding request/outcome DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Profile Attribute Enums
// ============================================================================

/// Biological sex of a user, relevant for physiological calculations
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BiologicalSex {
    NotSpecified,
    Male,
    Female,
    Other,
}

/// Self-assessed fitness level of a user
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
    NotSpecified,
    Beginner,
    Intermediate,
    Advanced,
}

// ============================================================================
// Heart Rate Zone Types
// ============================================================================

/// A single heart rate training zone with inclusive bounds (bpm)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeartRateZone {
    pub name: String,
    pub lower_bound: i32,
    pub upper_bound: i32,
    pub description: String,
}

/// A complete set of five heart rate training zones.
///
/// Immutable once calculated; persisted as a historical snapshot and
/// never mutated afterwards.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeartRateZones {
    pub max_heart_rate: i32,
    pub resting_heart_rate: Option<i32>,
    pub zones: Vec<HeartRateZone>,
}

// ============================================================================
// User Physical Profile
// ============================================================================

/// A user's current physiological attributes, one per user.
///
/// Height and weight are optional: an unknown measurement is represented
/// as `None` rather than a zero that would violate the `> 0` invariant
/// every setter enforces. Mutation goes through the methods in
/// `profile.rs`, which refresh `last_updated`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserPhysicalProfile {
    pub id: Uuid,
    pub user_id: String,
    pub date_of_birth: NaiveDate,
    pub biological_sex: BiologicalSex,
    pub height_mm: Option<i32>,
    pub weight_g: Option<i32>,
    pub max_heart_rate: i32,
    pub resting_heart_rate: Option<i32>,
    pub fitness_level: FitnessLevel,
    pub last_updated: DateTime<Utc>,
}

// ============================================================================
// Time-Series Metric Records
// ============================================================================

/// Historical record of a height measurement (millimeters)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HeightRecord {
    pub id: Uuid,
    pub user_id: String,
    pub recorded_at: DateTime<Utc>,
    pub height_mm: i32,
}

/// Historical record of a weight measurement (grams)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeightRecord {
    pub id: Uuid,
    pub user_id: String,
    pub recorded_at: DateTime<Utc>,
    pub weight_g: i32,
}

/// Historical snapshot of a user's heart rate zones
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HeartRateZonesRecord {
    pub id: Uuid,
    pub user_id: String,
    pub recorded_at: DateTime<Utc>,
    pub zones: HeartRateZones,
}

// ============================================================================
// Onboarding DTOs
// ============================================================================

/// Raw onboarding input as supplied by the boundary layer.
///
/// Height is in meters and weight in kilograms; the service converts to
/// the integer storage units (mm / g) by truncating multiplication.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OnboardingRequest {
    pub user_id: String,
    pub date_of_birth: NaiveDate,
    pub biological_sex: BiologicalSex,
    pub resting_heart_rate: Option<i32>,
    pub max_heart_rate: Option<i32>,
    pub weight_kg: Option<f32>,
    pub height_m: Option<f32>,
    pub fitness_level: Option<FitnessLevel>,
}

/// Result of an onboarding call.
///
/// `success` is false when any step of the orchestration failed; the
/// failure text is embedded in `message` and never re-thrown.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OnboardingOutcome {
    pub success: bool,
    pub message: String,
    pub max_heart_rate: Option<i32>,
    pub resting_heart_rate: Option<i32>,
    pub user_id: Option<String>,
    pub estimated_bmi: Option<f64>,
}
