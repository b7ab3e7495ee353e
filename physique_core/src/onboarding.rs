//! Onboarding orchestration.
//!
//! A single onboarding call converts the raw input to storage units,
//! resolves the max heart rate (supplied or age-estimated), creates or
//! updates the profile, recomputes the zone table, and appends the
//! time-series snapshots. The steps are sequential commits against
//! independent stores; there is no cross-store transaction, and a
//! failure part-way through leaves the earlier writes in place.
//!
//! Every failure is caught at the top level and folded into the
//! outcome's `success`/`message` pair; this method never returns an
//! error to the caller.

use crate::store::ProfileStore;
use crate::timeseries::MetricsStore;
use crate::{
    FitnessLevel, HeartRateZones, OnboardingOutcome, OnboardingRequest, Result,
    UserPhysicalProfile,
};
use chrono::{Datelike, NaiveDate, Utc};

/// Orchestrates profile creation/update plus metric snapshots
pub struct OnboardingService<P, M> {
    profiles: P,
    metrics: M,
}

impl<P: ProfileStore, M: MetricsStore> OnboardingService<P, M> {
    pub fn new(profiles: P, metrics: M) -> Self {
        Self { profiles, metrics }
    }

    /// Run the onboarding sequence for one request.
    ///
    /// Always returns an outcome; failures surface as `success: false`
    /// with the error text embedded in the message.
    pub fn onboard_user(&self, request: &OnboardingRequest) -> OnboardingOutcome {
        match self.run(request) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(user_id = %request.user_id, error = %e, "Onboarding failed");
                OnboardingOutcome {
                    success: false,
                    message: format!("Failed to onboard user: {}", e),
                    max_heart_rate: None,
                    resting_heart_rate: None,
                    user_id: None,
                    estimated_bmi: None,
                }
            }
        }
    }

    fn run(&self, request: &OnboardingRequest) -> Result<OnboardingOutcome> {
        // 1. Convert to storage units via truncating multiplication
        let height_mm = request.height_m.map(|m| (m * 1000.0) as i32);
        let weight_g = request.weight_kg.map(|kg| (kg * 1000.0) as i32);

        // 2. Resolve max heart rate: caller's value wins, otherwise
        //    estimate from age
        let max_heart_rate = match request.max_heart_rate {
            Some(max) => max,
            None => crate::zones::estimate_max_heart_rate(age_from(request.date_of_birth))?,
        };

        // 3. Create or update the profile
        let profile = match self.profiles.get_by_user_id(&request.user_id)? {
            None => {
                let profile = UserPhysicalProfile::new(
                    request.user_id.clone(),
                    request.date_of_birth,
                    request.biological_sex,
                    height_mm,
                    weight_g,
                    max_heart_rate,
                    request.resting_heart_rate,
                    request.fitness_level.unwrap_or(FitnessLevel::NotSpecified),
                )?;
                self.profiles.add(profile)?
            }
            Some(mut existing) => {
                if let Some(mm) = height_mm {
                    existing.update_height(mm)?;
                }
                if let Some(g) = weight_g {
                    existing.update_weight(g)?;
                }
                existing.set_heart_rates(max_heart_rate, request.resting_heart_rate)?;
                if let Some(level) = request.fitness_level {
                    existing.update_fitness_level(level);
                }
                self.profiles.update(existing)?
            }
        };

        // 4. Recompute the zone table
        let zones = HeartRateZones::calculate(max_heart_rate, request.resting_heart_rate)?;

        // 5. Append snapshots: zones always, height/weight only when
        //    supplied in this call
        self.metrics
            .add_heart_rate_zones(&request.user_id, &zones)?;
        if let Some(mm) = height_mm {
            self.metrics.add_height(&request.user_id, mm)?;
        }
        if let Some(g) = weight_g {
            self.metrics.add_weight(&request.user_id, g)?;
        }

        // 6. BMI only when both measurements were supplied in this call
        let estimated_bmi = match (height_mm, weight_g) {
            (Some(mm), Some(g)) if mm > 0 && g > 0 => profile.bmi(),
            _ => None,
        };

        tracing::info!(
            user_id = %request.user_id,
            max_heart_rate,
            "User onboarded"
        );

        Ok(OnboardingOutcome {
            success: true,
            message: "User onboarded successfully.".into(),
            max_heart_rate: Some(max_heart_rate),
            resting_heart_rate: request.resting_heart_rate,
            user_id: Some(request.user_id.clone()),
            estimated_bmi,
        })
    }
}

/// Age in whole years as of today, birthday-adjusted
fn age_from(date_of_birth: NaiveDate) -> i32 {
    let today = Utc::now().date_naive();
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}
