//! User physical profile entity.
//!
//! The profile is the single mutable row per user. All mutation goes
//! through the setters here, which enforce the domain invariants
//! (positive measurements, resting strictly below max heart rate) and
//! refresh the last-updated timestamp.

use crate::measure::{Height, Weight};
use crate::{BiologicalSex, Error, FitnessLevel, Result, UserPhysicalProfile};
use chrono::{Datelike, NaiveDate, Utc};
use uuid::Uuid;

impl UserPhysicalProfile {
    /// Create a new profile, validating through the same setters used
    /// for updates.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: impl Into<String>,
        date_of_birth: NaiveDate,
        biological_sex: BiologicalSex,
        height_mm: Option<i32>,
        weight_g: Option<i32>,
        max_heart_rate: i32,
        resting_heart_rate: Option<i32>,
        fitness_level: FitnessLevel,
    ) -> Result<Self> {
        let user_id = user_id.into();
        if user_id.trim().is_empty() {
            return Err(Error::InvalidArgument("user id cannot be empty".into()));
        }

        let mut profile = Self {
            id: Uuid::new_v4(),
            user_id,
            date_of_birth,
            biological_sex,
            height_mm: None,
            weight_g: None,
            max_heart_rate: 0,
            resting_heart_rate: None,
            fitness_level,
            last_updated: Utc::now(),
        };

        if let Some(mm) = height_mm {
            profile.update_height(mm)?;
        }
        if let Some(g) = weight_g {
            profile.update_weight(g)?;
        }
        profile.set_heart_rates(max_heart_rate, resting_heart_rate)?;

        Ok(profile)
    }

    /// Replace the height (millimeters)
    pub fn update_height(&mut self, height_mm: i32) -> Result<()> {
        if height_mm <= 0 {
            return Err(Error::InvalidArgument(format!(
                "height must be greater than zero, got {}",
                height_mm
            )));
        }
        self.height_mm = Some(height_mm);
        self.last_updated = Utc::now();
        Ok(())
    }

    /// Replace the weight (grams)
    pub fn update_weight(&mut self, weight_g: i32) -> Result<()> {
        if weight_g <= 0 {
            return Err(Error::InvalidArgument(format!(
                "weight must be greater than zero, got {}",
                weight_g
            )));
        }
        self.weight_g = Some(weight_g);
        self.last_updated = Utc::now();
        Ok(())
    }

    /// Replace both heart rates together.
    ///
    /// Resting, when present, must be strictly below max.
    pub fn set_heart_rates(&mut self, max_heart_rate: i32, resting_heart_rate: Option<i32>) -> Result<()> {
        if max_heart_rate <= 0 {
            return Err(Error::InvalidArgument(format!(
                "max heart rate must be greater than zero, got {}",
                max_heart_rate
            )));
        }
        if let Some(resting) = resting_heart_rate {
            if resting <= 0 {
                return Err(Error::InvalidArgument(format!(
                    "resting heart rate must be greater than zero, got {}",
                    resting
                )));
            }
            if resting >= max_heart_rate {
                return Err(Error::InvalidArgument(format!(
                    "resting heart rate {} must be less than max heart rate {}",
                    resting, max_heart_rate
                )));
            }
        }

        self.max_heart_rate = max_heart_rate;
        self.resting_heart_rate = resting_heart_rate;
        self.last_updated = Utc::now();
        Ok(())
    }

    /// Replace the fitness level (no validation needed)
    pub fn update_fitness_level(&mut self, fitness_level: FitnessLevel) {
        self.fitness_level = fitness_level;
        self.last_updated = Utc::now();
    }

    /// Body mass index, rounded to one decimal place.
    ///
    /// `None` unless both height and weight are known.
    pub fn bmi(&self) -> Option<f64> {
        let height_m = self.height_mm? as f64 / 1000.0;
        let weight_kg = self.weight_g? as f64 / 1000.0;
        Some((weight_kg / (height_m * height_m) * 10.0).round() / 10.0)
    }

    /// Age in whole years as of today
    pub fn age(&self) -> i32 {
        self.age_on(Utc::now().date_naive())
    }

    /// Age in whole years as of the given date
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        let mut age = today.year() - self.date_of_birth.year();
        // Not yet had the birthday this year
        if (today.month(), today.day()) < (self.date_of_birth.month(), self.date_of_birth.day()) {
            age -= 1;
        }
        age
    }

    /// Height as a displayable measurement, if known
    pub fn height(&self) -> Option<Height> {
        self.height_mm
            .and_then(|mm| Height::from_centimeters(mm as f64 / 10.0).ok())
    }

    /// Weight as a displayable measurement, if known
    pub fn weight(&self) -> Option<Weight> {
        self.weight_g
            .and_then(|g| Weight::from_kilograms(g as f64 / 1000.0).ok())
    }
}
