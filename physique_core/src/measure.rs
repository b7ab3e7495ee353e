//! Measurement value objects with metric/imperial conversion.
//!
//! `Height` and `Weight` remember the system they were captured in and
//! convert on demand, so display code can render whichever system the
//! user configured without round-tripping through storage units.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit system used for measurements
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementSystem {
    #[default]
    Metric,
    Imperial,
}

const KG_TO_LBS: f64 = 2.20462;
const CM_TO_INCHES: f64 = 0.393701;

/// A height measurement (metric: centimeters, imperial: inches)
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Height {
    value: f64,
    system: MeasurementSystem,
}

impl Height {
    pub fn from_centimeters(centimeters: f64) -> Result<Self> {
        Self::new(centimeters, MeasurementSystem::Metric)
    }

    pub fn from_inches(inches: f64) -> Result<Self> {
        Self::new(inches, MeasurementSystem::Imperial)
    }

    pub fn from_feet_and_inches(feet: i32, inches: f64) -> Result<Self> {
        Self::new(feet as f64 * 12.0 + inches, MeasurementSystem::Imperial)
    }

    fn new(value: f64, system: MeasurementSystem) -> Result<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "height must be positive, got {}",
                value
            )));
        }
        Ok(Self { value, system })
    }

    /// Height in centimeters regardless of the stored system
    pub fn centimeters(&self) -> f64 {
        match self.system {
            MeasurementSystem::Metric => self.value,
            MeasurementSystem::Imperial => self.value / CM_TO_INCHES,
        }
    }

    /// Height in inches regardless of the stored system
    pub fn inches(&self) -> f64 {
        match self.system {
            MeasurementSystem::Metric => self.value * CM_TO_INCHES,
            MeasurementSystem::Imperial => self.value,
        }
    }

    /// Re-express the measurement in the given system
    pub fn in_system(self, system: MeasurementSystem) -> Self {
        let value = match system {
            MeasurementSystem::Metric => self.centimeters(),
            MeasurementSystem::Imperial => self.inches(),
        };
        Self { value, system }
    }

    /// Height as whole feet plus remaining inches, for imperial display
    pub fn feet_and_inches(&self) -> (i32, f64) {
        let total_inches = self.inches();
        let feet = (total_inches / 12.0) as i32;
        (feet, total_inches - feet as f64 * 12.0)
    }

    pub fn system(&self) -> MeasurementSystem {
        self.system
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.system {
            MeasurementSystem::Metric => write!(f, "{:.1} cm", self.value),
            MeasurementSystem::Imperial => {
                let (feet, inches) = self.feet_and_inches();
                write!(f, "{}' {:.1}\"", feet, inches)
            }
        }
    }
}

/// A weight measurement (metric: kilograms, imperial: pounds)
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Weight {
    value: f64,
    system: MeasurementSystem,
}

impl Weight {
    pub fn from_kilograms(kilograms: f64) -> Result<Self> {
        Self::new(kilograms, MeasurementSystem::Metric)
    }

    pub fn from_pounds(pounds: f64) -> Result<Self> {
        Self::new(pounds, MeasurementSystem::Imperial)
    }

    fn new(value: f64, system: MeasurementSystem) -> Result<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "weight must be positive, got {}",
                value
            )));
        }
        Ok(Self { value, system })
    }

    /// Weight in kilograms regardless of the stored system
    pub fn kilograms(&self) -> f64 {
        match self.system {
            MeasurementSystem::Metric => self.value,
            MeasurementSystem::Imperial => self.value / KG_TO_LBS,
        }
    }

    /// Re-express the measurement in the given system
    pub fn in_system(self, system: MeasurementSystem) -> Self {
        let value = match system {
            MeasurementSystem::Metric => self.kilograms(),
            MeasurementSystem::Imperial => self.pounds(),
        };
        Self { value, system }
    }

    /// Weight in pounds regardless of the stored system
    pub fn pounds(&self) -> f64 {
        match self.system {
            MeasurementSystem::Metric => self.value * KG_TO_LBS,
            MeasurementSystem::Imperial => self.value,
        }
    }

    pub fn system(&self) -> MeasurementSystem {
        self.system
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.system {
            MeasurementSystem::Metric => write!(f, "{:.1} kg", self.value),
            MeasurementSystem::Imperial => write!(f, "{:.1} lbs", self.value),
        }
    }
}
