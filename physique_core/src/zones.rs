//! Heart rate zone calculation.
//!
//! Produces the five-zone training table from a maximum heart rate and an
//! optional resting heart rate:
//! - With a resting rate, percentages apply to the heart rate reserve
//!   (Karvonen formula)
//! - Without one, percentages apply directly to the maximum heart rate
//!
//! Boundaries are computed with truncating integer casts; adjacent zones
//! are contiguous (each lower bound is the previous upper bound + 1) and
//! zone 5 always tops out at the maximum heart rate exactly.

use crate::{Error, HeartRateZone, HeartRateZones, Result};

/// Zone table: name, upper cut percentage, description.
///
/// The lowest zone starts at 50%; the final cut at 100% lands on the
/// maximum heart rate exactly in both calculation modes.
const ZONE_SPECS: [(&str, f64, &str); 5] = [
    (
        "Zone 1 - Recovery",
        0.60,
        "Very light intensity, active recovery",
    ),
    (
        "Zone 2 - Aerobic",
        0.70,
        "Light intensity, improves basic endurance",
    ),
    (
        "Zone 3 - Tempo",
        0.80,
        "Moderate intensity, improves aerobic capacity",
    ),
    (
        "Zone 4 - Threshold",
        0.90,
        "Hard intensity, improves anaerobic threshold",
    ),
    (
        "Zone 5 - VO2Max",
        1.00,
        "Very hard intensity, improves maximum performance",
    ),
];

impl HeartRateZone {
    /// Create a single zone, validating its bounds
    pub fn new(
        name: impl Into<String>,
        lower_bound: i32,
        upper_bound: i32,
        description: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::InvalidArgument("zone name cannot be empty".into()));
        }
        if lower_bound < 0 {
            return Err(Error::InvalidArgument(format!(
                "zone lower bound must be >= 0, got {}",
                lower_bound
            )));
        }
        if upper_bound <= lower_bound {
            return Err(Error::InvalidArgument(format!(
                "zone upper bound {} must be greater than lower bound {}",
                upper_bound, lower_bound
            )));
        }

        Ok(Self {
            name,
            lower_bound,
            upper_bound,
            description: description.into(),
        })
    }

    /// Whether a heart rate falls within this zone (bounds inclusive)
    pub fn contains(&self, heart_rate: i32) -> bool {
        heart_rate >= self.lower_bound && heart_rate <= self.upper_bound
    }
}

impl HeartRateZones {
    /// Calculate the five-zone table for the given heart rates.
    ///
    /// Uses the Karvonen formula when a resting heart rate is supplied,
    /// plain percentage-of-max otherwise.
    pub fn calculate(max_heart_rate: i32, resting_heart_rate: Option<i32>) -> Result<Self> {
        if max_heart_rate <= 0 {
            return Err(Error::InvalidArgument(format!(
                "max heart rate must be positive, got {}",
                max_heart_rate
            )));
        }
        if let Some(resting) = resting_heart_rate {
            if resting <= 0 {
                return Err(Error::InvalidArgument(format!(
                    "resting heart rate must be positive, got {}",
                    resting
                )));
            }
        }

        // Each cut point is computed independently with a truncating cast.
        let cut: Box<dyn Fn(f64) -> i32> = match resting_heart_rate {
            Some(resting) => {
                let hrr = max_heart_rate - resting;
                Box::new(move |pct| resting + (hrr as f64 * pct) as i32)
            }
            None => Box::new(move |pct| (max_heart_rate as f64 * pct) as i32),
        };

        let mut zones = Vec::with_capacity(ZONE_SPECS.len());
        let mut lower = cut(0.50);
        for (name, top_pct, description) in ZONE_SPECS {
            let upper = cut(top_pct);
            zones.push(HeartRateZone::new(name, lower, upper, description)?);
            lower = upper + 1;
        }

        tracing::debug!(
            max_heart_rate,
            resting_heart_rate,
            "Calculated heart rate zones"
        );

        Ok(Self {
            max_heart_rate,
            resting_heart_rate,
            zones,
        })
    }

    /// Find the zone a heart rate falls into, if any
    pub fn zone_for(&self, heart_rate: i32) -> Option<&HeartRateZone> {
        self.zones.iter().find(|z| z.contains(heart_rate))
    }
}

/// Estimate maximum heart rate from age using the common 220 - age formula
pub fn estimate_max_heart_rate(age: i32) -> Result<i32> {
    if !(10..=120).contains(&age) {
        return Err(Error::OutOfRange(format!(
            "age must be between 10 and 120, got {}",
            age
        )));
    }
    Ok(220 - age)
}
