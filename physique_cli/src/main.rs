use chrono::{Duration, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use physique_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "physique")]
#[command(about = "Fitness profile and heart rate zone tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Onboard a user: create or update the profile and record metric snapshots
    Onboard {
        /// User identifier
        #[arg(long)]
        user: String,

        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: NaiveDate,

        /// Biological sex (male, female, other, unspecified)
        #[arg(long, default_value = "unspecified")]
        sex: String,

        /// Resting heart rate in bpm (30-120)
        #[arg(long)]
        resting_hr: Option<i32>,

        /// Max heart rate in bpm (120-220); estimated from age when omitted
        #[arg(long)]
        max_hr: Option<i32>,

        /// Weight in kilograms (30-300)
        #[arg(long)]
        weight_kg: Option<f32>,

        /// Height in centimeters (100-250)
        #[arg(long)]
        height_cm: Option<f32>,

        /// Fitness level (beginner, intermediate, advanced)
        #[arg(long)]
        fitness: Option<String>,
    },

    /// Calculate and display a heart rate zone table without persisting anything
    Zones {
        /// Max heart rate in bpm
        #[arg(long)]
        max_hr: i32,

        /// Resting heart rate in bpm (enables the Karvonen formula)
        #[arg(long)]
        resting_hr: Option<i32>,
    },

    /// Show a user's metric history, oldest first
    History {
        /// User identifier
        #[arg(long)]
        user: String,

        /// Metric to show (height, weight, zones)
        #[arg(long)]
        metric: String,

        /// How many days back to look
        #[arg(long, default_value_t = 30)]
        days: i64,
    },

    /// Show a user's most recent measurements and zone table
    Latest {
        /// User identifier
        #[arg(long)]
        user: String,
    },

    /// Export a user's height/weight history to CSV
    Export {
        /// User identifier
        #[arg(long)]
        user: String,

        /// Output CSV path
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    physique_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    match cli.command {
        Commands::Onboard {
            user,
            dob,
            sex,
            resting_hr,
            max_hr,
            weight_kg,
            height_cm,
            fitness,
        } => cmd_onboard(
            data_dir, user, dob, sex, resting_hr, max_hr, weight_kg, height_cm, fitness,
        ),
        Commands::Zones { max_hr, resting_hr } => cmd_zones(max_hr, resting_hr),
        Commands::History { user, metric, days } => cmd_history(data_dir, user, metric, days),
        Commands::Latest { user } => cmd_latest(data_dir, user, config.units.system),
        Commands::Export { user, output } => cmd_export(data_dir, user, output),
    }
}

fn profile_store(data_dir: &Path) -> JsonProfileStore {
    JsonProfileStore::new(data_dir.join("profiles.json"))
}

fn metrics_store(data_dir: &Path) -> JsonlMetricsStore {
    JsonlMetricsStore::new(data_dir.join("metrics"))
}

#[allow(clippy::too_many_arguments)]
fn cmd_onboard(
    data_dir: PathBuf,
    user: String,
    dob: NaiveDate,
    sex: String,
    resting_hr: Option<i32>,
    max_hr: Option<i32>,
    weight_kg: Option<f32>,
    height_cm: Option<f32>,
    fitness: Option<String>,
) -> Result<()> {
    // Boundary validation happens here, before the core is invoked
    validate_ranges(resting_hr, max_hr, weight_kg, height_cm)?;

    let request = OnboardingRequest {
        user_id: user,
        date_of_birth: dob,
        biological_sex: parse_sex(&sex)?,
        resting_heart_rate: resting_hr,
        max_heart_rate: max_hr,
        weight_kg,
        height_m: height_cm.map(|cm| cm / 100.0),
        fitness_level: fitness.as_deref().map(parse_fitness).transpose()?,
    };

    let service = OnboardingService::new(profile_store(&data_dir), metrics_store(&data_dir));
    let outcome = service.onboard_user(&request);

    if !outcome.success {
        eprintln!("✗ {}", outcome.message);
        return Err(Error::Other(outcome.message));
    }

    println!("✓ {}", outcome.message);
    if let Some(max) = outcome.max_heart_rate {
        match outcome.resting_heart_rate {
            Some(resting) => println!("  Heart rates: max {} bpm, resting {} bpm", max, resting),
            None => println!("  Heart rates: max {} bpm", max),
        }
        let zones = HeartRateZones::calculate(max, outcome.resting_heart_rate)?;
        display_zones(&zones);
    }
    if let Some(bmi) = outcome.estimated_bmi {
        println!("  Estimated BMI: {:.1}", bmi);
    }

    Ok(())
}

fn cmd_zones(max_hr: i32, resting_hr: Option<i32>) -> Result<()> {
    let zones = HeartRateZones::calculate(max_hr, resting_hr)?;
    display_zones(&zones);
    Ok(())
}

fn cmd_history(data_dir: PathBuf, user: String, metric: String, days: i64) -> Result<()> {
    let metrics = metrics_store(&data_dir);
    let end = Utc::now();
    let start = end - Duration::days(days);

    match metric.to_lowercase().as_str() {
        "height" => {
            let history = metrics.height_history(&user, start, end)?;
            if history.is_empty() {
                println!("No height history for {} in the last {} days.", user, days);
            }
            for record in history {
                let height = Height::from_centimeters(record.height_mm as f64 / 10.0)?;
                println!("{}  {}", record.recorded_at.to_rfc3339(), height);
            }
        }
        "weight" => {
            let history = metrics.weight_history(&user, start, end)?;
            if history.is_empty() {
                println!("No weight history for {} in the last {} days.", user, days);
            }
            for record in history {
                let weight = Weight::from_kilograms(record.weight_g as f64 / 1000.0)?;
                println!("{}  {}", record.recorded_at.to_rfc3339(), weight);
            }
        }
        "zones" => {
            let history = metrics.heart_rate_zones_history(&user, start, end)?;
            if history.is_empty() {
                println!("No zone history for {} in the last {} days.", user, days);
            }
            for record in history {
                match record.zones.resting_heart_rate {
                    Some(resting) => println!(
                        "{}  max {} bpm, resting {} bpm",
                        record.recorded_at.to_rfc3339(),
                        record.zones.max_heart_rate,
                        resting
                    ),
                    None => println!(
                        "{}  max {} bpm",
                        record.recorded_at.to_rfc3339(),
                        record.zones.max_heart_rate
                    ),
                }
            }
        }
        other => {
            return Err(Error::InvalidArgument(format!(
                "unknown metric '{}', expected height, weight or zones",
                other
            )));
        }
    }

    Ok(())
}

fn cmd_latest(data_dir: PathBuf, user: String, system: MeasurementSystem) -> Result<()> {
    let metrics = metrics_store(&data_dir);

    match metrics.latest_height(&user)? {
        Some(record) => {
            let height =
                Height::from_centimeters(record.height_mm as f64 / 10.0)?.in_system(system);
            println!("Height: {} (recorded {})", height, record.recorded_at.to_rfc3339());
        }
        None => println!("Height: no record"),
    }

    match metrics.latest_weight(&user)? {
        Some(record) => {
            let weight =
                Weight::from_kilograms(record.weight_g as f64 / 1000.0)?.in_system(system);
            println!("Weight: {} (recorded {})", weight, record.recorded_at.to_rfc3339());
        }
        None => println!("Weight: no record"),
    }

    match metrics.latest_heart_rate_zones(&user)? {
        Some(record) => {
            println!("Zones (recorded {}):", record.recorded_at.to_rfc3339());
            display_zones(&record.zones);
        }
        None => println!("Zones: no record"),
    }

    Ok(())
}

fn cmd_export(data_dir: PathBuf, user: String, output: PathBuf) -> Result<()> {
    let metrics = metrics_store(&data_dir);
    let count = export_metrics_csv(&metrics, &user, &output)?;

    if count == 0 {
        println!("No measurement history to export for {}.", user);
    } else {
        println!("✓ Exported {} rows to {}", count, output.display());
    }

    Ok(())
}

fn display_zones(zones: &HeartRateZones) {
    println!();
    for zone in &zones.zones {
        println!(
            "  {:<20} {:>3}-{:<3} bpm  {}",
            zone.name, zone.lower_bound, zone.upper_bound, zone.description
        );
    }
    println!();
}

/// Numeric range checks enforced at the boundary, not by the core
fn validate_ranges(
    resting_hr: Option<i32>,
    max_hr: Option<i32>,
    weight_kg: Option<f32>,
    height_cm: Option<f32>,
) -> Result<()> {
    if let Some(resting) = resting_hr {
        if !(30..=120).contains(&resting) {
            return Err(Error::OutOfRange(format!(
                "resting heart rate should be between 30-120 bpm, got {}",
                resting
            )));
        }
    }
    if let Some(max) = max_hr {
        if !(120..=220).contains(&max) {
            return Err(Error::OutOfRange(format!(
                "maximum heart rate should be between 120-220 bpm, got {}",
                max
            )));
        }
    }
    if let Some(weight) = weight_kg {
        if !(30.0..=300.0).contains(&weight) {
            return Err(Error::OutOfRange(format!(
                "weight should be between 30-300 kg, got {}",
                weight
            )));
        }
    }
    if let Some(height) = height_cm {
        if !(100.0..=250.0).contains(&height) {
            return Err(Error::OutOfRange(format!(
                "height should be between 100-250 cm, got {}",
                height
            )));
        }
    }
    Ok(())
}

fn parse_sex(s: &str) -> Result<BiologicalSex> {
    match s.to_lowercase().as_str() {
        "male" => Ok(BiologicalSex::Male),
        "female" => Ok(BiologicalSex::Female),
        "other" => Ok(BiologicalSex::Other),
        "unspecified" | "not_specified" => Ok(BiologicalSex::NotSpecified),
        other => Err(Error::InvalidArgument(format!(
            "unknown biological sex '{}', expected male, female, other or unspecified",
            other
        ))),
    }
}

fn parse_fitness(s: &str) -> Result<FitnessLevel> {
    match s.to_lowercase().as_str() {
        "beginner" => Ok(FitnessLevel::Beginner),
        "intermediate" => Ok(FitnessLevel::Intermediate),
        "advanced" => Ok(FitnessLevel::Advanced),
        "unspecified" | "not_specified" => Ok(FitnessLevel::NotSpecified),
        other => Err(Error::InvalidArgument(format!(
            "unknown fitness level '{}', expected beginner, intermediate or advanced",
            other
        ))),
    }
}
