//! Classify command - show the grade for a tier and data age.

use std::time::Duration;

use statguard::{classify, Quality, SourceTier};

use crate::error::CliError;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Run the classify command.
pub fn run(tier: SourceTier, age_hours: f64) -> Result<(), CliError> {
    let quality = grade(tier, age_hours)?;
    println!(
        "{} (age {}h) -> {} (confidence weight {:.2})",
        tier,
        age_hours,
        quality,
        quality.confidence_weight()
    );
    Ok(())
}

fn grade(tier: SourceTier, age_hours: f64) -> Result<Quality, CliError> {
    let age = Duration::try_from_secs_f64(age_hours * SECONDS_PER_HOUR).map_err(|_| {
        CliError::InvalidArgument(format!(
            "age must be a non-negative number of hours, got {}",
            age_hours
        ))
    })?;
    Ok(classify(tier, age))
}
