use crate::config::{Config, SplitConfig, TrainingConfig};
use crate::error::{PipelineError, Result};
use crate::models::RatingRecord;

pub fn validate_rating_record(record: &RatingRecord) -> Result<()> {
    if !record.rating.is_finite() {
        return Err(PipelineError::SchemaMismatch(
            "Rating contains invalid values (NaN or Infinity)".to_string(),
        ));
    }

    if record.isbn.trim().is_empty() {
        return Err(PipelineError::SchemaMismatch("ISBN cannot be empty".to_string()));
    }

    Ok(())
}

pub fn validate_split_config(split: &SplitConfig) -> Result<()> {
    let fraction = split.test_fraction;
    if !fraction.is_finite() || !(0.0..1.0).contains(&fraction) {
        return Err(PipelineError::InvalidConfig(format!(
            "test fraction must be in [0, 1), got {}",
            fraction
        )));
    }

    Ok(())
}

pub fn validate_training_config(training: &TrainingConfig) -> Result<()> {
    if training.iterations == 0 {
        return Err(PipelineError::InvalidConfig(
            "Number of iterations must be greater than 0".to_string(),
        ));
    }

    if training.approximation_rank == 0 {
        return Err(PipelineError::InvalidConfig(
            "Approximation rank must be greater than 0".to_string(),
        ));
    }

    if !training.learning_rate.is_finite() || training.learning_rate <= 0.0 {
        return Err(PipelineError::InvalidConfig(format!(
            "Learning rate must be positive, got {}",
            training.learning_rate
        )));
    }

    if !training.lambda.is_finite() || training.lambda < 0.0 {
        return Err(PipelineError::InvalidConfig(format!(
            "Regularization must be non-negative, got {}",
            training.lambda
        )));
    }

    Ok(())
}

pub fn validate_config(config: &Config) -> Result<()> {
    if !config.data.delimiter.is_ascii() {
        return Err(PipelineError::InvalidConfig(
            "Delimiter must be a single ASCII character".to_string(),
        ));
    }

    validate_split_config(&config.split)?;
    validate_training_config(&config.training)
}
