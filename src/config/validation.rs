//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (durations and ticks > 0)
//! - Check thresholds against each other (idle < TTL, sweep <= TTL)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RegcacheConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::RegcacheConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &RegcacheConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let cache = &config.cache;

    for (field, value) in [
        ("cache.ttl_secs", cache.ttl_secs),
        ("cache.sweep_interval_secs", cache.sweep_interval_secs),
        ("cache.pressure_tick_secs", cache.pressure_tick_secs),
        ("cache.pattern_idle_secs", cache.pattern_idle_secs),
        ("cache.param_idle_secs", cache.param_idle_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::new(field, "must be greater than zero"));
        }
    }

    if cache.sweep_interval_secs > cache.ttl_secs {
        errors.push(ValidationError::new(
            "cache.sweep_interval_secs",
            format!("must not exceed ttl_secs ({})", cache.ttl_secs),
        ));
    }

    for (field, idle) in [
        ("cache.pattern_idle_secs", cache.pattern_idle_secs),
        ("cache.param_idle_secs", cache.param_idle_secs),
    ] {
        if idle >= cache.ttl_secs {
            errors.push(ValidationError::new(
                field,
                format!("must be shorter than ttl_secs ({})", cache.ttl_secs),
            ));
        }
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level `{}`", config.observability.log_level),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
