//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error, if any, into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::InvalidValue {
                field: err.path,
                message: err.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Attempt budgets above this wait for more than a minute at default spacing.
const LARGE_BUDGET: u32 = 60;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_store(config, &mut result);
        Self::validate_resolver(config, &mut result);
        Self::validate_selectors(config, &mut result);

        Ok(result)
    }

    fn validate_store(config: &Config, result: &mut ValidationResult) {
        if config.store.path.trim().is_empty() {
            result.add_error(ValidationError::new(
                "store.path",
                "Store path cannot be empty",
            ));
        }
    }

    fn validate_resolver(config: &Config, result: &mut ValidationResult) {
        let resolver = &config.resolver;

        if resolver.retry_delay_ms == 0 {
            result.add_error(ValidationError::new(
                "resolver.retry_delay_ms",
                "retry_delay_ms must be greater than 0",
            ));
        }

        for (path, attempts) in [
            ("resolver.id_attempts", resolver.id_attempts),
            ("resolver.index_attempts", resolver.index_attempts),
        ] {
            if attempts == 0 {
                result.add_error(ValidationError::new(path, "must allow at least one attempt"));
            } else if attempts > LARGE_BUDGET {
                result.add_warning(ValidationWarning::new(
                    path,
                    format!("{attempts} attempts is very high, resolution may linger"),
                ));
            }
        }

        if resolver.highlight_duration_ms == 0 {
            result.add_error(ValidationError::new(
                "resolver.highlight_duration_ms",
                "highlight_duration_ms must be greater than 0",
            ));
        }
    }

    fn validate_selectors(config: &Config, result: &mut ValidationResult) {
        let candidates = &config.selectors.candidates;

        if candidates.is_empty() {
            result.add_error(ValidationError::new(
                "selectors.candidates",
                "At least one candidate selector is required",
            ));
        }

        for (i, selector) in candidates.iter().enumerate() {
            if selector.trim().is_empty() {
                result.add_error(ValidationError::new(
                    format!("selectors.candidates[{i}]"),
                    "Selector cannot be blank",
                ));
            }
        }

        for (i, selector) in candidates.iter().enumerate() {
            if candidates[..i].contains(selector) {
                result.add_warning(ValidationWarning::new(
                    format!("selectors.candidates[{i}]"),
                    format!("Duplicate selector '{selector}'"),
                ));
            }
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
