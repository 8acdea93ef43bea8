use crate::domain::model::ValueRange;
use crate::utils::error::{ProcessorError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(ProcessorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ProcessorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(ProcessorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // negated so NaN fails too
    if !(value >= min && value <= max) {
        return Err(ProcessorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// A sensor range must have finite bounds with `min <= max`.
pub fn validate_value_range(field_name: &str, range: &ValueRange) -> Result<()> {
    for bound in [range.min, range.max].into_iter().flatten() {
        if !bound.is_finite() {
            return Err(ProcessorError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: bound.to_string(),
                reason: "Bounds must be finite numbers".to_string(),
            });
        }
    }

    if let (Some(min), Some(max)) = (range.min, range.max) {
        if min > max {
            return Err(ProcessorError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: format!("[{}, {}]", min, max),
                reason: "min must not exceed max".to_string(),
            });
        }
    }
    Ok(())
}
