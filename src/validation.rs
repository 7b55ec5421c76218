//! Input validation utilities
//!
//! Shared checks used by resource constructors and setters. Each check
//! returns the validated value so callers can validate first and assign
//! second, which keeps every mutation all-or-nothing.

use crate::error::{CloudCostError, Result};

/// Validate a resource identifier
///
/// Any non-empty string is accepted; AWS id formats differ per service.
pub fn validate_resource_id(resource_id: &str) -> Result<()> {
    if resource_id.is_empty() {
        return Err(CloudCostError::invalid(
            "resource_id",
            "resource_id must be a non-empty string",
        ));
    }
    Ok(())
}

/// Validate a non-negative, finite real quantity (storage, durations)
pub fn validate_non_negative(field: &str, value: f64) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(CloudCostError::invalid(
            field,
            format!("{} must be a non-negative number, got: {}", field, value),
        ));
    }
    Ok(value)
}

/// Validate an integer size against inclusive bounds
pub fn validate_size_range(field: &str, value: u32, min: u32, max: u32) -> Result<u32> {
    if value < min {
        return Err(CloudCostError::invalid(
            field,
            format!("{} must be >= {}, got {}", field, min, value),
        ));
    }

    if value > max {
        return Err(CloudCostError::invalid(
            field,
            format!("{} cannot exceed {}GB (64TB), got {}", field, max, value),
        ));
    }

    Ok(value)
}

/// Reject any request that would shrink a grow-only capacity
pub fn ensure_growth(resource_type: &str, field: &str, current: u32, requested: u32) -> Result<()> {
    if requested < current {
        return Err(CloudCostError::MonotonicityViolation {
            resource_type: resource_type.to_string(),
            field: field.to_string(),
            current,
            requested,
        });
    }
    Ok(())
}
