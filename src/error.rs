//! Error types for cloudcost
//!
//! This module defines the error handling strategy for cloudcost. There are two
//! error types: `CloudCostError` (main error enum) and `ConfigError` (configuration-specific).
//!
//! ## Error Handling Philosophy
//!
//! Library code uses `crate::error::Result<T>` which returns `CloudCostError`.
//! CLI code uses `anyhow::Result<T>` for top-level error handling. The conversion
//! happens at the CLI boundary using `anyhow::Error::from` to preserve error chains.
//!
//! Nothing in the library retries. Every rejected operation leaves the
//! resource or registry exactly as it was before the call.
//!
//! ## When to Use Which Error
//!
//! - `InvalidArgument`: construction or setter input that breaks an invariant
//!   - Empty ids, unknown regions, unsupported pricing tiers, out-of-range sizes
//!
//! - `MonotonicityViolation`: attempt to shrink a grow-only capacity
//!   - EBS volume size, RDS allocated storage
//!
//! - `UnsupportedOperation`: lifecycle call on an always-on resource
//!   - start/stop on Lambda functions, S3 buckets, EBS volumes
//!
//! - `ResourceExists`/`ResourceNotFound`: registry identity errors
//!
//! - `UnknownResourceType`: factory dispatch on a tag nobody registered

use thiserror::Error;

/// Resource identifier (instance ID, bucket name, function name, etc.)
pub type ResourceId = String;

/// Main error type for cloudcost
#[derive(Error, Debug)]
pub enum CloudCostError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid argument: {field} - {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("{resource_type} {field} can only be expanded, not shrunk. Current: {current}GB, requested: {requested}GB")]
    MonotonicityViolation {
        resource_type: String,
        field: String,
        current: u32,
        requested: u32,
    },

    #[error("Unsupported operation: {operation} on {resource_type} - {reason}")]
    UnsupportedOperation {
        resource_type: String,
        operation: String,
        reason: String,
    },

    #[error("Resource already exists: {resource_type} - {resource_id}")]
    ResourceExists {
        resource_type: String,
        resource_id: ResourceId,
    },

    #[error("Resource not found: {resource_id}")]
    ResourceNotFound { resource_id: ResourceId },

    #[error("Unknown resource type: '{type_name}'. Supported types: {}", .supported.join(", "))]
    UnknownResourceType {
        type_name: String,
        supported: Vec<String>,
    },

    #[error("Error at index {index}: {source}")]
    Batch {
        index: usize,
        #[source]
        source: Box<CloudCostError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CloudCostError>;

impl CloudCostError {
    /// Shorthand for the most common construction error.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CloudCostError::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Strip `Batch` wrappers and return the error that actually fired.
    pub fn root(&self) -> &CloudCostError {
        match self {
            CloudCostError::Batch { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_display() {
        let err = CloudCostError::invalid("region", "Invalid region: mars-1");
        assert_eq!(
            err.to_string(),
            "Invalid argument: region - Invalid region: mars-1"
        );
    }

    #[test]
    fn test_monotonicity_display() {
        let err = CloudCostError::MonotonicityViolation {
            resource_type: "EBSVolume".to_string(),
            field: "size_gb".to_string(),
            current: 100,
            requested: 50,
        };
        let msg = err.to_string();
        assert!(msg.contains("only be expanded"));
        assert!(msg.contains("Current: 100GB"));
        assert!(msg.contains("requested: 50GB"));
    }

    #[test]
    fn test_unknown_type_lists_supported() {
        let err = CloudCostError::UnknownResourceType {
            type_name: "gce".to_string(),
            supported: vec!["EBSVolume".to_string(), "EC2Instance".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Unknown resource type: 'gce'. Supported types: EBSVolume, EC2Instance"
        );
    }

    #[test]
    fn test_root_unwraps_nested_batch() {
        let inner = CloudCostError::ResourceNotFound {
            resource_id: "i-1".to_string(),
        };
        let err = CloudCostError::Batch {
            index: 3,
            source: Box::new(CloudCostError::Batch {
                index: 0,
                source: Box::new(inner),
            }),
        };
        assert!(matches!(err.root(), CloudCostError::ResourceNotFound { .. }));
        assert!(err.to_string().starts_with("Error at index 3"));
    }
}
