//! Exit code standardization for cloudcost
//!
//! Provides consistent exit codes for different error types so scripts can
//! tell bad input apart from environment problems.
//!
//! ## Exit Code Convention
//!
//! - `0` = Success
//! - `1` = User error (invalid input, shrink attempt, unsupported operation, duplicate or missing id)
//! - `2` = System error (I/O, serialization)
//! - `3` = Configuration error (config or inventory parse failure)

use crate::error::CloudCostError;

/// Standard exit codes for cloudcost
pub mod codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// User error (invalid input, validation failure)
    pub const USER_ERROR: i32 = 1;
    /// System error (I/O, serialization)
    pub const SYSTEM_ERROR: i32 = 2;
    /// Configuration error (malformed config or inventory)
    pub const CONFIG_ERROR: i32 = 3;
}

/// Map a CloudCostError to an appropriate exit code
pub fn exit_code_for_error(error: &CloudCostError) -> i32 {
    use CloudCostError::*;
    match error {
        // Configuration errors
        Config(_) => codes::CONFIG_ERROR,

        // User errors
        InvalidArgument { .. } => codes::USER_ERROR,
        MonotonicityViolation { .. } => codes::USER_ERROR,
        UnsupportedOperation { .. } => codes::USER_ERROR,
        ResourceExists { .. } => codes::USER_ERROR,
        ResourceNotFound { .. } => codes::USER_ERROR,
        UnknownResourceType { .. } => codes::USER_ERROR,

        // Batch failures take the code of the record that failed
        Batch { source, .. } => exit_code_for_error(source),

        // System errors
        Io(_) => codes::SYSTEM_ERROR,
        Json(_) => codes::SYSTEM_ERROR,
    }
}

/// Exit code for an error surfaced through `anyhow` at the CLI boundary
pub fn exit_code_for_anyhow(error: &anyhow::Error) -> i32 {
    error
        .chain()
        .find_map(|e| e.downcast_ref::<CloudCostError>())
        .map(exit_code_for_error)
        .unwrap_or(codes::SYSTEM_ERROR)
}
