//! cloudcost library
//!
//! In-memory catalog of billable AWS resources (EC2, Lambda, S3, EBS, RDS)
//! and a registry that aggregates their monthly cost.

pub mod compute;
pub mod config;
pub mod database;
pub mod error;
pub mod exit_codes;
pub mod factory;
pub mod inventory;
pub mod manager;
pub mod pricing;
pub mod report;
pub mod resource;
pub mod storage;
pub mod utils;
pub mod validation;

// Re-export commonly used types
pub use compute::{Ec2Instance, LambdaFunction};
pub use database::RdsDatabase;
pub use error::{CloudCostError, Result};
pub use manager::{CostReport, ResourceManager};
pub use resource::{CloudResource, ResourceKind, ResourceStatus};
pub use storage::{EbsVolume, S3Bucket};
