//! Static AWS price tables
//!
//! On-demand list prices for the resource kinds cloudcost understands.
//! Every enumerated setting (region, instance type, volume type, ...) is a
//! closed enum parsed from its AWS spelling; the rate lookups are plain
//! matches, so there is no shared mutable pricing state anywhere.

use crate::error::{CloudCostError, Result};
use std::fmt;

/// Billing hours in a month (AWS uses 730 = 24 * 365 / 12)
pub const HOURS_PER_MONTH: f64 = 730.0;

/// Lambda: USD per one million requests
pub const LAMBDA_PRICE_PER_MILLION_REQUESTS: f64 = 0.20;
/// Lambda: USD per GB-second of compute
pub const LAMBDA_PRICE_PER_GB_SECOND: f64 = 0.0000166667;
pub const LAMBDA_REQUESTS_PER_PRICING_UNIT: f64 = 1_000_000.0;
pub const MB_PER_GB: f64 = 1024.0;
pub const MS_PER_SECOND: f64 = 1000.0;

/// Lambda memory configurations (MB), ascending
pub const LAMBDA_MEMORY_SIZES: &[u32] = &[128, 256, 512, 1024, 2048, 4096, 8192, 10240];

/// S3 Standard storage, USD per GB-month
pub const S3_PRICE_PER_GB_MONTH: f64 = 0.023;

pub const EBS_MIN_SIZE_GB: u32 = 1;
pub const EBS_MAX_SIZE_GB: u32 = 65536;

/// RDS allocated storage, USD per GB-month
pub const RDS_STORAGE_PRICE_PER_GB: f64 = 0.115;
pub const RDS_MIN_STORAGE_GB: u32 = 20;
pub const RDS_MAX_STORAGE_GB: u32 = 65536;

/// Declares a closed set of AWS identifiers with their wire spelling.
macro_rules! aws_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal, $label:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// All accepted spellings, sorted.
            pub fn supported() -> Vec<&'static str> {
                let mut names: Vec<&'static str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                names.sort_unstable();
                names
            }

            pub fn parse(value: &str) -> Result<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == value)
                    .ok_or_else(|| {
                        CloudCostError::invalid(
                            $field,
                            format!(
                                "Unsupported {} '{}'. Supported: {}",
                                $label,
                                value,
                                Self::supported().join(", ")
                            ),
                        )
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = CloudCostError;

            fn from_str(s: &str) -> Result<Self> {
                Self::parse(s)
            }
        }
    };
}

aws_enum! {
    /// AWS regions cloudcost has prices for
    Region, "region", "region" {
        UsEast1 => "us-east-1",
        UsWest2 => "us-west-2",
        EuWest1 => "eu-west-1",
        ApSoutheast1 => "ap-southeast-1",
        ApNortheast1 => "ap-northeast-1",
    }
}

aws_enum! {
    /// EC2 instance types
    InstanceType, "instance_type", "instance type" {
        T2Micro => "t2.micro",
        T2Small => "t2.small",
        T2Medium => "t2.medium",
    }
}

impl InstanceType {
    /// On-demand USD/hour
    pub fn hourly_rate(&self) -> f64 {
        match self {
            InstanceType::T2Micro => 0.0116,
            InstanceType::T2Small => 0.023,
            InstanceType::T2Medium => 0.0464,
        }
    }
}

aws_enum! {
    /// EBS volume types
    VolumeType, "volume_type", "volume type" {
        Gp2 => "gp2",
        Gp3 => "gp3",
        Io1 => "io1",
        Io2 => "io2",
        St1 => "st1",
        Sc1 => "sc1",
    }
}

impl VolumeType {
    /// USD per GB-month
    pub fn price_per_gb(&self) -> f64 {
        match self {
            VolumeType::Gp2 => 0.10,  // General Purpose SSD
            VolumeType::Gp3 => 0.08,  // General Purpose SSD (newer)
            VolumeType::Io1 => 0.125, // Provisioned IOPS SSD
            VolumeType::Io2 => 0.125,
            VolumeType::St1 => 0.045, // Throughput Optimized HDD
            VolumeType::Sc1 => 0.015, // Cold HDD
        }
    }
}

aws_enum! {
    /// RDS instance classes
    DbInstanceClass, "instance_class", "instance class" {
        T3Micro => "db.t3.micro",
        T3Small => "db.t3.small",
        T3Medium => "db.t3.medium",
        R5Large => "db.r5.large",
        R5Xlarge => "db.r5.xlarge",
    }
}

impl DbInstanceClass {
    /// Single-AZ on-demand USD/hour
    pub fn hourly_rate(&self) -> f64 {
        match self {
            DbInstanceClass::T3Micro => 0.017,
            DbInstanceClass::T3Small => 0.034,
            DbInstanceClass::T3Medium => 0.068,
            DbInstanceClass::R5Large => 0.24,
            DbInstanceClass::R5Xlarge => 0.48,
        }
    }
}

aws_enum! {
    /// RDS database engines
    DbEngine, "engine", "engine" {
        Mysql => "mysql",
        Postgresql => "postgresql",
        Mariadb => "mariadb",
        Oracle => "oracle",
        Sqlserver => "sqlserver",
    }
}

impl DbEngine {
    /// Engines are matched case-insensitively and stored lowercase.
    pub fn parse_normalized(value: &str) -> Result<Self> {
        Self::parse(&value.to_lowercase()).map_err(|_| {
            CloudCostError::invalid(
                "engine",
                format!(
                    "Unsupported engine '{}'. Supported: {}",
                    value,
                    Self::supported().join(", ")
                ),
            )
        })
    }
}

/// Check a Lambda memory size against the allowed configurations.
pub fn validate_lambda_memory(memory_mb: u32) -> Result<u32> {
    if LAMBDA_MEMORY_SIZES.contains(&memory_mb) {
        Ok(memory_mb)
    } else {
        Err(CloudCostError::invalid(
            "memory_mb",
            format!(
                "Unsupported memory size '{}MB'. Supported sizes: {:?}",
                memory_mb, LAMBDA_MEMORY_SIZES
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_parse() {
        assert_eq!(Region::parse("us-east-1").unwrap(), Region::UsEast1);
        assert_eq!("ap-northeast-1".parse::<Region>().unwrap(), Region::ApNortheast1);
        assert!(Region::parse("US-EAST-1").is_err()); // Regions are canonical lowercase
        assert!(Region::parse("mars-north-1").is_err());
        assert!(Region::parse("").is_err());
    }

    #[test]
    fn test_region_error_lists_sorted_regions() {
        let err = Region::parse("moon-1").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("moon-1"));
        assert!(msg.contains(
            "ap-northeast-1, ap-southeast-1, eu-west-1, us-east-1, us-west-2"
        ));
    }

    #[test]
    fn test_instance_type_rates() {
        assert_eq!(InstanceType::parse("t2.micro").unwrap().hourly_rate(), 0.0116);
        assert_eq!(InstanceType::parse("t2.small").unwrap().hourly_rate(), 0.023);
        assert_eq!(InstanceType::parse("t2.medium").unwrap().hourly_rate(), 0.0464);
        assert!(InstanceType::parse("t2.nano").is_err());
        assert_eq!(InstanceType::supported(), vec!["t2.medium", "t2.micro", "t2.small"]);
    }

    #[test]
    fn test_volume_type_prices() {
        assert_eq!(VolumeType::ALL.len(), 6);
        assert_eq!(VolumeType::Gp3.price_per_gb(), 0.08);
        assert_eq!(VolumeType::Sc1.price_per_gb(), 0.015);
        assert_eq!(VolumeType::parse("io2").unwrap(), VolumeType::Io2);
        assert!(VolumeType::parse("GP3").is_err());
    }

    #[test]
    fn test_db_instance_class_rates() {
        assert_eq!(DbInstanceClass::ALL.len(), 5);
        assert_eq!(DbInstanceClass::parse("db.r5.large").unwrap().hourly_rate(), 0.24);
        assert!(DbInstanceClass::parse("db.m5.large").is_err());
    }

    #[test]
    fn test_engine_case_normalized() {
        assert_eq!(DbEngine::parse_normalized("PostgreSQL").unwrap(), DbEngine::Postgresql);
        assert_eq!(DbEngine::parse_normalized("MYSQL").unwrap().as_str(), "mysql");
        let err = DbEngine::parse_normalized("Aurora").unwrap_err();
        assert!(err.to_string().contains("'Aurora'"));
    }

    #[test]
    fn test_lambda_memory_sizes() {
        assert!(validate_lambda_memory(128).is_ok());
        assert!(validate_lambda_memory(10240).is_ok());
        assert!(validate_lambda_memory(100).is_err());
        assert!(validate_lambda_memory(0).is_err());
    }
}
