//! Storage resources: S3 buckets and EBS volumes
//!
//! Both are capacity-billed and always on. An EBS volume can only grow.

use crate::error::Result;
use crate::pricing::{Region, VolumeType, EBS_MAX_SIZE_GB, EBS_MIN_SIZE_GB, S3_PRICE_PER_GB_MONTH};
use crate::resource::{
    impl_resource_identity, unsupported_lifecycle, CloudResource, ResourceCore, ResourceKind,
    ResourceStatus,
};
use crate::validation::{ensure_growth, validate_non_negative, validate_size_range};
use serde_json::json;
use std::any::Any;
use std::fmt;
use tracing::{debug, warn};

/// AWS S3 bucket, billed on current stored bytes
#[derive(Debug, Clone)]
pub struct S3Bucket {
    core: ResourceCore,
    storage_gb: f64,
}

impl S3Bucket {
    pub fn new(resource_id: impl Into<String>, region: &str, storage_gb: f64) -> Result<Self> {
        let core = ResourceCore::new(resource_id.into(), region, ResourceStatus::Running)?;
        let storage_gb = validate_non_negative("storage_gb", storage_gb)?;
        Ok(Self { core, storage_gb })
    }

    pub fn storage_gb(&self) -> f64 {
        self.storage_gb
    }

    /// Update live usage. Buckets shrink when objects are deleted, so any
    /// non-negative value is accepted.
    pub fn set_storage_gb(&mut self, value: f64) -> Result<()> {
        self.storage_gb = validate_non_negative("storage_gb", value)?;
        Ok(())
    }
}

impl_resource_identity!(S3Bucket);

impl CloudResource for S3Bucket {
    fn resource_id(&self) -> &str {
        &self.core.resource_id
    }

    fn region(&self) -> Region {
        self.core.region
    }

    fn status(&self) -> ResourceStatus {
        self.core.status
    }

    fn resource_type(&self) -> ResourceKind {
        ResourceKind::S3Bucket
    }

    fn supports_lifecycle(&self) -> bool {
        false
    }

    fn start(&mut self) -> Result<bool> {
        Err(unsupported_lifecycle(
            self.resource_type(),
            "start",
            "S3 buckets are always available",
        ))
    }

    fn stop(&mut self) -> Result<bool> {
        Err(unsupported_lifecycle(
            self.resource_type(),
            "stop",
            "S3 buckets cannot be stopped",
        ))
    }

    fn get_cost(&self) -> f64 {
        self.storage_gb * S3_PRICE_PER_GB_MONTH
    }

    fn get_info(&self) -> serde_json::Value {
        json!({
            "resource_id": self.core.resource_id,
            "resource_type": self.resource_type().as_str(),
            "region": self.core.region.as_str(),
            "status": self.core.status.as_str(),
            "storage_gb": self.storage_gb,
            "price_per_gb": S3_PRICE_PER_GB_MONTH,
            "monthly_cost": self.get_cost(),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl fmt::Display for S3Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S3: {} ({}GB)", self.core.resource_id, self.storage_gb)
    }
}

/// AWS EBS volume
///
/// Charged for provisioned size whether or not it is attached. Size may be
/// expanded in place but never shrunk.
#[derive(Debug, Clone)]
pub struct EbsVolume {
    core: ResourceCore,
    volume_type: VolumeType,
    size_gb: u32,
}

impl EbsVolume {
    pub fn new(
        resource_id: impl Into<String>,
        region: &str,
        volume_type: &str,
        size_gb: u32,
    ) -> Result<Self> {
        let core = ResourceCore::new(resource_id.into(), region, ResourceStatus::Running)?;
        let volume_type = VolumeType::parse(volume_type)?;
        let size_gb = validate_size_range("size_gb", size_gb, EBS_MIN_SIZE_GB, EBS_MAX_SIZE_GB)?;
        Ok(Self {
            core,
            volume_type,
            size_gb,
        })
    }

    pub fn supported_volume_types() -> Vec<&'static str> {
        VolumeType::supported()
    }

    pub fn volume_type(&self) -> VolumeType {
        self.volume_type
    }

    pub fn size_gb(&self) -> u32 {
        self.size_gb
    }

    /// Expand the volume. Values below the current size are rejected.
    pub fn set_size_gb(&mut self, value: u32) -> Result<()> {
        validate_size_range("size_gb", value, EBS_MIN_SIZE_GB, EBS_MAX_SIZE_GB)?;
        if let Err(e) = ensure_growth(self.resource_type().as_str(), "size_gb", self.size_gb, value) {
            warn!(resource_id = %self.core.resource_id, "rejected volume shrink: {}", e);
            return Err(e);
        }
        debug!(
            resource_id = %self.core.resource_id,
            from = self.size_gb,
            to = value,
            "volume resized"
        );
        self.size_gb = value;
        Ok(())
    }
}

impl_resource_identity!(EbsVolume);

impl CloudResource for EbsVolume {
    fn resource_id(&self) -> &str {
        &self.core.resource_id
    }

    fn region(&self) -> Region {
        self.core.region
    }

    fn status(&self) -> ResourceStatus {
        self.core.status
    }

    fn resource_type(&self) -> ResourceKind {
        ResourceKind::EbsVolume
    }

    fn supports_lifecycle(&self) -> bool {
        false
    }

    fn start(&mut self) -> Result<bool> {
        Err(unsupported_lifecycle(
            self.resource_type(),
            "start",
            "EBS volumes are always available",
        ))
    }

    fn stop(&mut self) -> Result<bool> {
        Err(unsupported_lifecycle(
            self.resource_type(),
            "stop",
            "EBS volumes cannot be stopped",
        ))
    }

    fn get_cost(&self) -> f64 {
        self.size_gb as f64 * self.volume_type.price_per_gb()
    }

    fn get_info(&self) -> serde_json::Value {
        json!({
            "resource_id": self.core.resource_id,
            "resource_type": self.resource_type().as_str(),
            "region": self.core.region.as_str(),
            "status": self.core.status.as_str(),
            "volume_type": self.volume_type.as_str(),
            "size_gb": self.size_gb,
            "price_per_gb": self.volume_type.price_per_gb(),
            "monthly_cost": self.get_cost(),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl fmt::Display for EbsVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EBS: {} ({}, {}GB)",
            self.core.resource_id, self.volume_type, self.size_gb
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CloudCostError;

    #[test]
    fn test_s3_cost() {
        let bucket = S3Bucket::new("app-assets-bucket", "us-west-2", 500.0).unwrap();
        assert!((bucket.get_cost() - 11.5).abs() < 1e-9);
        assert!(bucket.is_running());
    }

    #[test]
    fn test_s3_empty_bucket_is_free() {
        let bucket = S3Bucket::new("empty", "us-west-2", 0.0).unwrap();
        assert_eq!(bucket.get_cost(), 0.0);
    }

    #[test]
    fn test_s3_storage_can_shrink() {
        let mut bucket = S3Bucket::new("b", "us-east-1", 100.0).unwrap();
        bucket.set_storage_gb(10.0).unwrap();
        assert_eq!(bucket.storage_gb(), 10.0);
        assert!(bucket.set_storage_gb(-1.0).is_err());
        assert_eq!(bucket.storage_gb(), 10.0);
    }

    #[test]
    fn test_s3_rejects_lifecycle() {
        let mut bucket = S3Bucket::new("b", "us-east-1", 1.0).unwrap();
        assert!(matches!(bucket.start(), Err(CloudCostError::UnsupportedOperation { .. })));
        assert!(matches!(bucket.stop(), Err(CloudCostError::UnsupportedOperation { .. })));
    }

    #[test]
    fn test_s3_rejects_negative_storage() {
        assert!(S3Bucket::new("b", "us-east-1", -10.0).is_err());
    }

    #[test]
    fn test_s3_info() {
        let bucket = S3Bucket::new("b", "eu-west-1", 2000.0).unwrap();
        let info = bucket.get_info();
        assert_eq!(info["resource_type"], "S3Bucket");
        assert_eq!(info["price_per_gb"], 0.023);
        assert_eq!(info["storage_gb"], 2000.0);
        assert_eq!(bucket.to_string(), "S3: b (2000GB)");
    }

    #[test]
    fn test_ebs_cost() {
        let vol = EbsVolume::new("vol-data-01", "us-east-1", "gp3", 500).unwrap();
        assert!((vol.get_cost() - 40.0).abs() < 1e-9);
        let cold = EbsVolume::new("vol-cold", "us-east-1", "sc1", 1000).unwrap();
        assert!((cold.get_cost() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_ebs_bounds() {
        assert!(EbsVolume::new("v", "us-east-1", "gp2", 0).is_err());
        assert!(EbsVolume::new("v", "us-east-1", "gp2", 1).is_ok());
        assert!(EbsVolume::new("v", "us-east-1", "gp2", 65536).is_ok());
        assert!(EbsVolume::new("v", "us-east-1", "gp2", 65537).is_err());
        assert!(EbsVolume::new("v", "us-east-1", "gp4", 10).is_err());
    }

    #[test]
    fn test_ebs_only_grows() {
        let mut vol = EbsVolume::new("v", "us-east-1", "gp3", 100).unwrap();
        let err = vol.set_size_gb(50).unwrap_err();
        assert!(matches!(err, CloudCostError::MonotonicityViolation { .. }));
        assert_eq!(vol.size_gb(), 100);

        vol.set_size_gb(100).unwrap();
        vol.set_size_gb(200).unwrap();
        assert_eq!(vol.size_gb(), 200);

        assert!(vol.set_size_gb(70000).is_err());
        assert_eq!(vol.size_gb(), 200);
    }

    #[test]
    fn test_ebs_rejects_lifecycle() {
        let mut vol = EbsVolume::new("v", "us-east-1", "gp3", 100).unwrap();
        assert!(!vol.supports_lifecycle());
        assert!(vol.start().is_err());
        assert!(vol.stop().is_err());
        assert!(vol.is_running());
    }

    #[test]
    fn test_ebs_display_and_info() {
        let vol = EbsVolume::new("vol-1", "ap-southeast-1", "io1", 10).unwrap();
        assert_eq!(vol.to_string(), "EBS: vol-1 (io1, 10GB)");
        let info = vol.get_info();
        assert_eq!(info["volume_type"], "io1");
        assert_eq!(info["size_gb"], 10);
        assert_eq!(info["price_per_gb"], 0.125);
    }
}
