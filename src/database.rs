//! RDS database instances
//!
//! Billing rules:
//! - Instance cost: only billed while running, Multi-AZ doubles it
//! - Storage cost: billed regardless of running state
//!
//! Allocated storage, like EBS, can only be expanded.

use crate::error::Result;
use crate::pricing::{
    DbEngine, DbInstanceClass, Region, HOURS_PER_MONTH, RDS_MAX_STORAGE_GB, RDS_MIN_STORAGE_GB,
    RDS_STORAGE_PRICE_PER_GB,
};
use crate::resource::{
    impl_resource_identity, CloudResource, ResourceCore, ResourceKind, ResourceStatus,
};
use crate::validation::{ensure_growth, validate_size_range};
use serde_json::json;
use std::any::Any;
use std::fmt;
use tracing::{debug, warn};

/// AWS RDS database instance
#[derive(Debug, Clone)]
pub struct RdsDatabase {
    core: ResourceCore,
    instance_class: DbInstanceClass,
    engine: DbEngine,
    storage_gb: u32,
    multi_az: bool,
}

impl RdsDatabase {
    /// Create a stopped database
    ///
    /// `engine` is matched case-insensitively and stored lowercase.
    pub fn new(
        resource_id: impl Into<String>,
        region: &str,
        instance_class: &str,
        engine: &str,
        storage_gb: u32,
        multi_az: bool,
    ) -> Result<Self> {
        let core = ResourceCore::new(resource_id.into(), region, ResourceStatus::Stopped)?;
        let instance_class = DbInstanceClass::parse(instance_class)?;
        let engine = DbEngine::parse_normalized(engine)?;
        let storage_gb =
            validate_size_range("storage_gb", storage_gb, RDS_MIN_STORAGE_GB, RDS_MAX_STORAGE_GB)?;
        Ok(Self {
            core,
            instance_class,
            engine,
            storage_gb,
            multi_az,
        })
    }

    pub fn supported_instance_classes() -> Vec<&'static str> {
        DbInstanceClass::supported()
    }

    pub fn supported_engines() -> Vec<&'static str> {
        DbEngine::supported()
    }

    pub fn instance_class(&self) -> DbInstanceClass {
        self.instance_class
    }

    pub fn engine(&self) -> DbEngine {
        self.engine
    }

    pub fn storage_gb(&self) -> u32 {
        self.storage_gb
    }

    pub fn multi_az(&self) -> bool {
        self.multi_az
    }

    /// Expand allocated storage. Values below the current size are rejected.
    pub fn set_storage_gb(&mut self, value: u32) -> Result<()> {
        validate_size_range("storage_gb", value, RDS_MIN_STORAGE_GB, RDS_MAX_STORAGE_GB)?;
        if let Err(e) = ensure_growth(self.resource_type().as_str(), "storage_gb", self.storage_gb, value) {
            warn!(resource_id = %self.core.resource_id, "rejected storage shrink: {}", e);
            return Err(e);
        }
        debug!(
            resource_id = %self.core.resource_id,
            from = self.storage_gb,
            to = value,
            "database storage expanded"
        );
        self.storage_gb = value;
        Ok(())
    }

    /// Instance hourly cost, excluding storage. Zero while stopped.
    pub fn hourly_cost(&self) -> f64 {
        if !self.is_running() {
            return 0.0;
        }
        let hourly = self.instance_class.hourly_rate();
        if self.multi_az {
            hourly * 2.0
        } else {
            hourly
        }
    }

    pub fn instance_cost(&self) -> f64 {
        self.hourly_cost() * HOURS_PER_MONTH
    }

    pub fn storage_cost(&self) -> f64 {
        self.storage_gb as f64 * RDS_STORAGE_PRICE_PER_GB
    }
}

impl_resource_identity!(RdsDatabase);

impl CloudResource for RdsDatabase {
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
        ResourceKind::RdsDatabase
    }

    fn supports_lifecycle(&self) -> bool {
        true
    }

    fn start(&mut self) -> Result<bool> {
        Ok(self.core.start())
    }

    fn stop(&mut self) -> Result<bool> {
        Ok(self.core.stop())
    }

    fn get_cost(&self) -> f64 {
        self.instance_cost() + self.storage_cost()
    }

    fn get_info(&self) -> serde_json::Value {
        json!({
            "resource_id": self.core.resource_id,
            "resource_type": self.resource_type().as_str(),
            "region": self.core.region.as_str(),
            "status": self.core.status.as_str(),
            "instance_class": self.instance_class.as_str(),
            "engine": self.engine.as_str(),
            "storage_gb": self.storage_gb,
            "multi_az": self.multi_az,
            "hourly_cost": self.hourly_cost(),
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

impl fmt::Display for RdsDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let az_suffix = if self.multi_az { " (Multi-AZ)" } else { "" };
        write!(
            f,
            "RDS: {} ({}, {}){} - {}",
            self.core.resource_id, self.engine, self.instance_class, az_suffix, self.core.status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CloudCostError;

    fn prod_db() -> RdsDatabase {
        RdsDatabase::new("prod-database", "ap-northeast-1", "db.r5.large", "postgresql", 200, true)
            .unwrap()
    }

    #[test]
    fn test_multi_az_running_cost() {
        let mut db = prod_db();
        db.start().unwrap();
        assert!((db.instance_cost() - 350.40).abs() < 1e-9);
        assert!((db.storage_cost() - 23.0).abs() < 1e-9);
        assert!((db.get_cost() - 373.40).abs() < 1e-9);
        assert!((db.hourly_cost() - 0.48).abs() < 1e-12);
    }

    #[test]
    fn test_stopped_bills_storage_only() {
        let db = prod_db();
        assert_eq!(db.status(), ResourceStatus::Stopped);
        assert_eq!(db.instance_cost(), 0.0);
        assert!((db.get_cost() - 23.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_az_rate() {
        let mut db =
            RdsDatabase::new("db", "us-east-1", "db.t3.micro", "mysql", 20, false).unwrap();
        db.start().unwrap();
        assert!((db.hourly_cost() - 0.017).abs() < 1e-12);
    }

    #[test]
    fn test_engine_normalized() {
        let db = RdsDatabase::new("db", "us-east-1", "db.t3.small", "MariaDB", 20, false).unwrap();
        assert_eq!(db.engine(), DbEngine::Mariadb);
        assert_eq!(db.get_info()["engine"], "mariadb");
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert!(RdsDatabase::new("db", "us-east-1", "db.m5.large", "mysql", 20, false).is_err());
        assert!(RdsDatabase::new("db", "us-east-1", "db.t3.micro", "mongodb", 20, false).is_err());
        assert!(RdsDatabase::new("db", "us-east-1", "db.t3.micro", "mysql", 19, false).is_err());
        assert!(RdsDatabase::new("db", "us-east-1", "db.t3.micro", "mysql", 65537, false).is_err());
        assert!(RdsDatabase::new("", "us-east-1", "db.t3.micro", "mysql", 20, false).is_err());
    }

    #[test]
    fn test_storage_only_grows() {
        let mut db = prod_db();
        let err = db.set_storage_gb(100).unwrap_err();
        assert!(matches!(err, CloudCostError::MonotonicityViolation { current: 200, requested: 100, .. }));
        assert_eq!(db.storage_gb(), 200);
        db.set_storage_gb(500).unwrap();
        assert_eq!(db.storage_gb(), 500);
    }

    #[test]
    fn test_lifecycle() {
        let mut db = prod_db();
        assert!(db.supports_lifecycle());
        assert!(db.start().unwrap());
        assert!(!db.start().unwrap());
        assert!(db.stop().unwrap());
    }

    #[test]
    fn test_display() {
        let mut db = prod_db();
        assert_eq!(
            db.to_string(),
            "RDS: prod-database (postgresql, db.r5.large) (Multi-AZ) - stopped"
        );
        db.start().unwrap();
        assert!(db.to_string().ends_with("- running"));
    }

    #[test]
    fn test_info() {
        let db = prod_db();
        let info = db.get_info();
        assert_eq!(info["resource_type"], "RDSDatabase");
        assert_eq!(info["instance_class"], "db.r5.large");
        assert_eq!(info["multi_az"], true);
        assert_eq!(info["storage_gb"], 200);
        assert_eq!(info["hourly_cost"], 0.0);
    }
}
