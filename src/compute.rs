//! Compute resources: EC2 instances and Lambda functions
//!
//! EC2 is metered by the hour while running. Lambda is metered by
//! requests and GB-seconds and has no lifecycle of its own.

use crate::error::Result;
use crate::pricing::{
    validate_lambda_memory, InstanceType, Region, HOURS_PER_MONTH, LAMBDA_MEMORY_SIZES,
    LAMBDA_PRICE_PER_GB_SECOND, LAMBDA_PRICE_PER_MILLION_REQUESTS,
    LAMBDA_REQUESTS_PER_PRICING_UNIT, MB_PER_GB, MS_PER_SECOND,
};
use crate::resource::{
    impl_resource_identity, unsupported_lifecycle, CloudResource, ResourceCore, ResourceKind,
    ResourceStatus,
};
use crate::validation::validate_non_negative;
use serde_json::json;
use std::any::Any;
use std::fmt;

/// AWS EC2 instance, billed hourly while running
#[derive(Debug, Clone)]
pub struct Ec2Instance {
    core: ResourceCore,
    instance_type: InstanceType,
}

impl Ec2Instance {
    /// Create a stopped instance
    ///
    /// Fails if the id is empty, the region is unknown, or the instance
    /// type has no price.
    pub fn new(resource_id: impl Into<String>, region: &str, instance_type: &str) -> Result<Self> {
        let core = ResourceCore::new(resource_id.into(), region, ResourceStatus::Stopped)?;
        let instance_type = InstanceType::parse(instance_type)?;
        Ok(Self { core, instance_type })
    }

    pub fn supported_types() -> Vec<&'static str> {
        InstanceType::supported()
    }

    pub fn instance_type(&self) -> InstanceType {
        self.instance_type
    }

    /// Hourly cost; stopped instances cost nothing
    pub fn hourly_cost(&self) -> f64 {
        if !self.is_running() {
            return 0.0;
        }
        self.instance_type.hourly_rate()
    }
}

impl_resource_identity!(Ec2Instance);

impl CloudResource for Ec2Instance {
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
        ResourceKind::Ec2Instance
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
        self.hourly_cost() * HOURS_PER_MONTH
    }

    fn get_info(&self) -> serde_json::Value {
        json!({
            "resource_id": self.core.resource_id,
            "resource_type": self.resource_type().as_str(),
            "region": self.core.region.as_str(),
            "status": self.core.status.as_str(),
            "instance_type": self.instance_type.as_str(),
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

impl fmt::Display for Ec2Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EC2: {} ({}) - {}",
            self.core.resource_id, self.instance_type, self.core.status
        )
    }
}

/// AWS Lambda function
///
/// Billed per request plus per GB-second of execution. A deployed function
/// is always invocable, so it is permanently `Running` and rejects
/// start/stop.
#[derive(Debug, Clone)]
pub struct LambdaFunction {
    core: ResourceCore,
    memory_mb: u32,
    monthly_invocations: u64,
    avg_duration_ms: f64,
}

impl LambdaFunction {
    pub fn new(
        resource_id: impl Into<String>,
        region: &str,
        memory_mb: u32,
        monthly_invocations: u64,
        avg_duration_ms: f64,
    ) -> Result<Self> {
        let core = ResourceCore::new(resource_id.into(), region, ResourceStatus::Running)?;
        let memory_mb = validate_lambda_memory(memory_mb)?;
        let avg_duration_ms = validate_non_negative("avg_duration_ms", avg_duration_ms)?;
        Ok(Self {
            core,
            memory_mb,
            monthly_invocations,
            avg_duration_ms,
        })
    }

    pub fn supported_memory_sizes() -> Vec<u32> {
        LAMBDA_MEMORY_SIZES.to_vec()
    }

    pub fn memory_mb(&self) -> u32 {
        self.memory_mb
    }

    pub fn monthly_invocations(&self) -> u64 {
        self.monthly_invocations
    }

    /// Invocation counts are unsigned, so every value is valid.
    pub fn set_monthly_invocations(&mut self, value: u64) {
        self.monthly_invocations = value;
    }

    pub fn avg_duration_ms(&self) -> f64 {
        self.avg_duration_ms
    }

    pub fn set_avg_duration_ms(&mut self, value: f64) -> Result<()> {
        self.avg_duration_ms = validate_non_negative("avg_duration_ms", value)?;
        Ok(())
    }

    /// $0.20 per million requests
    pub fn request_cost(&self) -> f64 {
        (self.monthly_invocations as f64 / LAMBDA_REQUESTS_PER_PRICING_UNIT)
            * LAMBDA_PRICE_PER_MILLION_REQUESTS
    }

    /// GB-seconds = (memory MB / 1024) * (duration ms / 1000) * invocations
    pub fn compute_cost(&self) -> f64 {
        let gb_seconds = (self.memory_mb as f64 / MB_PER_GB)
            * (self.avg_duration_ms / MS_PER_SECOND)
            * self.monthly_invocations as f64;
        gb_seconds * LAMBDA_PRICE_PER_GB_SECOND
    }
}

impl_resource_identity!(LambdaFunction);

impl CloudResource for LambdaFunction {
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
        ResourceKind::LambdaFunction
    }

    fn supports_lifecycle(&self) -> bool {
        false
    }

    fn start(&mut self) -> Result<bool> {
        Err(unsupported_lifecycle(
            self.resource_type(),
            "start",
            "Lambda functions are always available when deployed",
        ))
    }

    fn stop(&mut self) -> Result<bool> {
        Err(unsupported_lifecycle(
            self.resource_type(),
            "stop",
            "Lambda functions cannot be stopped",
        ))
    }

    fn get_cost(&self) -> f64 {
        self.request_cost() + self.compute_cost()
    }

    fn get_info(&self) -> serde_json::Value {
        json!({
            "resource_id": self.core.resource_id,
            "resource_type": self.resource_type().as_str(),
            "region": self.core.region.as_str(),
            "status": self.core.status.as_str(),
            "memory_mb": self.memory_mb,
            "monthly_invocations": self.monthly_invocations,
            "avg_duration_ms": self.avg_duration_ms,
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

impl fmt::Display for LambdaFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lambda: {} ({}MB)", self.core.resource_id, self.memory_mb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CloudCostError;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_ec2_starts_stopped_and_free() {
        let ec2 = Ec2Instance::new("i-1", "us-east-1", "t2.micro").unwrap();
        assert_eq!(ec2.status(), ResourceStatus::Stopped);
        assert_eq!(ec2.get_cost(), 0.0);
        assert_eq!(ec2.hourly_cost(), 0.0);
    }

    #[test]
    fn test_ec2_running_cost() {
        let mut ec2 = Ec2Instance::new("i-web", "us-east-1", "t2.small").unwrap();
        assert!(ec2.start().unwrap());
        assert!(approx(ec2.get_cost(), 16.79));
        assert!(approx(ec2.hourly_cost(), 0.023));
    }

    #[test]
    fn test_ec2_start_stop_transitions() {
        let mut ec2 = Ec2Instance::new("i-1", "eu-west-1", "t2.medium").unwrap();
        assert_eq!((ec2.start().unwrap(), ec2.stop().unwrap()), (true, true));
        assert!(ec2.start().unwrap());
        assert!(!ec2.start().unwrap());
        assert!(ec2.stop().unwrap());
        assert!(!ec2.stop().unwrap());
        assert_eq!(ec2.get_cost(), 0.0);
    }

    #[test]
    fn test_ec2_rejects_invalid_input() {
        assert!(Ec2Instance::new("", "us-east-1", "t2.micro").is_err());
        assert!(Ec2Instance::new("i-1", "us-east-3", "t2.micro").is_err());
        let err = Ec2Instance::new("i-1", "us-east-1", "m5.large").unwrap_err();
        assert!(matches!(err, CloudCostError::InvalidArgument { ref field, .. } if field == "instance_type"));
    }

    #[test]
    fn test_ec2_info() {
        let mut ec2 = Ec2Instance::new("i-1", "us-west-2", "t2.micro").unwrap();
        ec2.start().unwrap();
        let info = ec2.get_info();
        assert_eq!(info["resource_id"], "i-1");
        assert_eq!(info["resource_type"], "EC2Instance");
        assert_eq!(info["region"], "us-west-2");
        assert_eq!(info["status"], "running");
        assert_eq!(info["instance_type"], "t2.micro");
        assert_eq!(info["hourly_cost"], 0.0116);
        assert!(info["monthly_cost"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn test_ec2_display() {
        let ec2 = Ec2Instance::new("i-1", "us-east-1", "t2.micro").unwrap();
        assert_eq!(ec2.to_string(), "EC2: i-1 (t2.micro) - stopped");
    }

    #[test]
    fn test_lambda_cost() {
        let lambda = LambdaFunction::new("data-processor", "us-east-1", 1024, 5_000_000, 200.0).unwrap();
        assert!(approx(lambda.request_cost(), 1.0));
        assert!((lambda.compute_cost() - 16.6667).abs() < 1e-3);
        assert!((lambda.get_cost() - 17.6667).abs() < 1e-3);
    }

    #[test]
    fn test_lambda_zero_usage_is_free() {
        let lambda = LambdaFunction::new("idle", "us-east-1", 128, 0, 0.0).unwrap();
        assert_eq!(lambda.get_cost(), 0.0);
    }

    #[test]
    fn test_lambda_always_running_and_rejects_lifecycle() {
        let mut lambda = LambdaFunction::new("fn", "us-east-1", 128, 0, 0.0).unwrap();
        assert!(lambda.is_running());
        assert!(!lambda.supports_lifecycle());
        assert!(matches!(
            lambda.start(),
            Err(CloudCostError::UnsupportedOperation { .. })
        ));
        assert!(matches!(
            lambda.stop(),
            Err(CloudCostError::UnsupportedOperation { .. })
        ));
        assert!(lambda.is_running());
    }

    #[test]
    fn test_lambda_rejects_invalid_input() {
        assert!(LambdaFunction::new("fn", "us-east-1", 1000, 0, 0.0).is_err());
        assert!(LambdaFunction::new("fn", "us-east-1", 128, 0, -1.0).is_err());
        assert!(LambdaFunction::new("", "us-east-1", 128, 0, 0.0).is_err());
    }

    #[test]
    fn test_lambda_setters() {
        let mut lambda = LambdaFunction::new("fn", "us-east-1", 512, 10, 50.0).unwrap();
        lambda.set_monthly_invocations(2_000_000);
        assert_eq!(lambda.monthly_invocations(), 2_000_000);

        assert!(lambda.set_avg_duration_ms(-5.0).is_err());
        assert_eq!(lambda.avg_duration_ms(), 50.0); // Unchanged after rejection
        lambda.set_avg_duration_ms(120.5).unwrap();
        assert_eq!(lambda.avg_duration_ms(), 120.5);
    }

    #[test]
    fn test_identity_by_id() {
        let a = Ec2Instance::new("i-1", "us-east-1", "t2.micro").unwrap();
        let b = Ec2Instance::new("i-1", "eu-west-1", "t2.medium").unwrap();
        let c = Ec2Instance::new("i-2", "us-east-1", "t2.micro").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
