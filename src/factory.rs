//! Resource factory
//!
//! Builds resources from loosely-typed configuration records, e.g.
//!
//! ```json
//! { "type": "ec2", "resource_id": "i-123", "region": "us-east-1", "instance_type": "t2.micro" }
//! ```
//!
//! The `type` tag accepts the full type name or its short alias in any
//! case. The remaining keys are deserialized into a per-kind parameter
//! record, so missing, unknown, or mistyped fields are rejected before any
//! resource is built.

use crate::compute::{Ec2Instance, LambdaFunction};
use crate::database::RdsDatabase;
use crate::error::{CloudCostError, Result};
use crate::resource::{CloudResource, ResourceKind};
use crate::storage::{EbsVolume, S3Bucket};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Ec2Params {
    resource_id: String,
    region: String,
    instance_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LambdaParams {
    resource_id: String,
    region: String,
    memory_mb: u32,
    #[serde(default)]
    monthly_invocations: u64,
    #[serde(default)]
    avg_duration_ms: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct S3Params {
    resource_id: String,
    region: String,
    storage_gb: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EbsParams {
    resource_id: String,
    region: String,
    volume_type: String,
    size_gb: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RdsParams {
    resource_id: String,
    region: String,
    instance_class: String,
    engine: String,
    storage_gb: u32,
    #[serde(default)]
    multi_az: bool,
}

/// Sorted list of type tags the factory can build
pub fn supported_resource_types() -> Vec<&'static str> {
    ResourceKind::supported()
}

fn parse_params<T: DeserializeOwned>(kind: ResourceKind, params: &Map<String, Value>) -> Result<T> {
    serde_json::from_value(Value::Object(params.clone())).map_err(|e| {
        CloudCostError::invalid("params", format!("Invalid parameters for {}: {}", kind, e))
    })
}

/// Create a resource from a type tag and its constructor parameters
pub fn create_resource(
    resource_type: &str,
    params: &Map<String, Value>,
) -> Result<Box<dyn CloudResource>> {
    let kind = ResourceKind::from_alias(resource_type)?;

    let resource: Box<dyn CloudResource> = match kind {
        ResourceKind::Ec2Instance => {
            let p: Ec2Params = parse_params(kind, params)?;
            Box::new(Ec2Instance::new(p.resource_id, &p.region, &p.instance_type)?)
        }
        ResourceKind::LambdaFunction => {
            let p: LambdaParams = parse_params(kind, params)?;
            Box::new(LambdaFunction::new(
                p.resource_id,
                &p.region,
                p.memory_mb,
                p.monthly_invocations,
                p.avg_duration_ms,
            )?)
        }
        ResourceKind::S3Bucket => {
            let p: S3Params = parse_params(kind, params)?;
            Box::new(S3Bucket::new(p.resource_id, &p.region, p.storage_gb)?)
        }
        ResourceKind::EbsVolume => {
            let p: EbsParams = parse_params(kind, params)?;
            Box::new(EbsVolume::new(
                p.resource_id,
                &p.region,
                &p.volume_type,
                p.size_gb,
            )?)
        }
        ResourceKind::RdsDatabase => {
            let p: RdsParams = parse_params(kind, params)?;
            Box::new(RdsDatabase::new(
                p.resource_id,
                &p.region,
                &p.instance_class,
                &p.engine,
                p.storage_gb,
                p.multi_az,
            )?)
        }
    };

    debug!(resource_id = %resource.resource_id(), resource_type = %kind, "resource created");
    Ok(resource)
}

/// Create a resource from a record carrying its own `type` key
pub fn create_resource_from_value(record: &Value) -> Result<Box<dyn CloudResource>> {
    let mut fields = record
        .as_object()
        .cloned()
        .ok_or_else(|| CloudCostError::invalid("record", "Resource record must be an object"))?;

    let resource_type = match fields.remove("type") {
        Some(Value::String(t)) => t,
        Some(other) => {
            return Err(CloudCostError::invalid(
                "type",
                format!("Resource 'type' must be a string, got: {}", other),
            ))
        }
        None => {
            return Err(CloudCostError::invalid(
                "type",
                "Resource record must contain 'type' key",
            ))
        }
    };

    create_resource(&resource_type, &fields)
}

/// Build every record or none; errors carry the offending index
pub fn create_resources_from_list(records: &[Value]) -> Result<Vec<Box<dyn CloudResource>>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            create_resource_from_value(record).map_err(|e| CloudCostError::Batch {
                index,
                source: Box::new(e),
            })
        })
        .collect()
}
