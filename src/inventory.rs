//! Resource inventory files
//!
//! An inventory is a list of factory records. Accepted layouts:
//!
//! - JSON: a top-level array, or an object with a `resources` array
//! - TOML: `[[resources]]` tables
//!
//! Loading only parses; records are validated when passed to the factory.

use crate::error::{ConfigError, Result};
use serde_json::{json, Value};
use std::path::Path;
use tracing::debug;

/// Read inventory records from a JSON or TOML file, chosen by extension
pub fn load_inventory(path: &Path) -> Result<Vec<Value>> {
    let content = std::fs::read_to_string(path)?;
    let is_toml = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false);

    let records = if is_toml {
        parse_toml_inventory(&content)?
    } else {
        parse_json_inventory(&content)?
    };
    debug!(path = %path.display(), count = records.len(), "loaded inventory");
    Ok(records)
}

pub fn parse_json_inventory(content: &str) -> Result<Vec<Value>> {
    let value: Value =
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    extract_records(value)
}

pub fn parse_toml_inventory(content: &str) -> Result<Vec<Value>> {
    let table: toml::Value =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    extract_records(serde_json::to_value(table)?)
}

fn extract_records(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(records) => Ok(records),
        Value::Object(mut map) => match map.remove("resources") {
            Some(Value::Array(records)) => Ok(records),
            Some(_) => Err(ConfigError::InvalidValue {
                field: "resources".to_string(),
                reason: "must be an array of resource records".to_string(),
            }
            .into()),
            None => Ok(Vec::new()),
        },
        _ => Err(ConfigError::InvalidValue {
            field: "inventory".to_string(),
            reason: "expected an array or an object with a 'resources' array".to_string(),
        }
        .into()),
    }
}

/// Demo inventory: two EC2 instances, a Lambda function, two S3 buckets,
/// an EBS volume and a Multi-AZ RDS database
pub fn sample_inventory() -> Vec<Value> {
    vec![
        json!({
            "type": "ec2",
            "resource_id": "i-web-server-01",
            "region": "us-east-1",
            "instance_type": "t2.small",
        }),
        json!({
            "type": "ec2",
            "resource_id": "i-api-server-01",
            "region": "us-east-1",
            "instance_type": "t2.medium",
        }),
        json!({
            "type": "lambda",
            "resource_id": "data-processor",
            "region": "us-east-1",
            "memory_mb": 1024,
            "monthly_invocations": 5_000_000,
            "avg_duration_ms": 200,
        }),
        json!({
            "type": "s3",
            "resource_id": "app-assets-bucket",
            "region": "us-west-2",
            "storage_gb": 500,
        }),
        json!({
            "type": "s3",
            "resource_id": "backup-bucket",
            "region": "us-west-2",
            "storage_gb": 2000,
        }),
        json!({
            "type": "ebs",
            "resource_id": "vol-data-01",
            "region": "us-east-1",
            "volume_type": "gp3",
            "size_gb": 500,
        }),
        json!({
            "type": "rds",
            "resource_id": "prod-database",
            "region": "ap-northeast-1",
            "instance_class": "db.r5.large",
            "engine": "postgresql",
            "storage_gb": 200,
            "multi_az": true,
        }),
    ]
}
