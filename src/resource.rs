//! Common contract for billable cloud resources
//!
//! Every concrete resource (EC2, Lambda, S3, EBS, RDS) implements
//! [`CloudResource`]. The set of kinds is closed and enumerated by
//! [`ResourceKind`], which is also the tag used for filtering, reporting
//! and factory dispatch.
//!
//! Identity: two resources are equal iff they are the same kind and carry
//! the same `resource_id`. Hashing follows the same rule.

use crate::error::{CloudCostError, Result};
use crate::pricing::Region;
use crate::validation::validate_resource_id;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::debug;

/// Lifecycle state of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    Running,
    Stopped,
}

impl ResourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceStatus::Running => "running",
            ResourceStatus::Stopped => "stopped",
        }
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type tag identifying the concrete resource variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Ec2Instance,
    LambdaFunction,
    S3Bucket,
    EbsVolume,
    RdsDatabase,
}

impl ResourceKind {
    pub const ALL: &'static [ResourceKind] = &[
        ResourceKind::Ec2Instance,
        ResourceKind::LambdaFunction,
        ResourceKind::S3Bucket,
        ResourceKind::EbsVolume,
        ResourceKind::RdsDatabase,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Ec2Instance => "EC2Instance",
            ResourceKind::LambdaFunction => "LambdaFunction",
            ResourceKind::S3Bucket => "S3Bucket",
            ResourceKind::EbsVolume => "EBSVolume",
            ResourceKind::RdsDatabase => "RDSDatabase",
        }
    }

    /// Short alias accepted by the factory (`ec2`, `s3`, ...)
    pub fn alias(&self) -> &'static str {
        match self {
            ResourceKind::Ec2Instance => "ec2",
            ResourceKind::LambdaFunction => "lambda",
            ResourceKind::S3Bucket => "s3",
            ResourceKind::EbsVolume => "ebs",
            ResourceKind::RdsDatabase => "rds",
        }
    }

    /// Sorted list of type tags
    pub fn supported() -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Self::ALL.iter().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Case-insensitive match against the full type tag
    pub fn matches(&self, type_name: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(type_name)
    }

    /// Resolve a tag or short alias, case-insensitively
    ///
    /// Accepts `EC2Instance`, `ec2instance`, `ec2`, `S3`, ...
    pub fn from_alias(type_name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.matches(type_name) || k.alias().eq_ignore_ascii_case(type_name))
            .ok_or_else(|| CloudCostError::UnknownResourceType {
                type_name: type_name.to_string(),
                supported: Self::supported().into_iter().map(String::from).collect(),
            })
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability set shared by every resource kind
pub trait CloudResource: fmt::Debug + fmt::Display + Any {
    fn resource_id(&self) -> &str;

    fn region(&self) -> Region;

    fn status(&self) -> ResourceStatus;

    fn resource_type(&self) -> ResourceKind;

    fn is_running(&self) -> bool {
        self.status() == ResourceStatus::Running
    }

    /// Whether `start`/`stop` are meaningful for this kind
    fn supports_lifecycle(&self) -> bool;

    /// Transition to running. Returns `Ok(false)` if already running.
    fn start(&mut self) -> Result<bool>;

    /// Transition to stopped. Returns `Ok(false)` if already stopped.
    fn stop(&mut self) -> Result<bool>;

    /// Monthly cost in USD for the current configuration and state
    fn get_cost(&self) -> f64;

    /// Snapshot of identity, billing inputs and computed cost
    fn get_info(&self) -> serde_json::Value;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn CloudResource {
    /// Borrow the concrete resource, if it is a `T`
    pub fn downcast_ref<T: CloudResource>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutably borrow the concrete resource, if it is a `T`
    pub fn downcast_mut<T: CloudResource>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

impl PartialEq for dyn CloudResource {
    fn eq(&self, other: &Self) -> bool {
        self.resource_type() == other.resource_type() && self.resource_id() == other.resource_id()
    }
}

impl Eq for dyn CloudResource {}

impl Hash for dyn CloudResource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.resource_type().hash(state);
        self.resource_id().hash(state);
    }
}

/// Identity, placement and lifecycle state embedded in every resource
#[derive(Debug, Clone)]
pub(crate) struct ResourceCore {
    pub(crate) resource_id: String,
    pub(crate) region: Region,
    pub(crate) status: ResourceStatus,
}

impl ResourceCore {
    pub(crate) fn new(resource_id: String, region: &str, status: ResourceStatus) -> Result<Self> {
        validate_resource_id(&resource_id)?;
        let region = Region::parse(region)?;
        Ok(Self {
            resource_id,
            region,
            status,
        })
    }

    pub(crate) fn start(&mut self) -> bool {
        if self.status == ResourceStatus::Running {
            return false;
        }
        self.status = ResourceStatus::Running;
        debug!(resource_id = %self.resource_id, "resource started");
        true
    }

    pub(crate) fn stop(&mut self) -> bool {
        if self.status == ResourceStatus::Stopped {
            return false;
        }
        self.status = ResourceStatus::Stopped;
        debug!(resource_id = %self.resource_id, "resource stopped");
        true
    }
}

/// Error for start/stop on an always-on resource
pub(crate) fn unsupported_lifecycle(kind: ResourceKind, operation: &str, reason: &str) -> CloudCostError {
    CloudCostError::UnsupportedOperation {
        resource_type: kind.as_str().to_string(),
        operation: operation.to_string(),
        reason: reason.to_string(),
    }
}

/// Implement equality and hashing by resource id for a concrete resource.
macro_rules! impl_resource_identity {
    ($ty:ty) => {
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                self.core.resource_id == other.core.resource_id
            }
        }

        impl Eq for $ty {}

        impl std::hash::Hash for $ty {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                self.core.resource_id.hash(state);
            }
        }
    };
}

pub(crate) use impl_resource_identity;
