//! Resource registry and cost aggregation
//!
//! Owns every registered resource, keyed by resource id, and answers
//! cost and inventory queries over them. Pricing lives entirely in the
//! resources; the manager only sums and counts.
//!
//! The manager is a plain owned value with `&mut self` mutators. Callers
//! that share one across threads wrap it in a single `Mutex`.

use crate::error::{CloudCostError, ResourceId, Result};
use crate::resource::CloudResource;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use tracing::{debug, warn};

/// Registry of owned cloud resources
#[derive(Default)]
pub struct ResourceManager {
    resources: HashMap<ResourceId, Box<dyn CloudResource>>,
    // Insertion order, so listings and reports are stable.
    order: Vec<ResourceId>,
}

impl ResourceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource, taking ownership
    ///
    /// Fails with `ResourceExists` if the id is already registered. The
    /// rejected resource is consumed and dropped, and the registry keeps
    /// the resource it already held. Check [`contains`](Self::contains)
    /// first to keep ownership of a candidate that may collide.
    pub fn add(&mut self, resource: Box<dyn CloudResource>) -> Result<()> {
        let resource_id = resource.resource_id().to_string();

        if self.resources.contains_key(&resource_id) {
            warn!(%resource_id, "duplicate resource id rejected");
            return Err(CloudCostError::ResourceExists {
                resource_type: resource.resource_type().as_str().to_string(),
                resource_id,
            });
        }

        debug!(%resource_id, resource_type = %resource.resource_type(), "resource registered");
        self.order.push(resource_id.clone());
        self.resources.insert(resource_id, resource);
        Ok(())
    }

    /// Remove a resource and hand ownership back to the caller
    pub fn remove(&mut self, resource_id: &str) -> Result<Box<dyn CloudResource>> {
        let resource =
            self.resources
                .remove(resource_id)
                .ok_or_else(|| CloudCostError::ResourceNotFound {
                    resource_id: resource_id.to_string(),
                })?;
        self.order.retain(|id| id != resource_id);
        debug!(%resource_id, "resource removed");
        Ok(resource)
    }

    /// Get resource by ID
    pub fn get(&self, resource_id: &str) -> Option<&dyn CloudResource> {
        self.resources.get(resource_id).map(|r| r.as_ref())
    }

    /// Get resource by ID for lifecycle changes or setter access
    pub fn get_mut(&mut self, resource_id: &str) -> Option<&mut (dyn CloudResource + 'static)> {
        self.resources.get_mut(resource_id).map(|r| r.as_mut())
    }

    /// Check if resource exists
    pub fn contains(&self, resource_id: &str) -> bool {
        self.resources.contains_key(resource_id)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// All resources, in registration order
    pub fn list_all(&self) -> Vec<&dyn CloudResource> {
        self.iter().collect()
    }

    fn iter(&self) -> impl Iterator<Item = &dyn CloudResource> + '_ {
        self.order
            .iter()
            .filter_map(move |id| self.resources.get(id).map(|r| r.as_ref()))
    }

    /// Sum of monthly costs; 0.0 when empty
    pub fn total_cost(&self) -> f64 {
        self.iter().map(|r| r.get_cost()).sum()
    }

    /// Resources in a region (exact, case-sensitive match on the region code)
    pub fn by_region(&self, region: &str) -> Vec<&dyn CloudResource> {
        self.iter().filter(|r| r.region().as_str() == region).collect()
    }

    /// Resources of a type (case-insensitive match on the type tag)
    pub fn by_type(&self, type_name: &str) -> Vec<&dyn CloudResource> {
        self.iter()
            .filter(|r| r.resource_type().matches(type_name))
            .collect()
    }

    /// Distinct region codes in use, sorted
    pub fn regions(&self) -> Vec<&'static str> {
        self.unique_values(|r| r.region().as_str())
    }

    /// Distinct type tags in use, sorted
    pub fn types(&self) -> Vec<&'static str> {
        self.unique_values(|r| r.resource_type().as_str())
    }

    fn unique_values<F>(&self, extractor: F) -> Vec<&'static str>
    where
        F: Fn(&dyn CloudResource) -> &'static str,
    {
        self.iter()
            .map(extractor)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Start every resource that has a lifecycle; always-on kinds are skipped
    ///
    /// Returns the ids whose state actually changed.
    pub fn start_all(&mut self) -> Result<Vec<ResourceId>> {
        let mut started = Vec::new();
        for id in &self.order {
            if let Some(resource) = self.resources.get_mut(id) {
                if resource.supports_lifecycle() && resource.start()? {
                    started.push(id.clone());
                }
            }
        }
        Ok(started)
    }

    /// Aggregate cost and inventory counts in a single pass
    pub fn generate_report(&self) -> CostReport<'_> {
        let mut total_cost = 0.0;
        let mut resources = Vec::with_capacity(self.resources.len());
        let mut by_region: BTreeMap<&'static str, usize> = BTreeMap::new();
        let mut by_type: BTreeMap<&'static str, usize> = BTreeMap::new();

        for resource in self.iter() {
            total_cost += resource.get_cost();
            *by_region.entry(resource.region().as_str()).or_insert(0) += 1;
            *by_type.entry(resource.resource_type().as_str()).or_insert(0) += 1;
            resources.push(resource);
        }

        CostReport {
            total_cost,
            total_count: resources.len(),
            resources,
            resources_by_region: by_region,
            resources_by_type: by_type,
            generated_at: Utc::now(),
        }
    }
}

impl fmt::Debug for ResourceManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceManager(resources={})", self.resources.len())
    }
}

/// Snapshot of registry cost and composition
#[derive(Debug)]
pub struct CostReport<'a> {
    pub total_cost: f64,
    pub total_count: usize,
    pub resources: Vec<&'a dyn CloudResource>,
    pub resources_by_region: BTreeMap<&'static str, usize>,
    pub resources_by_type: BTreeMap<&'static str, usize>,
    pub generated_at: DateTime<Utc>,
}

impl CostReport<'_> {
    /// Render as JSON, with each resource expanded through `get_info`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "total_cost": self.total_cost,
            "total_count": self.total_count,
            "resources": self.resources.iter().map(|r| r.get_info()).collect::<Vec<_>>(),
            "resources_by_region": self.resources_by_region,
            "resources_by_type": self.resources_by_type,
            "generated_at": self.generated_at.to_rfc3339(),
        })
    }
}
