//! Cost report rendering
//!
//! Turns a [`ResourceManager`] into text tables or JSON. Only the
//! manager's query surface is used here; no pricing logic.

use crate::config::ReportConfig;
use crate::error::Result;
use crate::manager::ResourceManager;
use crate::resource::CloudResource;
use crate::utils::{format_monthly, format_usd, resource_count};
use comfy_table::{Cell, CellAlignment, Table};
use std::fmt;

fn resource_table(resources: &[&dyn CloudResource], precision: usize) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Resource", "Type", "Region", "Status", "Monthly Cost"]);
    for r in resources {
        table.add_row(vec![
            Cell::new(r.resource_id()),
            Cell::new(r.resource_type().as_str()),
            Cell::new(r.region().as_str()),
            Cell::new(r.status().as_str()),
            Cell::new(format_usd(r.get_cost(), precision)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// Text report over a manager, rendered through `Display`
pub struct TextReport<'a> {
    manager: &'a ResourceManager,
    config: &'a ReportConfig,
}

impl<'a> TextReport<'a> {
    pub fn new(manager: &'a ResourceManager, config: &'a ReportConfig) -> Self {
        Self { manager, config }
    }

    fn section(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
        writeln!(f, "\n{} {} {}", "=".repeat(20), title, "=".repeat(20))
    }

    fn group(
        &self,
        f: &mut fmt::Formatter<'_>,
        label: &str,
        resources: &[&dyn CloudResource],
    ) -> fmt::Result {
        let precision = self.config.precision;
        let subtotal: f64 = resources.iter().map(|r| r.get_cost()).sum();
        writeln!(
            f,
            "\n  [{}] ({}, {})",
            label,
            resource_count(resources.len()),
            format_monthly(subtotal, precision)
        )?;
        writeln!(f, "{}", resource_table(resources, precision))
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = self.config.precision;

        if self.config.show_types {
            Self::section(f, "Resources by Type")?;
            for resource_type in self.manager.types() {
                self.group(f, resource_type, &self.manager.by_type(resource_type))?;
            }
        }

        if self.config.show_regions {
            Self::section(f, "Resources by Region")?;
            for region in self.manager.regions() {
                self.group(f, region, &self.manager.by_region(region))?;
            }
        }

        let report = self.manager.generate_report();
        Self::section(f, "Cost Report")?;
        writeln!(f, "\n  Total Resources: {}", report.total_count)?;
        writeln!(
            f,
            "  Total Monthly Cost: {}",
            format_usd(report.total_cost, precision)
        )?;

        let mut counts = Table::new();
        counts.set_header(vec!["Group", "Name", "Count"]);
        for (region, count) in &report.resources_by_region {
            counts.add_row(vec![
                Cell::new("region"),
                Cell::new(region),
                Cell::new(count).set_alignment(CellAlignment::Right),
            ]);
        }
        for (resource_type, count) in &report.resources_by_type {
            counts.add_row(vec![
                Cell::new("type"),
                Cell::new(resource_type),
                Cell::new(count).set_alignment(CellAlignment::Right),
            ]);
        }
        writeln!(f, "{}", counts)
    }
}

/// Render the by-type, by-region and summary sections as text
pub fn render_text(manager: &ResourceManager, config: &ReportConfig) -> String {
    TextReport::new(manager, config).to_string()
}

/// Render the full report as pretty JSON
pub fn render_json(manager: &ResourceManager) -> Result<String> {
    Ok(serde_json::to_string_pretty(&manager.generate_report().to_json())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::create_resources_from_list;
    use crate::inventory::sample_inventory;

    fn sample_manager() -> ResourceManager {
        let mut manager = ResourceManager::new();
        for resource in create_resources_from_list(&sample_inventory()).unwrap() {
            manager.add(resource).unwrap();
        }
        manager.start_all().unwrap();
        manager
    }

    #[test]
    fn test_render_text_sections() {
        let text = render_text(&sample_manager(), &ReportConfig::default());
        assert!(text.contains("Resources by Type"));
        assert!(text.contains("Resources by Region"));
        assert!(text.contains("[EC2Instance] (2 resources"));
        assert!(text.contains("[ap-northeast-1] (1 resource,"));
        assert!(text.contains("Total Resources: 7"));
        assert!(text.contains("i-web-server-01"));
    }

    #[test]
    fn test_render_text_hides_sections() {
        let config = ReportConfig {
            precision: 2,
            show_regions: false,
            show_types: false,
        };
        let text = render_text(&sample_manager(), &config);
        assert!(!text.contains("Resources by Type"));
        assert!(!text.contains("Resources by Region"));
        assert!(text.contains("Total Monthly Cost"));
    }

    #[test]
    fn test_text_report_display_matches_render_text() {
        let manager = sample_manager();
        let config = ReportConfig::default();
        let shown = format!("{}", TextReport::new(&manager, &config));
        assert_eq!(shown, render_text(&manager, &config));
        assert!(shown.contains("Total Monthly Cost: $539.23"));
    }

    #[test]
    fn test_render_json() {
        let manager = sample_manager();
        let json: serde_json::Value = serde_json::from_str(&render_json(&manager).unwrap()).unwrap();
        assert_eq!(json["total_count"], 7);
        assert_eq!(json["resources_by_region"]["us-west-2"], 2);
        let total = json["total_cost"].as_f64().unwrap();
        assert!((total - manager.total_cost()).abs() < 1e-9);
    }
}
