/// Format a USD amount, e.g. `$16.79`
pub fn format_usd(amount: f64, precision: usize) -> String {
    format!("${:.*}", precision, amount)
}

/// Format a monthly USD amount, e.g. `$16.79/month`
pub fn format_monthly(amount: f64, precision: usize) -> String {
    format!("{}/month", format_usd(amount, precision))
}

/// Pluralize `resource` for a count
pub fn resource_count(count: usize) -> String {
    if count == 1 {
        "1 resource".to_string()
    } else {
        format!("{} resources", count)
    }
}
