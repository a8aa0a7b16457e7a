use crate::utils::config::{GRAPH_API_VERSION, INSIGHTS_FIELDS};

/// Display version information
pub fn display_version() {
    println!("Daily Ads Report v{}", env!("CARGO_PKG_VERSION"));
    println!("Graph API: {}", GRAPH_API_VERSION);
    println!("Insights fields: {}", INSIGHTS_FIELDS);
    println!();
    println!("Daily Meta ads metrics, PDF reporting and email delivery.");
}
