//! TPE Matching - content matching and contact sync for The Power100 Experience
//!
//! Scores books, podcasts, events and strategic partners against a
//! contractor's focus areas, and formats contractor/partner records as CRM
//! contacts for GHL sync and SMS targeting.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{ContentSource, Matcher, TagList};
pub use crate::models::{AggregatedMatches, Contractor, ExternalContact, Scored, ScoringWeights};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let tags = TagList::parse(Some(r#"["marketing_sales"]"#));
        assert_eq!(tags.as_slice(), ["marketing_sales".to_string()]);
        assert_eq!(ScoringWeights::default().primary, 3.0);
    }
}
