// Core algorithm exports
pub mod aggregator;
pub mod export;
pub mod matcher;
pub mod scoring;
pub mod tags;

pub use aggregator::{AggregateOutcome, ContentSource};
pub use export::{
    breakdown, format_contacts_for_export, format_contractor_contacts,
    format_partner_contacts, format_partner_employee_contacts, select_sms_recipients,
    ContactRows,
};
pub use matcher::{select_top, Matchable, Matcher};
pub use scoring::{calculate_match_score, confidence_bonus};
pub use tags::{TagEncoding, TagList};
