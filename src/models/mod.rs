// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Book, ContactPerson, ContactType, Contractor, ContractorContactRow, ContentType, Event,
    ExternalContact, MatchLimits, Partner, PartnerContactRow, Podcast, Scored, ScoringWeights,
    StaffContact, StaffRole,
};
pub use requests::{SmsCampaignRequest, SmsTarget};
pub use responses::{
    AggregatedMatches, ErrorResponse, FailedPush, HealthResponse, SmsCampaignResponse,
    SmsCampaignSummary, SyncBreakdown, SyncContactsResponse, TriggerSyncResponse,
};
