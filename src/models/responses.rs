use serde::{Deserialize, Serialize};
use crate::core::tags::TagList;
use crate::models::domain::{Book, Event, ExternalContact, Partner, Podcast, Scored};
use crate::models::requests::SmsTarget;
use crate::services::CacheStats;

/// Response for the aggregated matches endpoint
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedMatches {
    pub book: Option<Scored<Book>>,
    pub podcast: Option<Scored<Podcast>>,
    pub event: Option<Scored<Event>>,
    pub partners: Vec<Scored<Partner>>,
    #[serde(rename = "focusAreas")]
    pub focus_areas: TagList,
    #[serde(rename = "primaryFocus")]
    pub primary_focus: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub match_cache: CacheStats,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncBreakdown {
    pub contractors: usize,
    pub partners: usize,
    pub employees: usize,
}

/// Response for the sync-all endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncContactsResponse {
    pub success: bool,
    pub message: String,
    pub contacts: Vec<ExternalContact>,
    pub breakdown: SyncBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedPush {
    #[serde(rename = "tpeId")]
    pub tpe_id: String,
    pub error: String,
}

/// Response for the trigger-sync endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerSyncResponse {
    pub success: bool,
    pub message: String,
    pub pushed: usize,
    pub failed: Vec<FailedPush>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsCampaignSummary {
    pub name: String,
    #[serde(rename = "targetType")]
    pub target_type: Option<SmsTarget>,
    pub tags: Vec<String>,
    #[serde(rename = "contactCount")]
    pub contact_count: usize,
    pub message: String,
}

/// Response for the SMS campaign endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsCampaignResponse {
    pub success: bool,
    pub message: String,
    pub campaign: SmsCampaignSummary,
    pub contacts: Vec<ExternalContact>,
}
