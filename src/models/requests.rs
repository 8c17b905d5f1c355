use serde::{Deserialize, Serialize};
use validator::Validate;

/// Audience selector for an SMS campaign
///
/// Unrecognised values select the explicit contractor list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsTarget {
    Contractors,
    Partners,
    Employees,
    #[serde(other)]
    Custom,
}

/// Request to prepare a targeted SMS campaign
///
/// POST /api/ghl-sync/sms-campaign
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SmsCampaignRequest {
    #[serde(rename = "targetType", default)]
    pub target_type: Option<SmsTarget>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "contractorIds", default)]
    pub contractor_ids: Vec<i32>,
    #[validate(length(min = 1, message = "message is required"))]
    #[serde(default)]
    pub message: String,
    #[validate(length(min = 1))]
    #[serde(rename = "campaignName", default = "default_campaign_name")]
    pub campaign_name: String,
}

fn default_campaign_name() -> String {
    "TPE SMS Campaign".to_string()
}
