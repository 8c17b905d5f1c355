use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use crate::models::{ExternalContact, FailedPush};

/// Errors that can occur when pushing contacts to GHL
#[derive(Debug, Error)]
pub enum GhlError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Webhook returned {status}: {body}")]
    ApiError { status: u16, body: String },
}

/// Result of pushing a batch of contacts
#[derive(Debug, Clone, Default)]
pub struct PushReport {
    pub pushed: usize,
    pub failed: Vec<FailedPush>,
}

/// Client for the GoHighLevel inbound contact webhook
///
/// Contacts are posted one per request, in order. A failed contact is
/// recorded in the report and the batch continues; nothing is retried.
pub struct GhlClient {
    webhook_url: String,
    client: Client,
}

impl GhlClient {
    /// Create a new GHL webhook client
    pub fn new(webhook_url: String, timeout: Duration) -> Result<Self, GhlError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            webhook_url,
            client,
        })
    }

    /// Push a single contact
    pub async fn push_contact(&self, contact: &ExternalContact) -> Result<(), GhlError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(contact)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GhlError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!("Pushed {} contact {}", contact.contact_type.as_str(), contact.tpe_id);
        Ok(())
    }

    /// Push every contact, collecting failures instead of stopping
    pub async fn push_contacts(&self, contacts: &[ExternalContact]) -> PushReport {
        let mut report = PushReport::default();

        for contact in contacts {
            match self.push_contact(contact).await {
                Ok(()) => report.pushed += 1,
                Err(e) => {
                    tracing::warn!("Failed to push contact {} to GHL: {}", contact.tpe_id, e);
                    report.failed.push(FailedPush {
                        tpe_id: contact.tpe_id.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "GHL push finished: {} pushed, {} failed",
            report.pushed,
            report.failed.len()
        );

        report
    }
}
