use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::core::{
    breakdown, format_contacts_for_export, format_contractor_contacts, select_sms_recipients,
    ContactRows,
};
use crate::models::{
    ContactType, ErrorResponse, ExternalContact, SmsCampaignRequest, SmsCampaignResponse,
    SmsCampaignSummary, SmsTarget, SyncContactsResponse, TriggerSyncResponse,
};
use crate::routes::AppState;
use crate::services::{PostgresClient, PostgresError};

/// Configure GHL contact sync routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/ghl-sync")
            .route("/sync-all", web::post().to(sync_all_contacts))
            .route("/trigger-sync", web::post().to(trigger_sync))
            .route("/sms-campaign", web::post().to(prepare_sms_campaign)),
    );
}

/// Export every contractor, partner and partner employee contact
///
/// POST /api/ghl-sync/sync-all
async fn sync_all_contacts(state: web::Data<AppState>) -> impl Responder {
    let rows = match state.postgres.contact_rows().await {
        Ok(rows) => rows,
        Err(e) => return state.internal_error("Failed to sync contacts to GHL", &e),
    };

    let contacts = rows.export_all();
    let counts = breakdown(&contacts);

    tracing::info!(
        "Prepared {} contacts for GHL sync ({} contractors, {} partners, {} employees)",
        contacts.len(),
        counts.contractors,
        counts.partners,
        counts.employees
    );

    HttpResponse::Ok().json(SyncContactsResponse {
        success: true,
        message: format!("{} contacts ready for GHL sync", contacts.len()),
        contacts,
        breakdown: counts,
    })
}

/// Push every contact to the configured GHL webhook
///
/// POST /api/ghl-sync/trigger-sync
async fn trigger_sync(state: web::Data<AppState>) -> impl Responder {
    let Some(ghl) = state.ghl.as_ref() else {
        return HttpResponse::ServiceUnavailable()
            .json(ErrorResponse::new("GHL webhook is not configured"));
    };

    let rows = match state.postgres.contact_rows().await {
        Ok(rows) => rows,
        Err(e) => return state.internal_error("Failed to load contacts for GHL sync", &e),
    };

    let contacts = rows.export_all();
    let report = ghl.push_contacts(&contacts).await;

    HttpResponse::Ok().json(TriggerSyncResponse {
        success: report.failed.is_empty(),
        message: format!(
            "{} of {} contacts pushed to GHL",
            report.pushed,
            contacts.len()
        ),
        pushed: report.pushed,
        failed: report.failed,
    })
}

/// Prepare a targeted SMS campaign
///
/// POST /api/ghl-sync/sms-campaign
///
/// Request body:
/// ```json
/// {
///   "targetType": "contractors|partners|employees|custom",
///   "tags": ["focus-operations"],
///   "contractorIds": [1, 2],
///   "message": "string",
///   "campaignName": "string"
/// }
/// ```
async fn prepare_sms_campaign(
    state: web::Data<AppState>,
    req: web::Json<SmsCampaignRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::with_details(
            "Validation failed",
            errors.to_string(),
        ));
    }

    let req = req.into_inner();

    let contacts = match load_campaign_contacts(&state.postgres, req.target_type, &req.contractor_ids).await {
        Ok(contacts) => contacts,
        Err(e) => return state.internal_error("Failed to prepare SMS campaign", &e),
    };

    let recipients = select_sms_recipients(contacts, &req.tags);

    tracing::info!(
        "SMS campaign '{}' prepared for {} contacts",
        req.campaign_name,
        recipients.len()
    );

    HttpResponse::Ok().json(SmsCampaignResponse {
        success: true,
        message: format!("SMS campaign prepared for {} contacts", recipients.len()),
        campaign: SmsCampaignSummary {
            name: req.campaign_name,
            target_type: req.target_type,
            tags: req.tags,
            contact_count: recipients.len(),
            message: req.message,
        },
        contacts: recipients,
    })
}

/// Contacts for a campaign audience
///
/// Any target other than the three named audiences falls back to the explicit
/// contractor id list; with no ids the audience is empty.
async fn load_campaign_contacts(
    postgres: &PostgresClient,
    target: Option<SmsTarget>,
    contractor_ids: &[i32],
) -> Result<Vec<ExternalContact>, PostgresError> {
    match target {
        Some(SmsTarget::Contractors) => {
            let rows = ContactRows {
                contractors: postgres.contractors_for_sync().await?,
                partners: Vec::new(),
            };
            Ok(format_contacts_for_export(&rows, ContactType::Contractor))
        }
        Some(SmsTarget::Partners) | Some(SmsTarget::Employees) => {
            let rows = ContactRows {
                contractors: Vec::new(),
                partners: postgres.partner_contacts().await?,
            };
            let contact_type = if target == Some(SmsTarget::Partners) {
                ContactType::Partner
            } else {
                ContactType::PartnerEmployee
            };
            Ok(format_contacts_for_export(&rows, contact_type))
        }
        _ if !contractor_ids.is_empty() => {
            let rows = postgres.contractors_by_ids(contractor_ids).await?;
            Ok(format_contractor_contacts(&rows))
        }
        _ => Ok(Vec::new()),
    }
}
