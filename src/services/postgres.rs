use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::config::DatabaseSettings;
use crate::core::{ContactRows, ContentSource, TagList};
use crate::models::{
    Book, ContactPerson, Contractor, ContractorContactRow, Event, Partner, PartnerContactRow,
    Podcast, StaffContact, StaffRole,
};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// PostgreSQL client for the TPE tables
///
/// Read-only: contractors, books, podcasts, events and strategic partners are
/// owned by the main platform. Raw focus-area columns are cast to text and
/// decoded into `TagList` here, so nothing downstream sees the stored encoding.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(settings: &DatabaseSettings) -> Result<Self, PostgresError> {
        tracing::info!(
            "Connecting to PostgreSQL (max: {} connections)",
            settings.max_connections
        );

        Self::new(
            &settings.url,
            settings.max_connections,
            settings.min_connections,
            Duration::from_secs(settings.acquire_timeout_secs),
            Duration::from_secs(settings.idle_timeout_secs),
        )
        .await
    }

    /// Fetch the focus data of one contractor
    pub async fn get_contractor(&self, contractor_id: i32) -> Result<Contractor, PostgresError> {
        let query = r#"
            SELECT id, focus_areas::text AS focus_areas, primary_focus_area
            FROM contractors
            WHERE id = $1
        "#;

        let row = sqlx::query(query)
            .bind(contractor_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PostgresError::NotFound(format!("Contractor {}", contractor_id)))?;

        Ok(Contractor {
            id: row.try_get("id")?,
            focus_areas: tags(&row, "contractors", "focus_areas")?,
            primary_focus_area: row.try_get("primary_focus_area")?,
        })
    }

    /// All active books as raw rows, ordered by title
    pub async fn list_books(&self) -> Result<Vec<Value>, PostgresError> {
        self.fetch_json(
            "SELECT to_jsonb(b) AS row FROM books b WHERE b.is_active = true ORDER BY b.title",
        )
        .await
    }

    /// All active podcasts as raw rows, ordered by name
    pub async fn list_podcasts(&self) -> Result<Vec<Value>, PostgresError> {
        self.fetch_json(PODCAST_LISTING).await
    }

    /// All active events still open for registration, ordered by deadline
    pub async fn list_events(&self) -> Result<Vec<Value>, PostgresError> {
        self.fetch_json(
            r#"
            SELECT to_jsonb(e) AS row
            FROM events e
            WHERE e.is_active = true
              AND (e.registration_deadline IS NULL OR e.registration_deadline > CURRENT_DATE)
            ORDER BY e.registration_deadline
            "#,
        )
        .await
    }

    async fn fetch_json(&self, query: &str) -> Result<Vec<Value>, PostgresError> {
        let rows = sqlx::query(query).fetch_all(&self.pool).await?;

        rows.iter()
            .map(|row| row.try_get::<Value, _>("row").map_err(PostgresError::from))
            .collect()
    }

    /// Contractors with an email address, newest first
    pub async fn contractors_for_sync(&self) -> Result<Vec<ContractorContactRow>, PostgresError> {
        let query = format!(
            "{} WHERE email IS NOT NULL ORDER BY created_at DESC",
            CONTRACTOR_CONTACT_SELECT
        );

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        let contractors = rows
            .iter()
            .map(contractor_contact_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Loaded {} contractors for sync", contractors.len());
        Ok(contractors)
    }

    /// Specific contractors that have a phone number
    pub async fn contractors_by_ids(
        &self,
        contractor_ids: &[i32],
    ) -> Result<Vec<ContractorContactRow>, PostgresError> {
        let query = format!(
            "{} WHERE id = ANY($1) AND phone IS NOT NULL ORDER BY id",
            CONTRACTOR_CONTACT_SELECT
        );

        let rows = sqlx::query(&query)
            .bind(contractor_ids)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(contractor_contact_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    /// Partner CEO and department-head contacts, newest partners first
    pub async fn partner_contacts(&self) -> Result<Vec<PartnerContactRow>, PostgresError> {
        let query = r#"
            SELECT id, company_name,
                   ceo_contact_name, ceo_contact_email, ceo_contact_phone, ceo_contact_title,
                   service_category::text AS service_category,
                   employee_count::text AS employee_count,
                   established_year::text AS established_year,
                   sales_contact_name, sales_contact_email, sales_contact_phone, sales_contact_title,
                   cx_contact_name, cx_contact_email, cx_contact_phone, cx_contact_title,
                   marketing_contact_name, marketing_contact_email, marketing_contact_phone, marketing_contact_title,
                   onboarding_contact_name, onboarding_contact_email, onboarding_contact_phone, onboarding_contact_title
            FROM strategic_partners
            ORDER BY created_at DESC
        "#;

        let rows = sqlx::query(query).fetch_all(&self.pool).await?;
        let partners = rows
            .iter()
            .map(partner_contact_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Loaded {} partners for sync", partners.len());
        Ok(partners)
    }

    /// Load every row needed for a full contact export
    pub async fn contact_rows(&self) -> Result<ContactRows, PostgresError> {
        let (contractors, partners) =
            tokio::try_join!(self.contractors_for_sync(), self.partner_contacts())?;

        Ok(ContactRows {
            contractors,
            partners,
        })
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

impl ContentSource for PostgresClient {
    type Error = PostgresError;

    async fn active_books(&self) -> Result<Vec<Book>, PostgresError> {
        let query = r#"
            SELECT to_jsonb(b) AS row
            FROM (
                SELECT id, COALESCE(title, '') AS title, author, description,
                       cover_image_url, amazon_url,
                       topics::text AS topics,
                       focus_areas_covered::text AS focus_areas_covered,
                       key_takeaways::text AS key_takeaways,
                       reading_time::text AS reading_time
                FROM books
                WHERE is_active = true
            ) b
            ORDER BY b.id
        "#;

        Ok(decode_rows("books", self.fetch_json(query).await?))
    }

    async fn active_podcasts(&self) -> Result<Vec<Podcast>, PostgresError> {
        let query = r#"
            SELECT to_jsonb(p) AS row
            FROM (
                SELECT id,
                       COALESCE(title, to_jsonb(podcasts)->>'name', '') AS name,
                       host, description, logo_url, website, frequency,
                       topics::text AS topics,
                       focus_areas_covered::text AS focus_areas_covered,
                       '' AS target_audience
                FROM podcasts
                WHERE is_active = true
            ) p
            ORDER BY p.id
        "#;

        Ok(decode_rows("podcasts", self.fetch_json(query).await?))
    }

    async fn upcoming_events(&self) -> Result<Vec<Event>, PostgresError> {
        let query = r#"
            SELECT to_jsonb(e) AS row
            FROM (
                SELECT id, COALESCE(name, '') AS name, description, logo_url, website,
                       date::text AS date, location::text AS location, format::text AS format,
                       expected_attendees::text AS attendees,
                       focus_areas_covered::text AS focus_areas_covered,
                       '' AS target_audience,
                       registration_deadline::date AS registration_deadline
                FROM events
                WHERE is_active = true
                  AND (registration_deadline IS NULL OR registration_deadline > CURRENT_DATE)
            ) e
            ORDER BY e.registration_deadline
        "#;

        Ok(decode_rows("events", self.fetch_json(query).await?))
    }

    async fn active_partners(&self) -> Result<Vec<Partner>, PostgresError> {
        let query = r#"
            SELECT to_jsonb(sp) AS row
            FROM (
                SELECT id, COALESCE(company_name, '') AS company_name,
                       COALESCE(description, unique_value) AS description,
                       logo_url, website,
                       '' AS service_categories,
                       powerconfidence_score::float8 AS powerconfidence_score,
                       key_differentiators::text AS key_differentiators,
                       to_jsonb(testimonials) AS testimonials,
                       to_jsonb(success_stories) AS success_stories,
                       COALESCE(focus_areas_served::text, focus_areas::text) AS focus_areas_served
                FROM strategic_partners
                WHERE is_active = true
            ) sp
            ORDER BY sp.powerconfidence_score DESC
        "#;

        Ok(decode_rows("strategic_partners", self.fetch_json(query).await?))
    }
}

/// Decode selector rows, skipping any row that does not fit the model
///
/// One malformed row never hides the rest of its table from matching.
fn decode_rows<T: DeserializeOwned>(table: &str, rows: Vec<Value>) -> Vec<T> {
    let total = rows.len();
    let decoded: Vec<T> = rows
        .into_iter()
        .filter_map(|row| {
            let id = row.get("id").cloned().unwrap_or(Value::Null);
            match serde_json::from_value(row) {
                Ok(entity) => Some(entity),
                Err(e) => {
                    tracing::warn!(table, %id, "Skipping undecodable row: {}", e);
                    None
                }
            }
        })
        .collect();

    if decoded.len() < total {
        tracing::warn!(table, skipped = total - decoded.len(), "Some rows were skipped");
    }

    decoded
}

/// Raw podcast rows; `name` falls back to `title` for title-only rows
const PODCAST_LISTING: &str = r#"
    SELECT to_jsonb(p)
           || jsonb_build_object('name', COALESCE(to_jsonb(p)->>'name', p.title)) AS row
    FROM podcasts p
    WHERE p.is_active = true
    ORDER BY COALESCE(to_jsonb(p)->>'name', p.title)
"#;

const CONTRACTOR_CONTACT_SELECT: &str = r#"
    SELECT id, name, email, phone, company_name,
           annual_revenue::text AS annual_revenue,
           team_size::text AS team_size,
           service_area::text AS service_area,
           focus_areas::text AS focus_areas,
           current_stage::text AS current_stage
    FROM contractors
"#;

/// Decode a text-cast focus-area column into a `TagList`
fn tags(row: &PgRow, table: &str, column: &str) -> Result<TagList, sqlx::Error> {
    let raw: Option<String> = row.try_get(column)?;
    Ok(TagList::parse_field(&format!("{}.{}", table, column), raw.as_deref()))
}

fn contractor_contact_from_row(row: &PgRow) -> Result<ContractorContactRow, sqlx::Error> {
    Ok(ContractorContactRow {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        company_name: row.try_get("company_name")?,
        annual_revenue: row.try_get("annual_revenue")?,
        team_size: row.try_get("team_size")?,
        service_area: row.try_get("service_area")?,
        focus_areas: tags(row, "contractors", "focus_areas")?,
        current_stage: row.try_get("current_stage")?,
    })
}

fn contact_person(row: &PgRow, prefix: &str) -> Result<ContactPerson, sqlx::Error> {
    Ok(ContactPerson {
        name: row.try_get(format!("{}_contact_name", prefix).as_str())?,
        email: row.try_get(format!("{}_contact_email", prefix).as_str())?,
        phone: row.try_get(format!("{}_contact_phone", prefix).as_str())?,
        title: row.try_get(format!("{}_contact_title", prefix).as_str())?,
    })
}

fn partner_contact_from_row(row: &PgRow) -> Result<PartnerContactRow, sqlx::Error> {
    let staff = StaffRole::ALL
        .into_iter()
        .map(|role| -> Result<StaffContact, sqlx::Error> {
            Ok(StaffContact {
                role,
                person: contact_person(row, role.column_prefix())?,
            })
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()?;

    Ok(PartnerContactRow {
        id: row.try_get("id")?,
        company_name: row.try_get("company_name")?,
        ceo: contact_person(row, "ceo")?,
        service_categories: tags(row, "strategic_partners", "service_category")?,
        employee_count: row.try_get("employee_count")?,
        established_year: row.try_get("established_year")?,
        staff,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_podcast_title_still_decodes() {
        let rows = vec![
            json!({
                "id": 1,
                "name": null,
                "host": null,
                "description": null,
                "logo_url": null,
                "website": null,
                "frequency": null,
                "topics": null,
                "focus_areas_covered": "[\"operations\"]",
                "target_audience": ""
            }),
            json!({
                "id": 2,
                "name": "Ops Pod",
                "host": "Host",
                "description": "Weekly ops talk",
                "logo_url": "https://example.com/logo.png",
                "website": "https://example.com",
                "frequency": "Weekly",
                "topics": "{growth}",
                "focus_areas_covered": "{operations}",
                "target_audience": ""
            }),
        ];

        let podcasts: Vec<Podcast> = decode_rows("podcasts", rows);

        assert_eq!(podcasts.len(), 2);
        assert_eq!(podcasts[0].name, "");
        assert_eq!(podcasts[0].host, "");
        assert_eq!(podcasts[0].focus_areas_covered.as_slice(), ["operations".to_string()]);
        assert_eq!(podcasts[1].name, "Ops Pod");
        assert!(podcasts[1].topics.contains("growth"));
    }

    #[test]
    fn test_null_display_columns_decode_as_empty() {
        let books: Vec<Book> = decode_rows(
            "books",
            vec![json!({ "id": 1, "title": null, "focus_areas_covered": "operations" })],
        );
        assert_eq!(books[0].title, "");
        assert!(books[0].reading_time.is_none());

        let events: Vec<Event> = decode_rows(
            "events",
            vec![json!({
                "id": 3,
                "name": null,
                "attendees": null,
                "registration_deadline": "2030-05-01",
                "focus_areas_covered": "[\"hiring\"]"
            })],
        );
        assert_eq!(events[0].name, "");
        assert_eq!(events[0].attendees, "");
        assert_eq!(
            events[0].registration_deadline,
            chrono::NaiveDate::from_ymd_opt(2030, 5, 1)
        );

        let partners: Vec<Partner> = decode_rows(
            "strategic_partners",
            vec![json!({
                "id": 4,
                "company_name": null,
                "description": null,
                "powerconfidence_score": 80,
                "testimonials": [{ "quote": "great" }],
                "success_stories": null,
                "focus_areas_served": "{marketing_sales}"
            })],
        );
        assert_eq!(partners[0].company_name, "");
        assert_eq!(partners[0].powerconfidence_score, Some(80.0));
        assert!(partners[0].success_stories.is_none());
    }

    #[test]
    fn test_undecodable_row_skipped_not_fatal() {
        let rows = vec![
            json!({ "id": "not-a-number", "name": "Broken" }),
            json!({ "id": 7, "name": "Kept", "focus_areas_covered": "operations" }),
        ];

        let podcasts: Vec<Podcast> = decode_rows("podcasts", rows);

        assert_eq!(podcasts.len(), 1);
        assert_eq!(podcasts[0].id, 7);
        assert_eq!(podcasts[0].name, "Kept");
    }

    #[test]
    fn test_podcast_listing_projects_fallback_name() {
        assert!(PODCAST_LISTING
            .contains("jsonb_build_object('name', COALESCE(to_jsonb(p)->>'name', p.title))"));
        assert!(PODCAST_LISTING.contains("ORDER BY COALESCE(to_jsonb(p)->>'name', p.title)"));
    }
}
