use crate::core::tags::TagList;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Kind of matchable content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Book,
    Podcast,
    Event,
    Partner,
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ContentType::Book => "book",
            ContentType::Podcast => "podcast",
            ContentType::Event => "event",
            ContentType::Partner => "partner",
        };
        f.write_str(name)
    }
}

/// Contractor focus data used for matching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contractor {
    pub id: i32,
    #[serde(default)]
    pub focus_areas: TagList,
    #[serde(default)]
    pub primary_focus_area: Option<String>,
}

impl Contractor {
    /// Primary focus area, treating a blank value as absent
    pub fn primary_focus(&self) -> Option<&str> {
        self.primary_focus_area
            .as_deref()
            .map(str::trim)
            .filter(|area| !area.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: i32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub amazon_url: Option<String>,
    #[serde(default)]
    pub topics: TagList,
    #[serde(default)]
    pub focus_areas_covered: TagList,
    #[serde(default)]
    pub key_takeaways: TagList,
    pub reading_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Podcast {
    pub id: i32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub host: String,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub logo_url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub website: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub frequency: String,
    #[serde(default)]
    pub topics: TagList,
    #[serde(default)]
    pub focus_areas_covered: TagList,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub target_audience: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: i32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub logo_url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub website: String,
    pub date: Option<String>,
    pub location: Option<String>,
    pub format: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub attendees: String,
    #[serde(default)]
    pub focus_areas_covered: TagList,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub target_audience: String,
    pub registration_deadline: Option<NaiveDate>,
}

/// Strategic partner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partner {
    pub id: i32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub company_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub logo_url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub website: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub service_categories: String,
    /// PowerConfidence rating, 0-100
    pub powerconfidence_score: Option<f64>,
    #[serde(default)]
    pub key_differentiators: TagList,
    pub testimonials: Option<serde_json::Value>,
    pub success_stories: Option<serde_json::Value>,
    #[serde(default)]
    pub focus_areas_served: TagList,
}

/// Nullable display text; NULL decodes as an empty string
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A matched entity with its score, serialized flat as
/// `{ ...entity, "type": ..., "matchScore": ... }`
#[derive(Debug, Clone, Serialize)]
pub struct Scored<T> {
    #[serde(flatten)]
    pub entity: T,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(rename = "matchScore")]
    pub match_score: f64,
}

/// Scoring weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    /// Added per candidate tag equal to the contractor's primary focus
    pub primary: f64,
    /// Added per candidate tag found among the contractor's other focus areas
    pub secondary: f64,
    /// PowerConfidence score is divided by this for the partner bonus
    pub confidence_divisor: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            primary: 3.0,
            secondary: 1.0,
            confidence_divisor: 20.0,
        }
    }
}

/// Number of results kept per content type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchLimits {
    pub books: usize,
    pub podcasts: usize,
    pub events: usize,
    pub partners: usize,
}

impl Default for MatchLimits {
    fn default() -> Self {
        Self {
            books: 1,
            podcasts: 1,
            events: 1,
            partners: 2,
        }
    }
}

/// Contractor row as loaded for CRM export
#[derive(Debug, Clone, Default)]
pub struct ContractorContactRow {
    pub id: i32,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub annual_revenue: Option<String>,
    pub team_size: Option<String>,
    pub service_area: Option<String>,
    pub focus_areas: TagList,
    pub current_stage: Option<String>,
}

/// Name, email, phone and title of one person at a partner company
#[derive(Debug, Clone, Default)]
pub struct ContactPerson {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub title: Option<String>,
}

/// Department heads stored on a partner row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffRole {
    Sales,
    CustomerExperience,
    Marketing,
    Operations,
}

impl StaffRole {
    pub const ALL: [StaffRole; 4] = [
        StaffRole::Sales,
        StaffRole::CustomerExperience,
        StaffRole::Marketing,
        StaffRole::Operations,
    ];

    /// Column prefix on the partner table
    pub fn column_prefix(self) -> &'static str {
        match self {
            StaffRole::Sales => "sales",
            StaffRole::CustomerExperience => "cx",
            StaffRole::Marketing => "marketing",
            StaffRole::Operations => "onboarding",
        }
    }

    /// Suffix appended to the partner id to form the contact id
    pub fn id_suffix(self) -> &'static str {
        match self {
            StaffRole::Sales => "sales",
            StaffRole::CustomerExperience => "cx",
            StaffRole::Marketing => "marketing",
            StaffRole::Operations => "operations",
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            StaffRole::Sales => "sales-head",
            StaffRole::CustomerExperience => "cx-head",
            StaffRole::Marketing => "marketing-head",
            StaffRole::Operations => "operations-head",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StaffRole::Sales => "sales",
            StaffRole::CustomerExperience => "customer-experience",
            StaffRole::Marketing => "marketing",
            StaffRole::Operations => "operations",
        }
    }

    pub fn default_title(self) -> &'static str {
        match self {
            StaffRole::Sales => "Sales Manager",
            StaffRole::CustomerExperience => "CX Manager",
            StaffRole::Marketing => "Marketing Manager",
            StaffRole::Operations => "Operations Manager",
        }
    }
}

#[derive(Debug, Clone)]
pub struct StaffContact {
    pub role: StaffRole,
    pub person: ContactPerson,
}

/// Partner row as loaded for CRM export
#[derive(Debug, Clone, Default)]
pub struct PartnerContactRow {
    pub id: i32,
    pub company_name: Option<String>,
    pub ceo: ContactPerson,
    pub service_categories: TagList,
    pub employee_count: Option<String>,
    pub established_year: Option<String>,
    pub staff: Vec<StaffContact>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContactType {
    Contractor,
    Partner,
    PartnerEmployee,
}

impl ContactType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContactType::Contractor => "contractor",
            ContactType::Partner => "partner",
            ContactType::PartnerEmployee => "partner-employee",
        }
    }
}

/// Contact record in the shape the CRM integration expects
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalContact {
    pub contact_type: ContactType,
    pub tpe_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_name: String,
    pub tags: Vec<String>,
    pub custom_fields: serde_json::Value,
}
