use serde_json::json;

use crate::models::{
    ContactType, ContractorContactRow, ExternalContact, PartnerContactRow, SyncBreakdown,
};

const SOURCE: &str = "tpe_platform";

/// Rows loaded for a contact export
#[derive(Debug, Clone, Default)]
pub struct ContactRows {
    pub contractors: Vec<ContractorContactRow>,
    pub partners: Vec<PartnerContactRow>,
}

impl ContactRows {
    /// Every contact: contractors, then partner CEOs, then partner employees
    pub fn export_all(&self) -> Vec<ExternalContact> {
        let mut contacts = format_contractor_contacts(&self.contractors);
        contacts.extend(format_partner_contacts(&self.partners));
        contacts.extend(format_partner_employee_contacts(&self.partners));
        contacts
    }
}

/// Format the rows of one contact type for the CRM
pub fn format_contacts_for_export(rows: &ContactRows, contact_type: ContactType) -> Vec<ExternalContact> {
    match contact_type {
        ContactType::Contractor => format_contractor_contacts(&rows.contractors),
        ContactType::Partner => format_partner_contacts(&rows.partners),
        ContactType::PartnerEmployee => format_partner_employee_contacts(&rows.partners),
    }
}

pub fn format_contractor_contacts(rows: &[ContractorContactRow]) -> Vec<ExternalContact> {
    rows.iter().map(format_contractor).collect()
}

fn format_contractor(row: &ContractorContactRow) -> ExternalContact {
    let mut tags = vec![
        "tpe-contractor".to_string(),
        "customer".to_string(),
        format!("stage-{}", or_unknown(row.current_stage.as_deref())),
        format!("revenue-{}", or_unknown(row.annual_revenue.as_deref())),
        format!("team-size-{}", or_unknown(row.team_size.as_deref())),
    ];
    tags.extend(row.focus_areas.iter().map(|area| format!("focus-{}", slugify(area))));

    let (first_name, last_name) = split_name(row.name.as_deref());

    ExternalContact {
        contact_type: ContactType::Contractor,
        tpe_id: row.id.to_string(),
        first_name,
        last_name,
        email: row.email.clone(),
        phone: row.phone.clone(),
        company_name: row.company_name.clone().unwrap_or_default(),
        tags,
        custom_fields: json!({
            "tpe_contractor_id": row.id,
            "contact_type": ContactType::Contractor.as_str(),
            "annual_revenue": row.annual_revenue,
            "team_size": row.team_size,
            "service_area": row.service_area,
            "focus_areas": row.focus_areas.as_slice().join(", "),
            "current_stage": row.current_stage,
            "source": SOURCE,
        }),
    }
}

/// Partner CEO/owner contacts; partners without a CEO email are skipped
pub fn format_partner_contacts(rows: &[PartnerContactRow]) -> Vec<ExternalContact> {
    rows.iter()
        .filter(|row| non_blank(row.ceo.email.as_deref()).is_some())
        .map(format_partner)
        .collect()
}

fn format_partner(row: &PartnerContactRow) -> ExternalContact {
    let mut tags = vec![
        "tpe-partner".to_string(),
        "strategic-partner".to_string(),
        "ceo".to_string(),
        company_tag(row.company_name.as_deref()),
        format!("employees-{}", or_unknown(row.employee_count.as_deref())),
    ];
    tags.extend(
        row.service_categories
            .iter()
            .map(|category| format!("service-{}", slugify(category))),
    );

    let (first_name, last_name) = split_name(row.ceo.name.as_deref());

    ExternalContact {
        contact_type: ContactType::Partner,
        tpe_id: row.id.to_string(),
        first_name,
        last_name,
        email: row.ceo.email.clone(),
        phone: row.ceo.phone.clone(),
        company_name: row.company_name.clone().unwrap_or_default(),
        tags,
        custom_fields: json!({
            "tpe_partner_id": row.id,
            "contact_type": ContactType::Partner.as_str(),
            "role": "ceo",
            "title": non_blank(row.ceo.title.as_deref()).unwrap_or("CEO"),
            "company_name": row.company_name,
            "employee_count": row.employee_count,
            "established_year": row.established_year,
            "service_categories": row.service_categories.as_slice().join(", "),
            "source": SOURCE,
        }),
    }
}

/// One contact per department head with an email on file
pub fn format_partner_employee_contacts(rows: &[PartnerContactRow]) -> Vec<ExternalContact> {
    let mut contacts = Vec::new();

    for row in rows {
        let company = company_tag(row.company_name.as_deref());

        for staff in &row.staff {
            if non_blank(staff.person.email.as_deref()).is_none() {
                continue;
            }

            let role = staff.role;
            let (first_name, last_name) = split_name(staff.person.name.as_deref());

            contacts.push(ExternalContact {
                contact_type: ContactType::PartnerEmployee,
                tpe_id: format!("{}-{}", row.id, role.id_suffix()),
                first_name,
                last_name,
                email: staff.person.email.clone(),
                phone: staff.person.phone.clone(),
                company_name: row.company_name.clone().unwrap_or_default(),
                tags: vec![
                    "tpe-partner-employee".to_string(),
                    role.tag().to_string(),
                    company.clone(),
                ],
                custom_fields: json!({
                    "tpe_partner_id": row.id,
                    "contact_type": ContactType::PartnerEmployee.as_str(),
                    "role": role.label(),
                    "title": non_blank(staff.person.title.as_deref()).unwrap_or(role.default_title()),
                    "company_name": row.company_name,
                    "source": SOURCE,
                }),
            });
        }
    }

    contacts
}

/// Count contacts per contact type
pub fn breakdown(contacts: &[ExternalContact]) -> SyncBreakdown {
    contacts
        .iter()
        .fold(SyncBreakdown::default(), |mut acc, contact| {
            match contact.contact_type {
                ContactType::Contractor => acc.contractors += 1,
                ContactType::Partner => acc.partners += 1,
                ContactType::PartnerEmployee => acc.employees += 1,
            }
            acc
        })
}

/// Contacts reachable by SMS, optionally restricted to those carrying any of `tags`
pub fn select_sms_recipients(contacts: Vec<ExternalContact>, tags: &[String]) -> Vec<ExternalContact> {
    contacts
        .into_iter()
        .filter(|contact| non_blank(contact.phone.as_deref()).is_some())
        .filter(|contact| tags.is_empty() || contact.tags.iter().any(|tag| tags.contains(tag)))
        .collect()
}

/// Lower-case and replace whitespace runs with `-`
pub fn slugify(value: &str) -> String {
    value
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Split a full name into first and last name
///
/// A missing or blank name becomes `("Unknown", "")`.
pub fn split_name(name: Option<&str>) -> (String, String) {
    let mut parts = name.unwrap_or_default().split_whitespace();
    let first = parts.next().unwrap_or("Unknown").to_string();
    let last = parts.collect::<Vec<_>>().join(" ");
    (first, last)
}

fn company_tag(company_name: Option<&str>) -> String {
    match non_blank(company_name) {
        Some(name) => format!("company-{}", slugify(name)),
        None => "company-unknown".to_string(),
    }
}

fn or_unknown(value: Option<&str>) -> &str {
    non_blank(value).unwrap_or("unknown")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tags::TagList;
    use crate::models::{ContactPerson, StaffContact, StaffRole};

    fn contractor_row() -> ContractorContactRow {
        ContractorContactRow {
            id: 42,
            name: Some("Jane Q Doe".to_string()),
            email: Some("jane@example.com".to_string()),
            phone: Some("555-0100".to_string()),
            company_name: Some("Doe Roofing".to_string()),
            annual_revenue: Some("1m_5m".to_string()),
            team_size: Some("10-20".to_string()),
            service_area: Some("Phoenix".to_string()),
            focus_areas: TagList::from_list(["Marketing Sales", "operations"]),
            current_stage: Some("matching".to_string()),
        }
    }

    fn person(name: &str, email: Option<&str>) -> ContactPerson {
        ContactPerson {
            name: Some(name.to_string()),
            email: email.map(str::to_string),
            phone: Some("555-0199".to_string()),
            title: None,
        }
    }

    #[test]
    fn test_contractor_tags() {
        let contacts = format_contractor_contacts(&[contractor_row()]);
        let contact = &contacts[0];

        assert_eq!(
            contact.tags,
            vec![
                "tpe-contractor",
                "customer",
                "stage-matching",
                "revenue-1m_5m",
                "team-size-10-20",
                "focus-marketing-sales",
                "focus-operations",
            ]
        );
        assert_eq!(contact.first_name, "Jane");
        assert_eq!(contact.last_name, "Q Doe");
        assert_eq!(contact.tpe_id, "42");
        assert_eq!(contact.custom_fields["focus_areas"], "Marketing Sales, operations");
        assert_eq!(contact.custom_fields["source"], "tpe_platform");
    }

    #[test]
    fn test_missing_fields_become_unknown() {
        let row = ContractorContactRow {
            id: 1,
            current_stage: Some("".to_string()),
            ..Default::default()
        };
        let contact = &format_contractor_contacts(&[row])[0];

        assert_eq!(
            contact.tags,
            vec!["tpe-contractor", "customer", "stage-unknown", "revenue-unknown", "team-size-unknown"]
        );
        assert_eq!(contact.first_name, "Unknown");
        assert_eq!(contact.last_name, "");
    }

    #[test]
    fn test_partner_ceo_requires_email() {
        let rows = vec![
            PartnerContactRow {
                id: 7,
                company_name: Some("Acme Home Pros".to_string()),
                ceo: person("Sam Smith", Some("sam@acme.test")),
                service_categories: TagList::from_list(["Digital Marketing"]),
                employee_count: Some("50".to_string()),
                ..Default::default()
            },
            PartnerContactRow {
                id: 8,
                ceo: person("No Mail", None),
                ..Default::default()
            },
        ];

        let contacts = format_partner_contacts(&rows);

        assert_eq!(contacts.len(), 1);
        assert_eq!(
            contacts[0].tags,
            vec![
                "tpe-partner",
                "strategic-partner",
                "ceo",
                "company-acme-home-pros",
                "employees-50",
                "service-digital-marketing",
            ]
        );
        assert_eq!(contacts[0].custom_fields["title"], "CEO");
    }

    #[test]
    fn test_partner_employees() {
        let row = PartnerContactRow {
            id: 7,
            company_name: None,
            staff: vec![
                StaffContact {
                    role: StaffRole::Sales,
                    person: person("Sally Sales", Some("sales@acme.test")),
                },
                StaffContact {
                    role: StaffRole::Marketing,
                    person: person("Nobody", Some("  ")),
                },
                StaffContact {
                    role: StaffRole::Operations,
                    person: person("Olly Ops", Some("ops@acme.test")),
                },
            ],
            ..Default::default()
        };

        let contacts = format_partner_employee_contacts(&[row]);
        let ids: Vec<&str> = contacts.iter().map(|c| c.tpe_id.as_str()).collect();

        assert_eq!(ids, vec!["7-sales", "7-operations"]);
        assert_eq!(contacts[1].tags, vec!["tpe-partner-employee", "operations-head", "company-unknown"]);
        assert_eq!(contacts[1].custom_fields["title"], "Operations Manager");
        assert_eq!(contacts[1].custom_fields["role"], "operations");
    }

    #[test]
    fn test_breakdown_counts() {
        let rows = ContactRows {
            contractors: vec![contractor_row()],
            partners: vec![PartnerContactRow {
                id: 3,
                ceo: person("Ceo Person", Some("ceo@x.test")),
                staff: vec![StaffContact {
                    role: StaffRole::CustomerExperience,
                    person: person("Cx Person", Some("cx@x.test")),
                }],
                ..Default::default()
            }],
        };

        let all = rows.export_all();
        assert_eq!(
            breakdown(&all),
            SyncBreakdown {
                contractors: 1,
                partners: 1,
                employees: 1
            }
        );
        assert_eq!(format_contacts_for_export(&rows, ContactType::PartnerEmployee).len(), 1);
    }

    #[test]
    fn test_sms_recipients_filter_phone_and_tags() {
        let mut no_phone = format_contractor_contacts(&[contractor_row()]).remove(0);
        no_phone.phone = None;
        let with_phone = format_contractor_contacts(&[contractor_row()]).remove(0);

        let all = select_sms_recipients(vec![no_phone.clone(), with_phone.clone()], &[]);
        assert_eq!(all.len(), 1);

        let tagged = select_sms_recipients(vec![with_phone.clone()], &["focus-operations".to_string()]);
        assert_eq!(tagged.len(), 1);

        let untagged = select_sms_recipients(vec![with_phone], &["tpe-partner".to_string()]);
        assert!(untagged.is_empty());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Digital  Marketing\tServices"), "digital-marketing-services");
        assert_eq!(slugify("ops"), "ops");
    }
}
