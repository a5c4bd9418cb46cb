//! Work experience entries under `content/experiences`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Entity;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(rename = "_id")]
    pub id: String,
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub location: String,
    pub start_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Experience {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "end_date_or_current"))]
pub struct ExperienceInput {
    #[validate(length(min = 2, max = 100))]
    pub company: String,
    #[validate(length(min = 2, max = 100))]
    pub position: String,
    pub location: String,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub is_current: bool,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    pub responsibilities: Vec<String>,
    pub achievements: Vec<String>,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub company_website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub team_size: Option<u32>,
}

/// A past role needs an end date; a current one must not have one.
fn end_date_or_current(input: &ExperienceInput) -> Result<(), validator::ValidationError> {
    match (input.is_current, input.end_date.as_deref()) {
        (true, Some(_)) | (false, None) => Err(validator::ValidationError::new("end_date")
            .with_message("set an end date or mark the role as current".into())),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceStats {
    pub total: u64,
    pub current: u64,
    pub past: u64,
    #[serde(default)]
    pub total_years_of_experience: f64,
    #[serde(default)]
    pub top_technologies: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ExperienceInput {
        ExperienceInput {
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            location: "Remote".to_string(),
            start_date: "2021-02-01".to_string(),
            end_date: None,
            is_current: true,
            description: "Built things".to_string(),
            responsibilities: vec![],
            achievements: vec![],
            skills: vec![],
            company_website: None,
            team_size: None,
        }
    }

    #[test]
    fn current_role_without_end_date_is_valid() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn past_role_needs_end_date() {
        let mut i = input();
        i.is_current = false;
        assert!(i.validate().is_err());
        i.end_date = Some("2023-01-01".to_string());
        assert!(i.validate().is_ok());
    }
}
