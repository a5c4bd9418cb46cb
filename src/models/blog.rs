//! Blog posts under `content/blogs`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validation::{not_blank, unique_entries, IMAGE_URL};
use super::Entity;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    Draft,
    Published,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlogAuthor {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<BlogAuthor>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: String,
    pub status: BlogStatus,
    /// Returned by the publish toggle alongside `publishedAt`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub views_count: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Blog {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Body for creating or fully replacing a blog post.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BlogInput {
    #[validate(length(min = 3, max = 200), custom(function = "not_blank"))]
    pub title: String,
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
    #[validate(length(max = 500))]
    pub excerpt: String,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    #[validate(custom(function = "unique_entries"))]
    pub tags: Vec<String>,
    pub status: BlogStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 70))]
    pub seo_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 160))]
    pub seo_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = *IMAGE_URL, message = "cover image must be an image URL"))]
    pub cover_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlogStats {
    pub total: u64,
    pub published: u64,
    pub draft: u64,
    #[serde(default)]
    pub total_views: u64,
    #[serde(default)]
    pub total_likes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> BlogInput {
        BlogInput {
            title: "Ownership in practice".to_string(),
            content: "Body".to_string(),
            excerpt: "Short".to_string(),
            category: "rust".to_string(),
            tags: vec!["rust".to_string(), "memory".to_string()],
            status: BlogStatus::Draft,
            seo_title: None,
            seo_description: None,
            cover_image: Some("https://cdn.example.com/cover.webp".to_string()),
        }
    }

    #[test]
    fn valid_input_passes() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn duplicate_tags_fail() {
        let mut i = input();
        i.tags.push("rust".to_string());
        assert!(i.validate().is_err());
    }

    #[test]
    fn non_image_cover_fails() {
        let mut i = input();
        i.cover_image = Some("https://cdn.example.com/cover.txt".to_string());
        assert!(i.validate().is_err());
    }

    #[test]
    fn blank_title_fails() {
        let mut i = input();
        i.title = "     ".to_string();
        assert!(i.validate().is_err());
    }
}
