//! Registry of list endpoints, for callers that pick a collection at runtime.

use std::fmt;
use std::str::FromStr;

use crate::models::Record;
use crate::services::client::ApiClient;
use crate::services::resource::{FieldToggle, Resource};
use crate::services::{
    blog, certification, comment, contact, education, experience, newsletter, project, settings,
    skill, testimonial,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Blogs,
    Projects,
    Certifications,
    Experiences,
    Education,
    Skills,
    Testimonials,
    Contacts,
    Comments,
    Subscribers,
    Campaigns,
    Users,
    Visitors,
    Logs,
}

impl Collection {
    pub const ALL: [Collection; 14] = [
        Self::Blogs,
        Self::Projects,
        Self::Certifications,
        Self::Experiences,
        Self::Education,
        Self::Skills,
        Self::Testimonials,
        Self::Contacts,
        Self::Comments,
        Self::Subscribers,
        Self::Campaigns,
        Self::Users,
        Self::Visitors,
        Self::Logs,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Blogs => "blogs",
            Self::Projects => "projects",
            Self::Certifications => "certifications",
            Self::Experiences => "experiences",
            Self::Education => "education",
            Self::Skills => "skills",
            Self::Testimonials => "testimonials",
            Self::Contacts => "contacts",
            Self::Comments => "comments",
            Self::Subscribers => "subscribers",
            Self::Campaigns => "campaigns",
            Self::Users => "users",
            Self::Visitors => "visitors",
            Self::Logs => "logs",
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Self::Blogs => blog::PATH,
            Self::Projects => project::PATH,
            Self::Certifications => certification::PATH,
            Self::Experiences => experience::PATH,
            Self::Education => education::PATH,
            Self::Skills => skill::PATH,
            Self::Testimonials => testimonial::PATH,
            Self::Contacts => contact::PATH,
            Self::Comments => comment::PATH,
            Self::Subscribers => newsletter::SUBSCRIBERS_PATH,
            Self::Campaigns => newsletter::CAMPAIGNS_PATH,
            Self::Users => settings::USERS_PATH,
            Self::Visitors => "visitors",
            Self::Logs => "logs",
        }
    }

    /// Key of the items array for collections that use the nested shape.
    pub fn items_key(&self) -> Option<&'static str> {
        match self {
            Self::Contacts => Some(contact::ITEMS_KEY),
            Self::Comments => Some(comment::ITEMS_KEY),
            Self::Subscribers => Some("subscribers"),
            Self::Campaigns => Some("campaigns"),
            Self::Users => Some("users"),
            Self::Visitors => Some("visitors"),
            Self::Logs => Some("logs"),
            _ => None,
        }
    }

    /// Whether the API exposes `toggle` for this collection.
    pub fn supports(&self, toggle: &FieldToggle) -> bool {
        match toggle {
            FieldToggle::Active => matches!(
                self,
                Self::Projects | Self::Certifications | Self::Skills | Self::Testimonials | Self::Users
            ),
            FieldToggle::Featured => matches!(self, Self::Projects | Self::Testimonials),
            FieldToggle::Verified => matches!(self, Self::Testimonials),
            FieldToggle::Published => matches!(self, Self::Blogs),
            FieldToggle::Spam => matches!(self, Self::Contacts),
            FieldToggle::Status(_) => matches!(
                self,
                Self::Contacts | Self::Comments | Self::Subscribers | Self::Campaigns
            ),
        }
    }

    /// Untyped resource for this collection.
    pub fn records(&self, client: &ApiClient) -> Resource<Record> {
        match self.items_key() {
            Some(key) => Resource::nested(client, self.path(), key),
            None => Resource::flat(client, self.path()),
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|c| c.name()).collect();
                format!("unknown collection `{s}` (expected one of: {})", names.join(", "))
            })
    }
}
