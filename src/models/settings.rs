//! Site-wide portfolio settings and the admin profile.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validation::{HEX_COLOR, PHONE};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSettings {
    #[validate(regex(path = *HEX_COLOR))]
    pub primary_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = *HEX_COLOR))]
    pub secondary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = *HEX_COLOR))]
    pub accent_color: Option<String>,
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSettings {
    pub blog: bool,
    pub projects: bool,
    pub testimonials: bool,
    pub contact: bool,
    pub analytics: bool,
    pub chat_bot: bool,
    pub newsletter: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Validate)]
pub struct SocialSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub youtube: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactSettings {
    #[validate(email)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = *PHONE))]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub map_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSettings {
    #[validate(length(min = 1, max = 100))]
    pub site_name: String,
    #[validate(length(max = 300))]
    pub site_description: String,
    #[serde(default)]
    pub site_keywords: Vec<String>,
    #[validate(nested)]
    pub theme: ThemeSettings,
    #[serde(default)]
    pub features: FeatureSettings,
    #[serde(default)]
    #[validate(nested)]
    pub social: SocialSettings,
    #[validate(nested)]
    pub contact: ContactSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NotificationSettings {
    pub email: bool,
    pub push: bool,
    pub sms: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500))]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(regex(path = *PHONE))]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notifications: Option<NotificationSettings>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_theme_color_is_validated() {
        let settings = PortfolioSettings {
            site_name: "Folio".to_string(),
            site_description: "Work".to_string(),
            site_keywords: vec![],
            theme: ThemeSettings {
                primary_color: "blue".to_string(),
                secondary_color: None,
                accent_color: None,
                dark_mode: true,
                font_family: None,
            },
            features: FeatureSettings::default(),
            social: SocialSettings::default(),
            contact: ContactSettings {
                email: "me@example.com".to_string(),
                phone: Some("+15551234567".to_string()),
                address: None,
                map_url: None,
            },
        };
        assert!(settings.validate().is_err());

        let mut fixed = settings;
        fixed.theme.primary_color = "#1e40af".to_string();
        assert!(fixed.validate().is_ok());
    }
}
