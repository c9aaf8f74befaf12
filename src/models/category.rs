use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::common::ValidationError;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub color: String,
    pub display_order: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CategoryCreate {
    pub name: String,
    pub slug: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub color: Option<String>,
    pub display_order: Option<i32>,
    pub active: Option<bool>,
}

fn default_color() -> String {
    "#1f6feb".to_string()
}

fn default_active() -> bool {
    true
}

impl CategoryUpdate {
    pub fn is_empty(&self) -> bool {
        matches!(
            self,
            Self {
                name: None,
                slug: None,
                color: None,
                display_order: None,
                active: None,
            }
        )
    }
}

impl CategoryCreate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingCategoryName);
        }
        if !is_valid_slug(&self.slug) {
            return Err(ValidationError::InvalidSlug(self.slug.clone()));
        }
        if !is_hex_color(&self.color) {
            return Err(ValidationError::InvalidColor(self.color.clone()));
        }
        Ok(())
    }
}

impl CategoryUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ValidationError::MissingCategoryName);
        }
        if let Some(slug) = self.slug.as_deref().filter(|s| !is_valid_slug(s)) {
            return Err(ValidationError::InvalidSlug(slug.to_string()));
        }
        if let Some(color) = self.color.as_deref().filter(|c| !is_hex_color(c)) {
            return Err(ValidationError::InvalidColor(color.to_string()));
        }
        Ok(())
    }
}

/// Lowercase alphanumerics, hyphens and underscores, at most 255 bytes.
pub fn is_valid_slug(slug: &str) -> bool {
    if slug.is_empty() || slug.len() > 255 {
        return false;
    }

    slug.chars().all(|c| {
        c.is_ascii_lowercase()
            || c.is_ascii_digit()
            || c == '-'
            || c == '_'
    })
}

/// `#rrggbb`
pub fn is_hex_color(color: &str) -> bool {
    let Some(hex) = color.strip_prefix('#') else {
        return false;
    };

    hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit())
}
