use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{Publication, PublicationStatus};

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub category: String,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    pub fn publication(&self) -> Publication {
        Publication {
            published: self.published,
            published_at: self.published_at,
        }
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> PublicationStatus {
        self.publication().status_at(now)
    }

    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        crate::services::is_publicly_visible(
            self.published,
            self.published_at,
            now,
        )
    }
}

/// A validated article ready to be inserted.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ArticleCreate {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub category: String,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub publication: Publication,
}

/// A validated partial update. `None` leaves the column untouched.
///
/// `image_url: Some("")` clears the image.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ArticleUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub publication: Option<Publication>,
}

impl ArticleUpdate {
    pub fn is_empty(&self) -> bool {
        matches!(
            self,
            Self {
                title: None,
                content: None,
                excerpt: None,
                category: None,
                tags: None,
                image_url: None,
                publication: None,
            }
        )
    }
}

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleQuery {
    pub category: Option<String>,
    pub tag: Option<String>,
    pub search: Option<String>,
    pub status: Option<PublicationStatus>,
    #[serde(default)]
    pub visible_only: bool,
    //------------------------------------
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl ArticleQuery {
    /// Visible articles only, optionally in one category.
    pub fn public(category: Option<String>) -> Self {
        Self {
            category,
            visible_only: true,
            ..Default::default()
        }
    }

    /// In-memory version of the SQL filter.
    pub fn matches(&self, article: &Article, now: DateTime<Utc>) -> bool {
        if self.visible_only && !article.is_visible_at(now) {
            return false;
        }

        if let Some(category) = &self.category {
            if &article.category != category {
                return false;
            }
        }

        if let Some(tag) = &self.tag {
            if !article.tags.iter().any(|t| t == tag) {
                return false;
            }
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !article.title.to_lowercase().contains(&needle) {
                return false;
            }
        }

        match self.status {
            Some(status) => article.status_at(now) == status,
            None => true,
        }
    }
}
