use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BulkAction, PublishIntent};

/// Editor form for a new article.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ArticleDraft {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Defaults to saving as a draft.
    #[serde(default)]
    pub intent: Option<PublishIntent>,
}

/// Editor form for an existing article. Absent fields are left alone.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub intent: Option<PublishIntent>,
}

impl ArticlePatch {
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
                intent: None,
            }
        )
    }
}

/// Every mutation the admin API accepts, tagged by `op`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
pub enum ArticleRequest {
    Create { fields: ArticleDraft },
    Update { id: Uuid, fields: ArticlePatch },
    Delete { id: Uuid },
    Transition { id: Uuid, intent: PublishIntent },
    Bulk { ids: Vec<Uuid>, action: BulkAction },
}

impl ArticleRequest {
    pub fn op(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::Transition { .. } => "transition",
            Self::Bulk { .. } => "bulk",
        }
    }
}
