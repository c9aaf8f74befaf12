use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

/// Which article an editor session belongs to.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ArticleKey {
    New,
    Existing(Uuid),
}

impl fmt::Display for ArticleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArticleKey::New => write!(f, "new"),
            ArticleKey::Existing(id) => write!(f, "{}", id),
        }
    }
}

impl std::str::FromStr for ArticleKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "new" => Ok(Self::New),
            other => Uuid::parse_str(other)
                .map(Self::Existing)
                .map_err(|_| format!("invalid article key: {}", s)),
        }
    }
}

impl From<ArticleKey> for String {
    fn from(key: ArticleKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for ArticleKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Uuid> for ArticleKey {
    fn from(id: Uuid) -> Self {
        ArticleKey::Existing(id)
    }
}

/// The editor fields an autosave snapshot tracks.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotFields {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub category: String,
    pub tags: Vec<String>,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSnapshot {
    pub article_key: ArticleKey,
    #[serde(flatten)]
    pub fields: SnapshotFields,
    pub saved_at: DateTime<Utc>,
}

impl DraftSnapshot {
    pub fn belongs_to(&self, key: &ArticleKey) -> bool {
        &self.article_key == key
    }
}
