use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display status of an article, derived from `published` and `published_at`.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    #[default]
    Draft,
    Scheduled,
    Published,
}

impl PublicationStatus {
    /// Classifies a `(published, published_at)` pair at `now`.
    ///
    /// A future `published_at` always wins over the `published` flag, so a
    /// record flagged live with a future date is still shown as scheduled.
    /// A past `published_at` on an unpublished record is a schedule that is
    /// due but not yet promoted.
    pub fn classify(
        published: bool,
        published_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        match (published, published_at) {
            (_, Some(at)) if at > now => Self::Scheduled,
            (true, _) => Self::Published,
            (false, Some(_)) => Self::Scheduled,
            (false, None) => Self::Draft,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Scheduled => "scheduled",
            Self::Published => "published",
        }
    }

    /// Label shown in the admin listing.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Draft => "Koncept",
            Self::Scheduled => "Naplánováno",
            Self::Published => "Publikováno",
        }
    }
}

impl std::fmt::Display for PublicationStatus {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl PartialEq<&str> for PublicationStatus {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl std::str::FromStr for PublicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "scheduled" => Ok(Self::Scheduled),
            "published" => Ok(Self::Published),
            _ => Err(format!("invalid publication status: {}", s)),
        }
    }
}

/// The persisted publication pair.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
}

impl Publication {
    pub const DRAFT: Self = Self {
        published: false,
        published_at: None,
    };

    pub fn status_at(&self, now: DateTime<Utc>) -> PublicationStatus {
        PublicationStatus::classify(
            self.published,
            self.published_at,
            now,
        )
    }
}

/// What an editor asked for when saving.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PublishIntent {
    /// "Publikovat okamžitě"
    PublishNow,
    /// "Uložit jako koncept"
    SaveDraft,
    /// "Naplánovat"
    Schedule { at: DateTime<Utc> },
}

/// Actions available on a multi-article selection.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    Publish,
    Unpublish,
    Delete,
}

impl BulkAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Publish => "publish",
            Self::Unpublish => "unpublish",
            Self::Delete => "delete",
        }
    }
}
