//! Draft / scheduled / published transitions.
//!
//! Every function here is pure: it turns an editor intent and the current
//! time into the `(published, published_at)` pair the store should persist.

use chrono::{DateTime, Utc};

use crate::common::ValidationError;
use crate::models::{BulkAction, Publication, PublishIntent};

/// Applies a single-article editor intent.
///
/// Scheduling rejects times strictly before `now`; `now` itself is accepted.
pub fn transition(
    intent: &PublishIntent,
    now: DateTime<Utc>,
) -> Result<Publication, ValidationError> {
    match *intent {
        PublishIntent::PublishNow => Ok(Publication {
            published: true,
            published_at: Some(now),
        }),

        PublishIntent::SaveDraft => Ok(Publication::DRAFT),

        PublishIntent::Schedule { at } if at < now => {
            Err(ValidationError::ScheduleInPast { at, now })
        }

        PublishIntent::Schedule { at } => Ok(Publication {
            published: false,
            published_at: Some(at),
        }),
    }
}

/// The pair forced onto every selected article by a bulk action.
///
/// Bulk publish and unpublish both drop any explicit schedule. Delete has
/// no publication pair.
pub fn bulk_publication(action: BulkAction) -> Option<Publication> {
    match action {
        BulkAction::Publish => Some(Publication {
            published: true,
            published_at: None,
        }),
        BulkAction::Unpublish => Some(Publication::DRAFT),
        BulkAction::Delete => None,
    }
}

/// The pair a due schedule is promoted to. The go-live time is kept.
pub fn promote(publication: Publication, now: DateTime<Utc>) -> Publication {
    match publication {
        Publication {
            published: false,
            published_at: Some(at),
        } if at <= now => Publication {
            published: true,
            published_at: Some(at),
        },
        other => other,
    }
}
