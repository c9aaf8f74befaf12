use chrono::{DateTime, Utc};

/// Whether the public site may show an article at `now`.
///
/// The flag alone is not enough: a live flag with a future go-live time is
/// still hidden until that time passes.
pub fn is_publicly_visible(
    published: bool,
    published_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    published && published_at.map_or(true, |at| at <= now)
}

/// Whether an unpublished article has a schedule that has come due.
pub fn is_due(
    published: bool,
    published_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    !published && published_at.is_some_and(|at| at <= now)
}
