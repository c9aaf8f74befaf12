#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use civicpress::common::ArticleError;
use civicpress::db::{ArticleStore, MemoryStore};
use civicpress::models::*;

const SQL_TIME_FMT: &str = "%Y-%m-%d %H:%M:%S%#z";

pub fn parse_time(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_str(s, SQL_TIME_FMT)
        .expect("Invalid time format in test helper")
        .with_timezone(&Utc)
}

pub fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
        .single()
        .expect("Invalid date in test helper")
}

pub fn seed_uuid(s: &str) -> Uuid {
    Uuid::parse_str(s).unwrap()
}

pub fn get_seed_admin() -> Admin {
    Admin {
        id: seed_uuid("00000000-0000-0000-0000-000000000000"),
        email: "admin@test.com".to_string(),
        password_hash: "password0".to_string(),
        created_at: parse_time("2026-01-04 22:15:06+00"),
    }
}

pub fn get_seed_draft() -> Article {
    Article {
        id: seed_uuid("00000000-0000-0000-0002-000000000000"),
        title: "Draft".to_string(),
        content: "<p>draft</p>".to_string(),
        excerpt: "".to_string(),
        category: "Doprava".to_string(),
        tags: vec!["doprava".to_string()],
        image_url: None,
        published: false,
        published_at: None,
        created_at: parse_time("2026-01-05 10:00:00+00"),
        updated_at: parse_time("2026-01-05 10:00:00+00"),
    }
}

pub fn get_seed_published() -> Article {
    Article {
        id: seed_uuid("00000000-0000-0000-0002-000000000001"),
        title: "Published".to_string(),
        content: "<p>live</p>".to_string(),
        excerpt: "live".to_string(),
        category: "Doprava".to_string(),
        tags: vec!["doprava".to_string(), "mhd".to_string()],
        image_url: None,
        published: true,
        published_at: Some(parse_time("2026-01-05 11:00:00+00")),
        created_at: parse_time("2026-01-05 11:00:00+00"),
        updated_at: parse_time("2026-01-05 11:00:00+00"),
    }
}

pub fn get_seed_scheduled() -> Article {
    Article {
        id: seed_uuid("00000000-0000-0000-0002-000000000002"),
        title: "Scheduled".to_string(),
        content: "<p>soon</p>".to_string(),
        excerpt: "".to_string(),
        category: "Školství".to_string(),
        tags: vec![],
        image_url: None,
        published: false,
        published_at: Some(parse_time("2999-01-01 08:00:00+00")),
        created_at: parse_time("2026-01-05 12:00:00+00"),
        updated_at: parse_time("2026-01-05 12:00:00+00"),
    }
}

pub fn get_seed_due() -> Article {
    Article {
        id: seed_uuid("00000000-0000-0000-0002-000000000003"),
        title: "Due".to_string(),
        content: "<p>due</p>".to_string(),
        excerpt: "".to_string(),
        category: "Školství".to_string(),
        tags: vec![],
        image_url: None,
        published: false,
        published_at: Some(parse_time("2026-01-06 08:00:00+00")),
        created_at: parse_time("2026-01-05 13:00:00+00"),
        updated_at: parse_time("2026-01-05 13:00:00+00"),
    }
}

pub fn get_seed_nonexisting() -> Article {
    Article {
        id: seed_uuid("00000000-0000-0000-0002-00000000000d"),
        title: "Missing".to_string(),
        ..get_seed_draft()
    }
}

/// Same four articles the SQL seed inserts.
pub fn seeded_memory_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.insert(get_seed_draft());
    store.insert(get_seed_published());
    store.insert(get_seed_scheduled());
    store.insert(get_seed_due());
    store
}

pub fn sample_draft() -> ArticleDraft {
    ArticleDraft {
        title: "Uzavírka Masarykovy ulice".to_string(),
        content: "<p>Od pondělí platí objízdná trasa.</p>".to_string(),
        excerpt: "Objízdná trasa".to_string(),
        category: "Doprava".to_string(),
        tags: vec!["doprava".to_string()],
        image_url: None,
        intent: None,
    }
}

/// Wraps a [`MemoryStore`], counts calls and fails on demand.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub calls: AtomicUsize,
    fail_on: Mutex<Option<Uuid>>,
    fail_all: AtomicBool,
}

impl FlakyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            ..Default::default()
        }
    }

    pub fn fail_on(&self, id: Uuid) {
        *self.fail_on.lock().unwrap() = Some(id);
    }

    pub fn fail_everything(&self) {
        self.fail_all.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self, id: Option<Uuid>) -> Result<(), ArticleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_all.load(Ordering::SeqCst) {
            return Err(ArticleError::Database(sqlx::Error::PoolTimedOut));
        }

        match (*self.fail_on.lock().unwrap(), id) {
            (Some(bad), Some(id)) if bad == id => {
                Err(ArticleError::Database(sqlx::Error::PoolTimedOut))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ArticleStore for FlakyStore {
    async fn list_articles(
        &self,
        query: &ArticleQuery,
        now: DateTime<Utc>,
    ) -> Result<Vec<Article>, ArticleError> {
        self.hit(None)?;
        self.inner.list_articles(query, now).await
    }

    async fn get_article(&self, id: Uuid) -> Result<Article, ArticleError> {
        self.hit(Some(id))?;
        self.inner.get_article(id).await
    }

    async fn create_article(
        &self,
        data: &ArticleCreate,
    ) -> Result<Article, ArticleError> {
        self.hit(None)?;
        self.inner.create_article(data).await
    }

    async fn update_article(
        &self,
        id: Uuid,
        data: &ArticleUpdate,
    ) -> Result<Article, ArticleError> {
        self.hit(Some(id))?;
        self.inner.update_article(id, data).await
    }

    async fn set_publication(
        &self,
        id: Uuid,
        publication: Publication,
    ) -> Result<Article, ArticleError> {
        self.hit(Some(id))?;
        self.inner.set_publication(id, publication).await
    }

    async fn delete_article(&self, id: Uuid) -> Result<Article, ArticleError> {
        self.hit(Some(id))?;
        self.inner.delete_article(id).await
    }

    async fn promote_due(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, ArticleError> {
        self.hit(None)?;
        self.inner.promote_due(now).await
    }
}
