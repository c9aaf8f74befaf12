use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use std::sync::{Mutex, MutexGuard};

use crate::common::ArticleError;
use crate::models::{Article, ArticleCreate, ArticleQuery, ArticleUpdate, Publication};
use crate::services::{is_due, lifecycle};

use super::{articles, Database};

/// Persistence seam for articles.
#[async_trait]
pub trait ArticleStore: Send + Sync + 'static {
    async fn list_articles(
        &self,
        query: &ArticleQuery,
        now: DateTime<Utc>,
    ) -> Result<Vec<Article>, ArticleError>;

    async fn get_article(&self, id: Uuid) -> Result<Article, ArticleError>;

    async fn create_article(
        &self,
        data: &ArticleCreate,
    ) -> Result<Article, ArticleError>;

    async fn update_article(
        &self,
        id: Uuid,
        data: &ArticleUpdate,
    ) -> Result<Article, ArticleError>;

    async fn set_publication(
        &self,
        id: Uuid,
        publication: Publication,
    ) -> Result<Article, ArticleError>;

    async fn delete_article(&self, id: Uuid) -> Result<Article, ArticleError>;

    /// Publishes every article whose schedule is due at `now`.
    async fn promote_due(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, ArticleError>;
}

#[async_trait]
impl ArticleStore for Database {
    async fn list_articles(
        &self,
        query: &ArticleQuery,
        now: DateTime<Utc>,
    ) -> Result<Vec<Article>, ArticleError> {
        Ok(articles::list_articles(&self.pool, query, now).await?)
    }

    async fn get_article(&self, id: Uuid) -> Result<Article, ArticleError> {
        articles::get_article_by_id(&self.pool, id)
            .await?
            .ok_or(ArticleError::NotFound(id))
    }

    async fn create_article(
        &self,
        data: &ArticleCreate,
    ) -> Result<Article, ArticleError> {
        Ok(articles::create_article(&self.pool, data).await?)
    }

    async fn update_article(
        &self,
        id: Uuid,
        data: &ArticleUpdate,
    ) -> Result<Article, ArticleError> {
        if data.is_empty() {
            return Err(ArticleError::InvalidRequest(
                "No fields provided".into(),
            ));
        }

        articles::update_article(&self.pool, id, data)
            .await?
            .ok_or(ArticleError::NotFound(id))
    }

    async fn set_publication(
        &self,
        id: Uuid,
        publication: Publication,
    ) -> Result<Article, ArticleError> {
        articles::set_publication(&self.pool, id, publication)
            .await?
            .ok_or(ArticleError::NotFound(id))
    }

    async fn delete_article(&self, id: Uuid) -> Result<Article, ArticleError> {
        articles::delete_article(&self.pool, id)
            .await?
            .ok_or(ArticleError::NotFound(id))
    }

    async fn promote_due(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, ArticleError> {
        Ok(articles::promote_due_articles(&self.pool, now).await?)
    }
}

/// Process-local store. Used by tests and when running without PostgreSQL.
#[derive(Debug, Default)]
pub struct MemoryStore {
    articles: Mutex<Vec<Article>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a fully-formed record, timestamps included.
    pub fn insert(&self, article: Article) {
        let mut articles = self.lock();
        articles.retain(|a| a.id != article.id);
        articles.push(article);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Article>> {
        self.articles
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn modify(
        &self,
        id: Uuid,
        apply: impl FnOnce(&mut Article),
    ) -> Result<Article, ArticleError> {
        let mut articles = self.lock();
        let article = articles
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(ArticleError::NotFound(id))?;

        apply(article);
        article.updated_at = Utc::now();

        Ok(article.clone())
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn list_articles(
        &self,
        query: &ArticleQuery,
        now: DateTime<Utc>,
    ) -> Result<Vec<Article>, ArticleError> {
        let mut matching: Vec<Article> = self
            .lock()
            .iter()
            .filter(|a| query.matches(a, now))
            .cloned()
            .collect();

        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        let offset = query.offset.unwrap_or(0).max(0) as usize;
        let limit = query
            .limit
            .map_or(usize::MAX, |limit| limit.max(0) as usize);

        Ok(matching.into_iter().skip(offset).take(limit).collect())
    }

    async fn get_article(&self, id: Uuid) -> Result<Article, ArticleError> {
        self.lock()
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(ArticleError::NotFound(id))
    }

    async fn create_article(
        &self,
        data: &ArticleCreate,
    ) -> Result<Article, ArticleError> {
        let now = Utc::now();
        let article = Article {
            id: Uuid::new_v4(),
            title: data.title.clone(),
            content: data.content.clone(),
            excerpt: data.excerpt.clone(),
            category: data.category.clone(),
            tags: data.tags.clone(),
            image_url: data.image_url.clone(),
            published: data.publication.published,
            published_at: data.publication.published_at,
            created_at: now,
            updated_at: now,
        };

        self.lock().push(article.clone());
        Ok(article)
    }

    async fn update_article(
        &self,
        id: Uuid,
        data: &ArticleUpdate,
    ) -> Result<Article, ArticleError> {
        if data.is_empty() {
            return Err(ArticleError::InvalidRequest(
                "No fields provided".into(),
            ));
        }

        self.modify(id, |article| {
            if let Some(title) = &data.title {
                article.title = title.clone();
            }
            if let Some(content) = &data.content {
                article.content = content.clone();
            }
            if let Some(excerpt) = &data.excerpt {
                article.excerpt = excerpt.clone();
            }
            if let Some(category) = &data.category {
                article.category = category.clone();
            }
            if let Some(tags) = &data.tags {
                article.tags = tags.clone();
            }
            if let Some(image_url) = &data.image_url {
                article.image_url =
                    Some(image_url.clone()).filter(|url| !url.is_empty());
            }
            if let Some(publication) = data.publication {
                article.published = publication.published;
                article.published_at = publication.published_at;
            }
        })
    }

    async fn set_publication(
        &self,
        id: Uuid,
        publication: Publication,
    ) -> Result<Article, ArticleError> {
        self.modify(id, |article| {
            article.published = publication.published;
            article.published_at = publication.published_at;
        })
    }

    async fn delete_article(&self, id: Uuid) -> Result<Article, ArticleError> {
        let mut articles = self.lock();
        let index = articles
            .iter()
            .position(|a| a.id == id)
            .ok_or(ArticleError::NotFound(id))?;

        Ok(articles.remove(index))
    }

    async fn promote_due(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, ArticleError> {
        let mut promoted = Vec::new();

        for article in self.lock().iter_mut() {
            if is_due(article.published, article.published_at, now) {
                let publication = lifecycle::promote(article.publication(), now);
                article.published = publication.published;
                article.published_at = publication.published_at;
                article.updated_at = Utc::now();
                promoted.push(article.id);
            }
        }

        Ok(promoted)
    }
}
