use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use std::sync::Arc;

use crate::common::{ArticleError, ValidationError};
use crate::db::ArticleStore;
use crate::models::{
    Article, ArticleCreate, ArticleDraft, ArticlePatch, ArticleQuery,
    ArticleRequest, ArticleUpdate, BulkAction, PublishIntent,
};

use super::lifecycle;

/// Result of a bulk action that stops at the first failure.
///
/// Nothing is rolled back: `applied` lists every id that was changed before
/// the failing one, in selection order.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOutcome {
    pub action: Option<BulkAction>,
    pub applied: Vec<Uuid>,
    pub failed: Option<BulkFailure>,
    pub skipped: Vec<Uuid>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct BulkFailure {
    pub id: Uuid,
    pub error: String,
    /// The store itself failed, as opposed to a missing or invalid article.
    #[serde(skip)]
    pub store_failure: bool,
}

impl BulkOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_none()
    }
}

/// What a dispatched [`ArticleRequest`] produced.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RequestOutcome {
    Article(Article),
    Deleted(Article),
    Bulk(BulkOutcome),
}

/// Validation and lifecycle rules on top of an [`ArticleStore`].
pub struct ArticleService<S: ArticleStore> {
    store: Arc<S>,
}

impl<S: ArticleStore> Clone for ArticleService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ArticleStore> ArticleService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub async fn list(
        &self,
        query: &ArticleQuery,
        now: DateTime<Utc>,
    ) -> Result<Vec<Article>, ArticleError> {
        if query.limit.is_some_and(|limit| limit < 0) {
            return Err(ArticleError::InvalidRequest(
                "Pagination 'limit' is negative integer".into(),
            ));
        }

        if query.offset.is_some_and(|offset| offset < 0) {
            return Err(ArticleError::InvalidRequest(
                "Pagination 'offset' is negative integer".into(),
            ));
        }

        self.store.list_articles(query, now).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Article, ArticleError> {
        self.store.get_article(id).await
    }

    /// Returns the article only if the public site may show it at `now`.
    pub async fn get_visible(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Article, ArticleError> {
        let article = self.store.get_article(id).await?;

        if article.is_visible_at(now) {
            Ok(article)
        } else {
            Err(ArticleError::NotFound(id))
        }
    }

    pub async fn create(
        &self,
        draft: ArticleDraft,
        now: DateTime<Utc>,
    ) -> Result<Article, ArticleError> {
        let data = prepare_create(draft, now)?;
        let article = self.store.create_article(&data).await?;

        log::info!(
            "Created article {} ({})",
            article.id,
            article.status_at(now)
        );

        Ok(article)
    }

    pub async fn update(
        &self,
        id: Uuid,
        patch: ArticlePatch,
        now: DateTime<Utc>,
    ) -> Result<Article, ArticleError> {
        let data = prepare_update(patch, now)?;
        self.store.update_article(id, &data).await
    }

    pub async fn apply_intent(
        &self,
        id: Uuid,
        intent: PublishIntent,
        now: DateTime<Utc>,
    ) -> Result<Article, ArticleError> {
        let publication = lifecycle::transition(&intent, now)?;
        let article = self.store.set_publication(id, publication).await?;

        log::info!(
            "Article {} is now {}",
            article.id,
            article.status_at(now)
        );

        Ok(article)
    }

    pub async fn delete(&self, id: Uuid) -> Result<Article, ArticleError> {
        let article = self.store.delete_article(id).await?;
        log::info!("Deleted article {}", article.id);
        Ok(article)
    }

    /// Applies `action` to each id in order, one store call per id.
    pub async fn bulk(
        &self,
        ids: &[Uuid],
        action: BulkAction,
    ) -> Result<BulkOutcome, ArticleError> {
        if ids.is_empty() {
            return Err(ValidationError::EmptySelection.into());
        }

        let publication = lifecycle::bulk_publication(action);
        let mut outcome = BulkOutcome {
            action: Some(action),
            ..Default::default()
        };

        for (index, &id) in ids.iter().enumerate() {
            let result = match publication {
                Some(publication) => {
                    self.store.set_publication(id, publication).await
                }
                None => self.store.delete_article(id).await,
            };

            match result {
                Ok(_) => outcome.applied.push(id),
                Err(e) => {
                    log::warn!(
                        "Bulk {} stopped at {} after {} of {}: {}",
                        action.as_str(),
                        id,
                        outcome.applied.len(),
                        ids.len(),
                        e
                    );

                    outcome.failed = Some(BulkFailure {
                        id,
                        error: e.to_string(),
                        store_failure: matches!(e, ArticleError::Database(_)),
                    });
                    outcome.skipped = ids[index + 1..].to_vec();
                    break;
                }
            }
        }

        Ok(outcome)
    }

    pub async fn bulk_publish(
        &self,
        ids: &[Uuid],
    ) -> Result<BulkOutcome, ArticleError> {
        self.bulk(ids, BulkAction::Publish).await
    }

    pub async fn bulk_unpublish(
        &self,
        ids: &[Uuid],
    ) -> Result<BulkOutcome, ArticleError> {
        self.bulk(ids, BulkAction::Unpublish).await
    }

    pub async fn bulk_delete(
        &self,
        ids: &[Uuid],
    ) -> Result<BulkOutcome, ArticleError> {
        self.bulk(ids, BulkAction::Delete).await
    }

    pub async fn dispatch(
        &self,
        request: ArticleRequest,
        now: DateTime<Utc>,
    ) -> Result<RequestOutcome, ArticleError> {
        match request {
            ArticleRequest::Create { fields } => {
                self.create(fields, now).await.map(RequestOutcome::Article)
            }
            ArticleRequest::Update { id, fields } => self
                .update(id, fields, now)
                .await
                .map(RequestOutcome::Article),
            ArticleRequest::Delete { id } => {
                self.delete(id).await.map(RequestOutcome::Deleted)
            }
            ArticleRequest::Transition { id, intent } => self
                .apply_intent(id, intent, now)
                .await
                .map(RequestOutcome::Article),
            ArticleRequest::Bulk { ids, action } => {
                self.bulk(&ids, action).await.map(RequestOutcome::Bulk)
            }
        }
    }
}

/// Validates a new-article form and resolves its intent.
pub fn prepare_create(
    draft: ArticleDraft,
    now: DateTime<Utc>,
) -> Result<ArticleCreate, ValidationError> {
    let title = required(&draft.title, ValidationError::MissingTitle)?;
    ensure_content(&draft.content)?;
    let category =
        required(&draft.category, ValidationError::MissingCategory)?;

    let intent = draft.intent.unwrap_or(PublishIntent::SaveDraft);
    let publication = lifecycle::transition(&intent, now)?;

    Ok(ArticleCreate {
        title,
        content: draft.content,
        excerpt: draft.excerpt.trim().to_string(),
        category,
        tags: normalize_tags(&draft.tags),
        image_url: draft
            .image_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty()),
        publication,
    })
}

/// Validates a partial edit. Present text fields must not be blank.
pub fn prepare_update(
    patch: ArticlePatch,
    now: DateTime<Utc>,
) -> Result<ArticleUpdate, ArticleError> {
    if patch.is_empty() {
        return Err(ArticleError::InvalidRequest(
            "No fields provided".into(),
        ));
    }

    let title = patch
        .title
        .as_deref()
        .map(|t| required(t, ValidationError::MissingTitle))
        .transpose()?;
    if let Some(content) = &patch.content {
        ensure_content(content)?;
    }
    let category = patch
        .category
        .as_deref()
        .map(|c| required(c, ValidationError::MissingCategory))
        .transpose()?;

    let publication = patch
        .intent
        .as_ref()
        .map(|intent| lifecycle::transition(intent, now))
        .transpose()?;

    Ok(ArticleUpdate {
        title,
        content: patch.content,
        excerpt: patch.excerpt.map(|e| e.trim().to_string()),
        category,
        tags: patch.tags.as_deref().map(normalize_tags),
        image_url: patch.image_url.map(|url| url.trim().to_string()),
        publication,
    })
}

/// Trims tags, drops empty ones and keeps the first of any duplicates.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());

    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }

    out
}

fn required(
    value: &str,
    missing: ValidationError,
) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(missing)
    } else {
        Ok(value.to_string())
    }
}

/// Content is opaque HTML and stored untouched; it only has to be non-blank.
fn ensure_content(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        Err(ValidationError::MissingContent)
    } else {
        Ok(())
    }
}
