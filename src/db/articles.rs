use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::{
    Article, ArticleCreate, ArticleQuery, ArticleUpdate, Publication,
    PublicationStatus,
};

pub async fn create_article(
    pool: &PgPool,
    data: &ArticleCreate,
) -> Result<Article, sqlx::Error> {
    sqlx::query_as::<_, Article>(
        r#"
        INSERT INTO articles (
            title, content, excerpt, category, tags, image_url,
            published, published_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(&data.title)
    .bind(&data.content)
    .bind(&data.excerpt)
    .bind(&data.category)
    .bind(&data.tags)
    .bind(data.image_url.as_deref())
    .bind(data.publication.published)
    .bind(data.publication.published_at)
    .fetch_one(pool)
    .await
}

pub async fn get_article_by_id(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<Article>, sqlx::Error> {
    sqlx::query_as::<_, Article>(
        r#"
        SELECT *
        FROM articles
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn list_articles(
    pool: &PgPool,
    query: &ArticleQuery,
    now: DateTime<Utc>,
) -> Result<Vec<Article>, sqlx::Error> {
    let mut query_builder: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT * FROM articles WHERE TRUE");

    if query.visible_only {
        query_builder
            .push(" AND published AND (published_at IS NULL OR published_at <= ")
            .push_bind(now)
            .push(")");
    }

    if let Some(category) = &query.category {
        query_builder.push(" AND category = ").push_bind(category);
    }

    if let Some(tag) = &query.tag {
        query_builder
            .push(" AND ")
            .push_bind(tag)
            .push(" = ANY(tags)");
    }

    if let Some(search) = &query.search {
        query_builder
            .push(" AND title ILIKE ")
            .push_bind(format!("%{}%", escape_like(search)));
    }

    if let Some(status) = query.status {
        query_builder.push(" AND ");
        push_status_predicate(&mut query_builder, status, now);
    }

    query_builder.push(" ORDER BY created_at DESC, id");

    if let Some(offset) = query.offset {
        query_builder.push(" OFFSET ").push_bind(offset);
    }

    if let Some(limit) = query.limit {
        query_builder.push(" LIMIT ").push_bind(limit);
    }

    query_builder
        .build_query_as::<Article>()
        .fetch_all(pool)
        .await
}

/// SQL form of [`PublicationStatus::classify`].
fn push_status_predicate(
    query_builder: &mut QueryBuilder<'_, Postgres>,
    status: PublicationStatus,
    now: DateTime<Utc>,
) {
    match status {
        PublicationStatus::Draft => {
            query_builder
                .push("(NOT published AND published_at IS NULL)");
        }
        PublicationStatus::Scheduled => {
            query_builder
                .push("(published_at > ")
                .push_bind(now)
                .push(" OR (NOT published AND published_at IS NOT NULL))");
        }
        PublicationStatus::Published => {
            query_builder
                .push("(published AND (published_at IS NULL OR published_at <= ")
                .push_bind(now)
                .push("))");
        }
    }
}

fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

pub async fn update_article(
    pool: &PgPool,
    id: Uuid,
    data: &ArticleUpdate,
) -> Result<Option<Article>, sqlx::Error> {
    let (set_publication, published, published_at) = match data.publication {
        Some(p) => (true, p.published, p.published_at),
        None => (false, false, None),
    };

    sqlx::query_as::<_, Article>(
        r#"
        UPDATE articles
        SET
            title = COALESCE($1, title),
            content = COALESCE($2, content),
            excerpt = COALESCE($3, excerpt),
            category = COALESCE($4, category),
            tags = COALESCE($5, tags),
            image_url = CASE
                WHEN $6::TEXT IS NULL THEN image_url
                ELSE NULLIF($6, '')
            END,
            published = CASE WHEN $7 THEN $8 ELSE published END,
            published_at = CASE WHEN $7 THEN $9 ELSE published_at END,
            updated_at = now()
        WHERE id = $10
        RETURNING *
        "#,
    )
    .bind(data.title.as_deref())
    .bind(data.content.as_deref())
    .bind(data.excerpt.as_deref())
    .bind(data.category.as_deref())
    .bind(data.tags.as_ref())
    .bind(data.image_url.as_deref())
    .bind(set_publication)
    .bind(published)
    .bind(published_at)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn set_publication(
    pool: &PgPool,
    id: Uuid,
    publication: Publication,
) -> Result<Option<Article>, sqlx::Error> {
    sqlx::query_as::<_, Article>(
        r#"
        UPDATE articles
        SET
            published = $1,
            published_at = $2,
            updated_at = now()
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(publication.published)
    .bind(publication.published_at)
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Permanently removes an article and returns what was deleted.
pub async fn delete_article(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<Article>, sqlx::Error> {
    sqlx::query_as::<_, Article>(
        r#"
        DELETE FROM articles
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Flips every due schedule live in one statement.
pub async fn promote_due_articles(
    pool: &PgPool,
    now: DateTime<Utc>,
) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        UPDATE articles
        SET
            published = TRUE,
            updated_at = now()
        WHERE NOT published
          AND published_at IS NOT NULL
          AND published_at <= $1
        RETURNING id
        "#,
    )
    .bind(now)
    .fetch_all(pool)
    .await
}
