use sqlx::PgPool;
use uuid::Uuid;

use crate::common::{is_unique_violation, CategoryError};
use crate::models::{Category, CategoryCreate, CategoryUpdate};

pub async fn list_categories(
    pool: &PgPool,
    active_only: bool,
) -> Result<Vec<Category>, CategoryError> {
    let categories = sqlx::query_as::<_, Category>(
        r#"
        SELECT *
        FROM categories
        WHERE active OR NOT $1
        ORDER BY display_order, name
        "#,
    )
    .bind(active_only)
    .fetch_all(pool)
    .await?;

    Ok(categories)
}

pub async fn get_category_by_id(
    pool: &PgPool,
    id: Uuid,
) -> Result<Category, CategoryError> {
    sqlx::query_as::<_, Category>(
        r#"SELECT * FROM categories WHERE id = $1"#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(CategoryError::NotFound(id))
}

pub async fn create_category(
    pool: &PgPool,
    data: &CategoryCreate,
) -> Result<Category, CategoryError> {
    data.validate()?;

    let result = sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO categories (name, slug, color, display_order, active)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(&data.name)
    .bind(&data.slug)
    .bind(&data.color)
    .bind(data.display_order)
    .bind(data.active)
    .fetch_one(pool)
    .await;

    match result {
        Ok(c) => Ok(c),
        Err(e) if is_unique_violation(&e) => {
            Err(CategoryError::AlreadyExists(data.name.clone()))
        }
        Err(e) => Err(CategoryError::Database(e)),
    }
}

pub async fn update_category(
    pool: &PgPool,
    id: Uuid,
    data: &CategoryUpdate,
) -> Result<Category, CategoryError> {
    if data.is_empty() {
        return Err(CategoryError::InvalidRequest(
            "No fields provided".into(),
        ));
    }

    data.validate()?;

    let result = sqlx::query_as::<_, Category>(
        r#"
        UPDATE categories
        SET
            name = COALESCE($1, name),
            slug = COALESCE($2, slug),
            color = COALESCE($3, color),
            display_order = COALESCE($4, display_order),
            active = COALESCE($5, active),
            updated_at = now()
        WHERE id = $6
        RETURNING *
        "#,
    )
    .bind(data.name.as_deref())
    .bind(data.slug.as_deref())
    .bind(data.color.as_deref())
    .bind(data.display_order)
    .bind(data.active)
    .bind(id)
    .fetch_optional(pool)
    .await;

    match result {
        Ok(Some(c)) => Ok(c),
        Ok(None) => Err(CategoryError::NotFound(id)),
        Err(e) if is_unique_violation(&e) => {
            let name = data
                .name
                .clone()
                .or_else(|| data.slug.clone())
                .unwrap_or_default();
            Err(CategoryError::AlreadyExists(name))
        }
        Err(e) => Err(CategoryError::Database(e)),
    }
}

pub async fn delete_category(
    pool: &PgPool,
    id: Uuid,
) -> Result<Category, CategoryError> {
    sqlx::query_as::<_, Category>(
        r#"
        DELETE FROM categories
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(CategoryError::NotFound(id))
}
