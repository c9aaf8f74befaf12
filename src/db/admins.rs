use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::AuthError;
use crate::models::{Admin, AdminSession};
use crate::services::{PasswordManager, SESSION_TTL};

pub async fn get_admin_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<Admin>, sqlx::Error> {
    sqlx::query_as::<_, Admin>(
        r#"SELECT * FROM admins WHERE lower(email) = lower($1)"#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Creates the admin if the email is not taken yet. Returns whether a row
/// was inserted.
pub async fn ensure_admin(
    pool: &PgPool,
    email: &str,
    password: &str,
) -> Result<bool, AuthError> {
    if get_admin_by_email(pool, email).await?.is_some() {
        return Ok(false);
    }

    let password_hash = PasswordManager::hash_password(password)?;

    let inserted = sqlx::query(
        r#"
        INSERT INTO admins (email, password_hash) VALUES ($1, $2)
        ON CONFLICT (email) DO NOTHING
        "#,
    )
    .bind(email)
    .bind(password_hash)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(inserted > 0)
}

/// Verifies credentials and opens a session.
pub async fn login(
    pool: &PgPool,
    email: &str,
    password: &str,
    now: DateTime<Utc>,
) -> Result<AdminSession, AuthError> {
    let admin = get_admin_by_email(pool, email).await?;

    // Constant-time response: always verify a password even if the admin
    // doesn't exist.
    let Some(admin) = admin else {
        PasswordManager::verify_against_dummy(password);
        return Err(AuthError::InvalidCredentials);
    };

    if !PasswordManager::verify_password(password, &admin.password_hash)
        .unwrap_or(false)
    {
        return Err(AuthError::InvalidCredentials);
    }

    let session = sqlx::query_as::<_, AdminSession>(
        r#"
        INSERT INTO admin_sessions (token, admin_id, created_at, expires_at)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(admin.id)
    .bind(now)
    .bind(now + SESSION_TTL)
    .fetch_one(pool)
    .await?;

    Ok(session)
}

/// Resolves a session cookie to its admin.
pub async fn admin_for_session(
    pool: &PgPool,
    token: Uuid,
    now: DateTime<Utc>,
) -> Result<Admin, AuthError> {
    sqlx::query_as::<_, Admin>(
        r#"
        SELECT a.*
        FROM admin_sessions s
        JOIN admins a ON a.id = s.admin_id
        WHERE s.token = $1 AND s.expires_at > $2
        "#,
    )
    .bind(token)
    .bind(now)
    .fetch_optional(pool)
    .await?
    .ok_or(AuthError::Unauthorized)
}

pub async fn logout(pool: &PgPool, token: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(r#"DELETE FROM admin_sessions WHERE token = $1"#)
        .bind(token)
        .execute(pool)
        .await?;

    Ok(())
}

/// Drops expired sessions. Returns how many were removed.
pub async fn purge_expired_sessions(
    pool: &PgPool,
    now: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"DELETE FROM admin_sessions WHERE expires_at <= $1"#,
    )
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
