/// Subscription model: one user following another author
///
/// # Schema
///
/// ```sql
/// CREATE TABLE subscriptions (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     author_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT unique_subscription UNIQUE (user_id, author_id),
///     CONSTRAINT no_self_subscription CHECK (user_id <> author_id)
/// );
/// ```
///
/// Self-subscription is also rejected at the API boundary so the caller
/// gets a validation error instead of a constraint violation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A follower relationship, newest first in listings
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Subscription {
    /// Unique subscription ID
    pub id: Uuid,

    /// The follower
    pub user_id: Uuid,

    /// The followed author
    pub author_id: Uuid,

    /// When the subscription was created
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// Creates a subscription
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate subscription or self-subscription
    /// (unique / check constraint violations).
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        author_id: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let subscription = sqlx::query_as::<_, Subscription>(
            r#"
            INSERT INTO subscriptions (user_id, author_id)
            VALUES ($1, $2)
            RETURNING id, user_id, author_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_one(pool)
        .await?;

        Ok(subscription)
    }

    /// Checks whether `user_id` follows `author_id`
    pub async fn exists(
        pool: &PgPool,
        user_id: Uuid,
        author_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM subscriptions WHERE user_id = $1 AND author_id = $2)",
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_one(pool)
        .await?;

        Ok(row.0)
    }

    /// Lists the caller's subscriptions, newest first
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let subscriptions = sqlx::query_as::<_, Subscription>(
            r#"
            SELECT id, user_id, author_id, created_at
            FROM subscriptions
            WHERE user_id = $1
            ORDER BY created_at DESC, id
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(subscriptions)
    }

    /// Deletes a subscription
    ///
    /// Returns true if a row was deleted, false if it didn't exist.
    pub async fn delete(
        pool: &PgPool,
        user_id: Uuid,
        author_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE user_id = $1 AND author_id = $2")
            .bind(user_id)
            .bind(author_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
