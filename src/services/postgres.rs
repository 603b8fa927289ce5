use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::core::pairing::canonical_pair;
use crate::core::swipes::{MatchStore, SwipeError};
use crate::models::{MatchOutcome, SwipeDirection};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

impl From<PostgresError> for SwipeError {
    fn from(err: PostgresError) -> Self {
        SwipeError::StoreUnavailable(err.to_string())
    }
}

/// Swipe direction as stored in the swipes log
#[derive(Debug, Clone, sqlx::Type)]
#[sqlx(type_name = "swipe_type", rename_all = "lowercase")]
enum SwipeType {
    Right,
    Left,
}

impl From<SwipeDirection> for SwipeType {
    fn from(value: SwipeDirection) -> Self {
        match value {
            SwipeDirection::Right => SwipeType::Right,
            SwipeDirection::Left => SwipeType::Left,
        }
    }
}

/// PostgreSQL client for user, swipe, and match persistence.
///
/// Matches are keyed by the canonical (smaller, larger) user pair with a
/// primary key on it, so match creation is idempotent at the store: retries
/// and resubmissions of an already-resolved pair land on the conflict and
/// report `Duplicate` instead of inserting a second row.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Insert a user profile and return its assigned id.
    pub async fn insert_user(
        &self,
        first_name: &str,
        last_name: &str,
        bio: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<i64, PostgresError> {
        let query = r#"
            INSERT INTO users (first_name, last_name, bio, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING user_id
        "#;

        let row = sqlx::query(query)
            .bind(first_name)
            .bind(last_name)
            .bind(bio)
            .bind(latitude)
            .bind(longitude)
            .fetch_one(&self.pool)
            .await?;

        let user_id: i64 = row.get("user_id");
        tracing::debug!("inserted user {} ({} {})", user_id, first_name, last_name);

        Ok(user_id)
    }

    async fn insert_match(&self, user_a: i64, user_b: i64) -> Result<MatchOutcome, PostgresError> {
        let (lo, hi) = canonical_pair(user_a, user_b);

        let query = r#"
            INSERT INTO matches (user_a, user_b)
            VALUES ($1, $2)
            ON CONFLICT (user_a, user_b) DO NOTHING
        "#;

        let result = sqlx::query(query).bind(lo).bind(hi).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Ok(MatchOutcome::Duplicate);
        }

        tracing::debug!("recorded match for pair {}:{}", lo, hi);
        Ok(MatchOutcome::Created)
    }

    async fn append_swipe(
        &self,
        user: i64,
        target: i64,
        direction: SwipeDirection,
    ) -> Result<(), PostgresError> {
        let query = r#"
            INSERT INTO swipes (user_swiped, user_swiped_on, direction)
            VALUES ($1, $2, $3)
        "#;

        sqlx::query(query)
            .bind(user)
            .bind(target)
            .bind(SwipeType::from(direction))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl MatchStore for PostgresClient {
    async fn create_match(&self, user_a: i64, user_b: i64) -> Result<MatchOutcome, SwipeError> {
        Ok(self.insert_match(user_a, user_b).await?)
    }

    async fn insert_swipe(
        &self,
        user: i64,
        target: i64,
        direction: SwipeDirection,
    ) -> Result<(), SwipeError> {
        Ok(self.append_swipe(user, target, direction).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swipe_type_conversion() {
        assert!(matches!(SwipeType::from(SwipeDirection::Right), SwipeType::Right));
        assert!(matches!(SwipeType::from(SwipeDirection::Left), SwipeType::Left));
    }
}
