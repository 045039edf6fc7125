//! Subscriber persistence: the store port and its PostgreSQL implementation.

use crate::config::DatabaseConfig;
use crate::error::AppError;
use crate::model::{NewSubscriber, Subscriber, SubscriberChanges};
use crate::sql::{self, bind_all, bind_all_as, QueryBuf};
use async_trait::async_trait;
use sqlx::PgPool;

/// Sole owner of subscriber persistence. Implementations hold no mutable
/// state beyond their storage handle and are shared across requests.
#[async_trait]
pub trait SubscriberStore: Send + Sync {
    /// Insert the three text fields; returns the stored row with its assigned index.
    async fn create(&self, candidate: &NewSubscriber) -> Result<Subscriber, AppError>;

    /// `NotFound` when no row has this index.
    async fn retrieve(&self, index: u16) -> Result<Subscriber, AppError>;

    /// Write only the present fields. An empty change set is `MalformedInput`.
    async fn update(&self, index: u16, changes: &SubscriberChanges) -> Result<Subscriber, AppError>;

    /// Set the activation flag; returns rows affected.
    async fn activate(&self, index: u16, flag: bool) -> Result<u64, AppError>;

    /// Hard delete; returns rows affected (0 when absent, not an error).
    async fn delete(&self, index: u16) -> Result<u64, AppError>;

    /// All rows ordered by index.
    async fn list(&self) -> Result<Vec<Subscriber>, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct PgSubscriberStore {
    pool: PgPool,
}

impl PgSubscriberStore {
    pub fn new(pool: PgPool) -> Self {
        PgSubscriberStore { pool }
    }

    pub async fn connect(db: &DatabaseConfig) -> Result<Self, AppError> {
        Ok(Self::new(crate::store::connect(db).await?))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_optional(&self, q: &QueryBuf) -> Result<Option<Subscriber>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_all_as(sqlx::query_as::<_, Subscriber>(&q.sql), &q.params)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn execute(&self, q: &QueryBuf) -> Result<u64, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "execute");
        let done = bind_all(sqlx::query(&q.sql), &q.params)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected())
    }
}

#[async_trait]
impl SubscriberStore for PgSubscriberStore {
    async fn create(&self, candidate: &NewSubscriber) -> Result<Subscriber, AppError> {
        let q = sql::insert(candidate);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_all_as(sqlx::query_as::<_, Subscriber>(&q.sql), &q.params)
            .fetch_one(&self.pool)
            .await?;
        tracing::info!(index = row.index, "subscriber created");
        Ok(row)
    }

    async fn retrieve(&self, index: u16) -> Result<Subscriber, AppError> {
        self.fetch_optional(&sql::select_by_index(index))
            .await?
            .ok_or(AppError::NotFound(index))
    }

    async fn update(&self, index: u16, changes: &SubscriberChanges) -> Result<Subscriber, AppError> {
        let q = sql::update(index, changes)?;
        self.fetch_optional(&q).await?.ok_or(AppError::NotFound(index))
    }

    async fn activate(&self, index: u16, flag: bool) -> Result<u64, AppError> {
        self.execute(&sql::activate(index, flag)).await
    }

    async fn delete(&self, index: u16) -> Result<u64, AppError> {
        let affected = self.execute(&sql::delete(index)).await?;
        if affected == 0 {
            tracing::debug!(index, "delete matched no row");
        }
        Ok(affected)
    }

    async fn list(&self) -> Result<Vec<Subscriber>, AppError> {
        let q = sql::select_list();
        tracing::debug!(sql = %q.sql, "query");
        let rows = bind_all_as(sqlx::query_as::<_, Subscriber>(&q.sql), &q.params)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
