use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool, Postgres};

use veriscan_core::models::{DetectionRecord, DetectionSummary, NewDetection};
use veriscan_core::AppError;

/// Upload count for one calendar day.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct DailyCount {
    pub day: NaiveDate,
    pub count: i64,
}

/// Repository for the `detections` table.
///
/// The only write path is `insert`; records are append-only and never
/// updated. Reads are the history listing, the single-record lookup, and
/// the daily aggregation used by the reporting tool.
#[derive(Clone)]
pub struct DetectionRepository {
    pool: PgPool,
}

impl DetectionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, new), fields(db.table = "detections", db.operation = "insert"))]
    pub async fn insert(&self, new: NewDetection) -> Result<DetectionRecord, AppError> {
        let record = sqlx::query_as::<Postgres, DetectionRecord>(
            r#"
            INSERT INTO detections (
                filename, file_path, file_size, mime_type,
                is_fake, confidence_score, processing_time,
                user_is_fake, model_version, analysis_details
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&new.filename)
        .bind(&new.file_path)
        .bind(new.file_size)
        .bind(&new.mime_type)
        .bind(new.is_fake)
        .bind(new.confidence_score)
        .bind(new.processing_time)
        .bind(new.user_is_fake)
        .bind(&new.model_version)
        .bind(&new.analysis_details)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    #[tracing::instrument(skip(self), fields(db.table = "detections", db.operation = "select_one"))]
    pub async fn get(&self, id: i64) -> Result<Option<DetectionRecord>, AppError> {
        sqlx::query_as::<Postgres, DetectionRecord>("SELECT * FROM detections WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    /// Most recent first; equal timestamps tie-break on id descending so
    /// pagination is deterministic.
    #[tracing::instrument(skip(self), fields(db.table = "detections", db.operation = "select_list"))]
    pub async fn list(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DetectionSummary>, AppError> {
        sqlx::query_as::<Postgres, DetectionSummary>(
            r#"
            SELECT id, filename, is_fake, confidence_score, created_at
            FROM detections
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    #[tracing::instrument(skip(self), fields(db.table = "detections", db.operation = "count"))]
    pub async fn count(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<Postgres, i64>("SELECT COUNT(*) FROM detections")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)
    }

    /// Upload counts grouped by calendar date, for records created at or
    /// after `since`. Days without uploads are absent from the result;
    /// callers fill the gaps.
    #[tracing::instrument(skip(self), fields(db.table = "detections", db.operation = "aggregate"))]
    pub async fn daily_counts(&self, since: DateTime<Utc>) -> Result<Vec<DailyCount>, AppError> {
        sqlx::query_as::<Postgres, DailyCount>(
            r#"
            SELECT created_at::date AS day, COUNT(*)::BIGINT AS count
            FROM detections
            WHERE created_at >= $1
            GROUP BY created_at::date
            ORDER BY day
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }
}
