use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use crate::application::ports::{ExtractionRepository, Page, RepositoryError};
use crate::domain::{
    Clause, ClauseId, ClauseType, ExtractionJob, FileType, JobId, JobStatus, UserId,
};

pub struct PgExtractionRepository {
    pool: PgPool,
}

impl PgExtractionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn job_from_row(row: &PgRow) -> Result<ExtractionJob, RepositoryError> {
    let status: String = row
        .try_get("status")
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
    let file_type: String = row
        .try_get("file_type")
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

    Ok(ExtractionJob {
        id: JobId::from_uuid(get(row, "id")?),
        user_id: UserId::new(get::<String>(row, "user_id")?),
        filename: get(row, "filename")?,
        file_type: FileType::from_extension(&file_type)
            .ok_or_else(|| RepositoryError::QueryFailed(format!("bad file_type: {file_type}")))?,
        file_size: get::<i64>(row, "file_size")? as u64,
        status: status.parse::<JobStatus>().map_err(RepositoryError::QueryFailed)?,
        error_message: get(row, "error_message")?,
        extra_data: get(row, "extra_data")?,
        created_at: get::<DateTime<Utc>>(row, "created_at")?,
        updated_at: get::<DateTime<Utc>>(row, "updated_at")?,
    })
}

fn clause_from_row(row: &PgRow) -> Result<Clause, RepositoryError> {
    let clause_type: String = get(row, "clause_type")?;

    Ok(Clause {
        id: ClauseId::from_uuid(get(row, "id")?),
        job_id: JobId::from_uuid(get(row, "extraction_id")?),
        clause_type: ClauseType::coerce(&clause_type),
        title: get(row, "title")?,
        content: get(row, "content")?,
        order: get::<i32>(row, "clause_order")? as u32,
        extra_data: get(row, "extra_data")?,
        created_at: get::<DateTime<Utc>>(row, "created_at")?,
    })
}

fn get<'r, T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>>(
    row: &'r PgRow,
    column: &str,
) -> Result<T, RepositoryError> {
    row.try_get(column)
        .map_err(|e| RepositoryError::QueryFailed(format!("{column}: {e}")))
}

#[async_trait]
impl ExtractionRepository for PgExtractionRepository {
    #[instrument(skip(self, job), fields(job_id = %job.id.as_uuid()))]
    async fn create_job(&self, job: &ExtractionJob) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO extractions
                (id, user_id, filename, file_type, file_size, status,
                 error_message, extra_data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(job.id.as_uuid())
        .bind(job.user_id.as_str())
        .bind(&job.filename)
        .bind(job.file_type.as_str())
        .bind(job.file_size as i64)
        .bind(job.status.as_str())
        .bind(&job.error_message)
        .bind(&job.extra_data)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    #[instrument(skip(self), fields(job_id = %id.as_uuid()))]
    async fn get_job(&self, id: JobId) -> Result<Option<ExtractionJob>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM extractions WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        row.as_ref().map(job_from_row).transpose()
    }

    #[instrument(skip(self), fields(job_id = %job_id.as_uuid()))]
    async fn get_clauses(&self, job_id: JobId) -> Result<Vec<Clause>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM clauses WHERE extraction_id = $1 ORDER BY clause_order ASC",
        )
        .bind(job_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        rows.iter().map(clause_from_row).collect()
    }

    #[instrument(skip(self, user_id))]
    async fn list_jobs(
        &self,
        user_id: &UserId,
        skip: u64,
        limit: u64,
    ) -> Result<Page, RepositoryError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM extractions WHERE user_id = $1")
            .bind(user_id.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        let rows = sqlx::query(
            r#"
            SELECT * FROM extractions
            WHERE user_id = $1
            ORDER BY created_at DESC
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(user_id.as_str())
        .bind(skip as i64)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        let jobs = rows
            .iter()
            .map(job_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            total: total as u64,
            jobs,
        })
    }

    #[instrument(skip(self, clauses, extra_data), fields(job_id = %id.as_uuid(), clause_count = clauses.len()))]
    async fn complete_job(
        &self,
        id: JobId,
        clauses: &[Clause],
        extra_data: serde_json::Value,
    ) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        // Guarding on the current status makes the terminal transition
        // single-shot even if a duplicate message ever slipped through.
        let updated = sqlx::query(
            r#"
            UPDATE extractions
            SET status = 'completed', extra_data = $1, updated_at = $2
            WHERE id = $3 AND status = 'processing'
            "#,
        )
        .bind(&extra_data)
        .bind(Utc::now())
        .bind(id.as_uuid())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        if updated.rows_affected() != 1 {
            return Err(RepositoryError::InvalidTransition(format!(
                "job {} is not in processing state",
                id.as_uuid()
            )));
        }

        for clause in clauses {
            sqlx::query(
                r#"
                INSERT INTO clauses
                    (id, extraction_id, clause_type, title, content,
                     clause_order, extra_data, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(clause.id.as_uuid())
            .bind(clause.job_id.as_uuid())
            .bind(clause.clause_type.as_str())
            .bind(&clause.title)
            .bind(&clause.content)
            .bind(clause.order as i32)
            .bind(&clause.extra_data)
            .bind(clause.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    #[instrument(skip(self, error_message), fields(job_id = %id.as_uuid(), kind = failure_kind))]
    async fn fail_job(
        &self,
        id: JobId,
        failure_kind: &str,
        error_message: &str,
    ) -> Result<(), RepositoryError> {
        let extra_data = serde_json::json!({ "failure_kind": failure_kind });

        let updated = sqlx::query(
            r#"
            UPDATE extractions
            SET status = 'failed', error_message = $1, extra_data = $2, updated_at = $3
            WHERE id = $4 AND status = 'processing'
            "#,
        )
        .bind(error_message)
        .bind(&extra_data)
        .bind(Utc::now())
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        if updated.rows_affected() != 1 {
            return Err(RepositoryError::InvalidTransition(format!(
                "job {} is not in processing state",
                id.as_uuid()
            )));
        }

        Ok(())
    }
}
