//! Coach verdict persistence and duplicate-claim queries.
//!
//! Backs [`accredo_verify::store::CoachRegistry`] with the
//! `coach_credential_claims` table: every verification attempt inserts one
//! row, and duplicate-claim checks query the verified rows of other
//! coaches.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use accredo_core::{AccreditationBody, CoachId, Verdict};
use accredo_verify::store::{CoachRegistry, ConflictingClaim, StoreError};

use super::store_error;

/// Postgres-backed coach registry.
#[derive(Clone)]
pub struct PgCoachRegistry {
    pool: PgPool,
}

impl PgCoachRegistry {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ClaimRow {
    coach_id: String,
    directory_name: String,
}

#[async_trait]
impl CoachRegistry for PgCoachRegistry {
    async fn find_conflicting_claim(
        &self,
        body: AccreditationBody,
        level: &str,
        surname: &str,
        exclude: &CoachId,
    ) -> Result<Option<ConflictingClaim>, StoreError> {
        let row = sqlx::query_as::<_, ClaimRow>(
            "SELECT coach_id, directory_name \
             FROM coach_credential_claims \
             WHERE status = 'verified' \
               AND body = $1 \
               AND lower(level) = lower($2) \
               AND coach_id <> $3 \
               AND position(lower($4) in lower(directory_name)) > 0 \
             LIMIT 1",
        )
        .bind(body.as_str())
        .bind(level)
        .bind(exclude.as_str())
        .bind(surname)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(row.map(|row| ConflictingClaim {
            coach_id: CoachId::new(row.coach_id),
            directory_name: row.directory_name,
        }))
    }

    async fn record_verdict(
        &self,
        coach_id: &CoachId,
        body: AccreditationBody,
        verdict: &Verdict,
    ) -> Result<(), StoreError> {
        let (directory_name, level) = match &verdict.match_details {
            Some(details) => (
                details.name.as_str(),
                details.level.as_deref().unwrap_or_default(),
            ),
            None => ("", ""),
        };

        sqlx::query(
            "INSERT INTO coach_credential_claims \
                 (id, coach_id, body, level, directory_name, status, confidence, reason) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(Uuid::new_v4())
        .bind(coach_id.as_str())
        .bind(body.as_str())
        .bind(level)
        .bind(directory_name)
        .bind(verdict.status_str())
        .bind(i16::from(verdict.confidence))
        .bind(&verdict.reason)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(())
    }
}
