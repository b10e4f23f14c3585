//! Credential cache persistence.
//!
//! Backs [`accredo_verify::store::CredentialStore`] with the
//! `verified_credentials` table. The cache key is stored in its rendered
//! form (`EMCC:<reference>` / `ICF:<name>|<location>`) and parsed back on
//! read; the tagged components are already normalized by `CacheKey`'s
//! constructors before they reach this layer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use accredo_core::{CacheKey, EiaReference, Provenance, VerifiedCredential};
use accredo_verify::store::{CredentialStore, StoreError};

use super::store_error;

/// Postgres-backed credential cache.
#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    id: Uuid,
    cache_key: String,
    directory_name: String,
    level: Option<String>,
    location: Option<String>,
    profile_url: Option<String>,
    is_active: bool,
    provenance: String,
    created_at: DateTime<Utc>,
}

impl CredentialRow {
    fn into_credential(self) -> Result<VerifiedCredential, StoreError> {
        Ok(VerifiedCredential {
            id: self.id,
            key: parse_key(&self.cache_key)?,
            directory_name: self.directory_name,
            level: self.level,
            location: self.location,
            profile_url: self.profile_url,
            is_active: self.is_active,
            provenance: parse_provenance(&self.provenance)?,
            created_at: self.created_at,
        })
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn lookup_active(
        &self,
        key: &CacheKey,
    ) -> Result<Option<VerifiedCredential>, StoreError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            "SELECT id, cache_key, directory_name, level, location, profile_url, \
                    is_active, provenance, created_at \
             FROM verified_credentials \
             WHERE cache_key = $1 AND is_active \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(key.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row.map(CredentialRow::into_credential).transpose()
    }

    async fn insert(&self, credential: VerifiedCredential) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO verified_credentials \
                 (id, cache_key, body, directory_name, level, location, profile_url, \
                  is_active, provenance, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(credential.id)
        .bind(credential.key.to_string())
        .bind(credential.key.body().as_str())
        .bind(&credential.directory_name)
        .bind(&credential.level)
        .bind(&credential.location)
        .bind(&credential.profile_url)
        .bind(credential.is_active)
        .bind(credential.provenance.as_str())
        .bind(credential.created_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(())
    }
}

/// Parse a stored cache key back into its tagged form.
fn parse_key(raw: &str) -> Result<CacheKey, StoreError> {
    let malformed = || StoreError::Backend {
        reason: format!("malformed cache key in storage: {raw}"),
    };
    let (tag, rest) = raw.split_once(':').ok_or_else(malformed)?;
    match tag {
        "EMCC" => {
            let reference = EiaReference::new(rest).map_err(|_| malformed())?;
            Ok(CacheKey::emcc(reference))
        }
        "ICF" => {
            let (name, location) = rest.split_once('|').ok_or_else(malformed)?;
            Ok(CacheKey::icf(name, location))
        }
        _ => Err(malformed()),
    }
}

fn parse_provenance(raw: &str) -> Result<Provenance, StoreError> {
    match raw {
        "auto" => Ok(Provenance::Auto),
        "url" => Ok(Provenance::Url),
        "manual" => Ok(Provenance::Manual),
        other => Err(StoreError::Backend {
            reason: format!("unknown provenance in storage: {other}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_round_trips_through_rendered_form() {
        let reference = EiaReference::new("EIA20230480").unwrap();
        let emcc = CacheKey::emcc(reference);
        assert_eq!(parse_key(&emcc.to_string()).unwrap(), emcc);

        let icf = CacheKey::icf("Jane Doe", "London, UK");
        assert_eq!(parse_key(&icf.to_string()).unwrap(), icf);
    }

    #[test]
    fn malformed_stored_keys_are_backend_errors() {
        for raw in ["", "EMCC", "EMCC:not-a-ref", "ICF:no-separator", "AC:x"] {
            assert!(parse_key(raw).is_err(), "{raw:?} should fail to parse");
        }
    }

    #[test]
    fn provenance_tokens_round_trip() {
        for provenance in [Provenance::Auto, Provenance::Url, Provenance::Manual] {
            assert_eq!(parse_provenance(provenance.as_str()).unwrap(), provenance);
        }
        assert!(parse_provenance("scraped").is_err());
    }
}
