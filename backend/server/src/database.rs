//! # Redis
//!
//! Persistent ledger backend.
//!
//! Core purpose is to store votes so they survive restarts, and to make the
//! one-vote-per-identity check atomic across every server instance sharing
//! the same Redis.
//!
//! ## Layout
//!
//! - `votes:identities`: hash of identity -> record JSON, the uniqueness index
//! - `votes:log`: list of record JSON in arrival order, the enumeration
//!
//! ## Implementation
//!
//! - `HSETNX` on the index decides the winner
//! - `RPUSH` onto the log only runs for the winner
//! - Both happen in one Lua script, Redis runs scripts one at a time so there
//!   is no window between the check and the writes
//! - Listing is a single `LRANGE`, which never blocks writers
use std::time::Duration;

use chrono::Utc;
use redis::{
    AsyncCommands, Client, Script,
    aio::{ConnectionManager, ConnectionManagerConfig},
};

use crate::{
    identity::Identity,
    ledger::{LedgerError, VoteRecord},
};

pub const INDEX_KEY: &str = "votes:identities";
pub const LOG_KEY: &str = "votes:log";

const RECORD_SCRIPT: &str = r#"
    if redis.call('HSETNX', KEYS[1], ARGV[1], ARGV[2]) == 1 then
        redis.call('RPUSH', KEYS[2], ARGV[2])
        return 1
    end
    return 0
"#;

pub async fn init_redis(redis_url: &str) -> Result<ConnectionManager, redis::RedisError> {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(100));

    let client = Client::open(redis_url)?;

    client.get_connection_manager_with_config(config).await
}

#[derive(Clone)]
pub struct RedisLedger {
    connection: ConnectionManager,
    record_script: Script,
    index_key: String,
    log_key: String,
}

impl RedisLedger {
    pub fn new(connection: ConnectionManager) -> Self {
        Self::with_keys(connection, INDEX_KEY, LOG_KEY)
    }

    /// Separate key pairs keep independent ledgers apart on one Redis.
    pub fn with_keys(connection: ConnectionManager, index_key: &str, log_key: &str) -> Self {
        Self {
            connection,
            record_script: Script::new(RECORD_SCRIPT),
            index_key: index_key.to_string(),
            log_key: log_key.to_string(),
        }
    }

    pub async fn contains(&self, identity: &Identity) -> Result<bool, LedgerError> {
        let mut connection = self.connection.clone();

        let exists: bool = connection
            .hexists(&self.index_key, identity.as_str())
            .await?;

        Ok(exists)
    }

    pub async fn record(
        &self,
        identity: Identity,
        raw_identity: String,
    ) -> Result<VoteRecord, LedgerError> {
        let record = VoteRecord {
            identity,
            raw_identity,
            timestamp: Utc::now(),
        };
        let encoded = serde_json::to_string(&record)?;

        let mut connection = self.connection.clone();
        let inserted: i64 = self
            .record_script
            .key(&self.index_key)
            .key(&self.log_key)
            .arg(record.identity.as_str())
            .arg(&encoded)
            .invoke_async(&mut connection)
            .await?;

        if inserted == 0 {
            return Err(LedgerError::Duplicate(record.identity));
        }

        Ok(record)
    }

    pub async fn list_all(&self) -> Result<Vec<VoteRecord>, LedgerError> {
        let mut connection = self.connection.clone();
        let entries: Vec<String> = connection.lrange(&self.log_key, 0, -1).await?;

        entries
            .iter()
            .map(|entry| serde_json::from_str(entry).map_err(LedgerError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Needs a reachable Redis: REDIS_URL=redis://127.0.0.1:6379 cargo test -- --ignored
    async fn scratch_ledger(suffix: &str) -> RedisLedger {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into());
        let mut connection = init_redis(&url).await.unwrap();

        let index_key = format!("test:{suffix}:identities");
        let log_key = format!("test:{suffix}:log");
        let _: () = connection
            .del(vec![index_key.clone(), log_key.clone()])
            .await
            .unwrap();

        RedisLedger::with_keys(connection, &index_key, &log_key)
    }

    #[tokio::test]
    #[ignore]
    async fn test_redis_rejects_duplicate() {
        let ledger = scratch_ledger("duplicate").await;
        let identity = Identity::parse("a@b.com").unwrap();

        ledger.record(identity.clone(), "a@b.com".into()).await.unwrap();
        let err = ledger
            .record(identity.clone(), "A@B.com".into())
            .await
            .unwrap_err();

        assert!(matches!(err, LedgerError::Duplicate(_)));
        assert!(ledger.contains(&identity).await.unwrap());
        assert_eq!(ledger.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    #[ignore]
    async fn test_redis_concurrent_same_identity_single_winner() {
        let ledger = scratch_ledger("race").await;

        let attempts = (0..8).map(|_| {
            let ledger = ledger.clone();
            tokio::spawn(async move {
                ledger
                    .record(Identity::parse("a@b.com").unwrap(), "a@b.com".into())
                    .await
            })
        });

        let mut successes = 0;
        for attempt in attempts.collect::<Vec<_>>() {
            if attempt.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(ledger.list_all().await.unwrap().len(), 1);
    }
}
