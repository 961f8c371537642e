//! # Ledger
//!
//! Authoritative record of who voted and when.
//!
//! ## Rules
//!
//! - At most one record per normalized identity
//! - Records are never updated or removed
//! - Enumeration is insertion order, oldest first
//!
//! ## Backends
//!
//! - Memory: one `RwLock` over an identity index and the ordered records. The
//!   duplicate check and the insert share a single write guard.
//! - Redis: see [`crate::database`]. The duplicate check and both writes run
//!   inside one Lua script.
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{database::RedisLedger, identity::Identity};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub identity: Identity,
    pub raw_identity: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("{0} has already voted")]
    Duplicate(Identity),

    #[error("Storage error: {0}")]
    Storage(#[from] redis::RedisError),

    #[error("Corrupt ledger entry: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub enum Ledger {
    Memory(MemoryLedger),
    Redis(RedisLedger),
}

impl Ledger {
    pub fn memory() -> Self {
        Self::Memory(MemoryLedger::default())
    }

    pub async fn contains(&self, identity: &Identity) -> Result<bool, LedgerError> {
        match self {
            Self::Memory(ledger) => Ok(ledger.contains(identity)),
            Self::Redis(ledger) => ledger.contains(identity).await,
        }
    }

    pub async fn record(
        &self,
        identity: Identity,
        raw_identity: String,
    ) -> Result<VoteRecord, LedgerError> {
        match self {
            Self::Memory(ledger) => ledger.record(identity, raw_identity),
            Self::Redis(ledger) => ledger.record(identity, raw_identity).await,
        }
    }

    pub async fn list_all(&self) -> Result<Vec<VoteRecord>, LedgerError> {
        match self {
            Self::Memory(ledger) => Ok(ledger.list_all()),
            Self::Redis(ledger) => ledger.list_all().await,
        }
    }
}

#[derive(Default)]
struct Votes {
    index: HashMap<Identity, usize>,
    records: Vec<VoteRecord>,
}

#[derive(Default)]
pub struct MemoryLedger {
    votes: RwLock<Votes>,
}

impl MemoryLedger {
    pub fn contains(&self, identity: &Identity) -> bool {
        self.votes.read().index.contains_key(identity)
    }

    pub fn record(
        &self,
        identity: Identity,
        raw_identity: String,
    ) -> Result<VoteRecord, LedgerError> {
        let mut votes = self.votes.write();

        if votes.index.contains_key(&identity) {
            return Err(LedgerError::Duplicate(identity));
        }

        // stamped under the guard so timestamps follow insertion order
        let record = VoteRecord {
            identity: identity.clone(),
            raw_identity,
            timestamp: Utc::now(),
        };

        let position = votes.records.len();
        votes.records.push(record.clone());
        votes.index.insert(identity, position);

        Ok(record)
    }

    pub fn list_all(&self) -> Vec<VoteRecord> {
        self.votes.read().records.clone()
    }

    pub fn len(&self) -> usize {
        self.votes.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
