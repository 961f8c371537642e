//! # Voting
//!
//! Submission pipeline: validate, normalize, authenticate, record. Each step
//! can refuse the vote and only the last one writes, so a refused submission
//! never touches the ledger.
//!
//! A successful submission returns just the new record. Clients are expected
//! to fetch the full list again afterwards rather than splice it in.
use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    auth::Authenticator,
    error::AppError,
    identity::Identity,
    ledger::{Ledger, LedgerError, VoteRecord},
};

pub const MISSING_EMAIL: &str = "Please enter your email or phone";
pub const MISSING_PASSWORD: &str = "Please enter your password";

pub struct VoteService {
    ledger: Ledger,
    authenticator: Arc<dyn Authenticator>,
}

impl VoteService {
    pub fn new(ledger: Ledger, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            ledger,
            authenticator,
        }
    }

    pub async fn list_votes(&self) -> Result<Vec<VoteRecord>, AppError> {
        Ok(self.ledger.list_all().await?)
    }

    pub async fn submit_vote(&self, email: &str, password: &str) -> Result<VoteRecord, AppError> {
        let identity = Identity::parse(email).ok_or(AppError::Validation(MISSING_EMAIL))?;

        if password.trim().is_empty() {
            return Err(AppError::Validation(MISSING_PASSWORD));
        }

        if !self.authenticator.authenticate(&identity, password) {
            warn!("Rejected credentials for {identity}");
            return Err(AppError::Authentication);
        }

        match self.ledger.record(identity, email.trim().to_string()).await {
            Ok(record) => {
                info!("Recorded vote for {}", record.identity);
                Ok(record)
            }
            Err(LedgerError::Duplicate(identity)) => {
                warn!("Duplicate vote from {identity}");
                Err(AppError::AlreadyVoted)
            }
            Err(e) => Err(e.into()),
        }
    }
}
