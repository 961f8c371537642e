//! # Accounts
//!
//! Who may vote is decided by an [`Authenticator`]. The service only ever
//! asks one yes/no question per submission and never learns why a pair was
//! refused.
//!
//! The shipped implementation is an [`AccountDirectory`] read from a JSON
//! secret file:
//!
//! ```json
//! { "voter@example.com": "<sha256 hex of password>" }
//! ```
//!
//! Keys go through [`normalize`] on load so lookups match the ledger key.
use std::{collections::HashMap, fs::read_to_string, path::Path};

use anyhow::Context;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::info;

use crate::identity::{Identity, normalize};

pub trait Authenticator: Send + Sync {
    fn authenticate(&self, identity: &Identity, password: &str) -> bool;
}

pub fn hash_password(password: &str) -> [u8; 32] {
    Sha256::digest(password.as_bytes()).into()
}

#[derive(Debug, Default)]
pub struct AccountDirectory {
    accounts: HashMap<String, [u8; 32]>,
}

impl AccountDirectory {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        let contents = read_to_string(path)
            .with_context(|| format!("Failed to read accounts from {}", path.display()))?;
        let entries: HashMap<String, String> =
            serde_json::from_str(&contents).context("Accounts file is not a JSON object")?;

        let mut accounts = HashMap::with_capacity(entries.len());
        for (email, digest_hex) in entries {
            let digest: [u8; 32] = hex::decode(digest_hex.trim())
                .ok()
                .and_then(|bytes| bytes.try_into().ok())
                .with_context(|| format!("Account {email} has an invalid password digest"))?;

            accounts.insert(normalize(&email), digest);
        }

        info!("Loaded {} accounts", accounts.len());

        Ok(Self { accounts })
    }

    pub fn from_passwords<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            accounts: pairs
                .into_iter()
                .map(|(email, password)| (normalize(email), hash_password(password)))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl Authenticator for AccountDirectory {
    fn authenticate(&self, identity: &Identity, password: &str) -> bool {
        let supplied = hash_password(password);

        match self.accounts.get(identity.as_str()) {
            Some(expected) => bool::from(expected.as_slice().ct_eq(supplied.as_slice())),
            None => false,
        }
    }
}
