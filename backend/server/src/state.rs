use std::sync::Arc;

use tracing::info;

use super::{
    auth::AccountDirectory,
    config::{Config, LedgerBackend},
    database::{RedisLedger, init_redis},
    ledger::Ledger,
    service::VoteService,
};

pub struct State {
    pub config: Config,
    pub votes: VoteService,
}

impl State {
    pub async fn new(config: Config) -> anyhow::Result<Arc<Self>> {
        let accounts = AccountDirectory::load(&config.accounts_path)?;

        let ledger = match config.ledger {
            LedgerBackend::Memory => {
                info!("Using in-memory ledger");
                Ledger::memory()
            }
            LedgerBackend::Redis => {
                info!("Connecting to Redis ledger...");
                Ledger::Redis(RedisLedger::new(init_redis(&config.redis_url).await?))
            }
        };

        Ok(Arc::new(Self {
            config,
            votes: VoteService::new(ledger, Arc::new(accounts)),
        }))
    }
}
