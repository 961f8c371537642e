use std::env;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:1111";
pub const SUBMIT_FALLBACK: &str = "Error submitting vote";

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Vote {
    pub email: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
struct Ballot<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize, Default)]
struct ServerMessage {
    message: Option<String>,
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Error connecting to server")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Rejected { status: u16, message: String },
}

pub struct VoteClient {
    client: Client,
    base_url: String,
}

impl VoteClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_env() -> Self {
        let base_url = env::var("BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());

        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn fetch_votes(&self) -> Result<Vec<Vote>, ClientError> {
        let response = self
            .client
            .get(format!("{}/api/votes", self.base_url))
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    /// Returns the server's message on success.
    pub async fn submit_vote(&self, email: &str, password: &str) -> Result<String, ClientError> {
        let response = self
            .client
            .post(format!("{}/api/vote", self.base_url))
            .json(&Ballot { email, password })
            .send()
            .await?;

        let status = response.status();
        let body: ServerMessage = response.json().await.unwrap_or_default();

        if status.is_success() {
            return Ok(body.message.unwrap_or_default());
        }

        let message = body
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| SUBMIT_FALLBACK.to_string());
        warn!("Vote rejected with {status}: {message}");

        Err(ClientError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
