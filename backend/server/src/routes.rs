use std::sync::Arc;

use axum::{
    Json,
    extract::{State as Extract, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{error::AppError, ledger::VoteRecord, state::State};

#[derive(Deserialize)]
pub struct Ballot {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct Vote {
    pub email: String,
    pub timestamp: DateTime<Utc>,
}

impl From<VoteRecord> for Vote {
    fn from(record: VoteRecord) -> Self {
        Self {
            email: record.raw_identity,
            timestamp: record.timestamp,
        }
    }
}

#[derive(Serialize)]
pub struct Receipt {
    message: &'static str,
    vote: Vote,
}

pub async fn votes_handler(
    Extract(state): Extract<Arc<State>>,
) -> Result<Json<Vec<Vote>>, AppError> {
    let votes = state.votes.list_votes().await?;

    Ok(Json(votes.into_iter().map(Vote::from).collect()))
}

pub async fn vote_handler(
    Extract(state): Extract<Arc<State>>,
    payload: Result<Json<Ballot>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(ballot) = payload.map_err(|e| {
        warn!("Rejected vote payload: {e}");
        AppError::MalformedPayload
    })?;

    let record = state.votes.submit_vote(&ballot.email, &ballot.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(Receipt {
            message: "Thank you for voting",
            vote: record.into(),
        }),
    ))
}
