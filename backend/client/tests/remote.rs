use std::sync::Arc;

use axum::{Router, http::StatusCode, routing::post};
use client::{ClientError, Controller, Effect, Form, VoteClient, controller::THANKS};
use server::{
    auth::AccountDirectory, config::Config, ledger::Ledger, service::VoteService, state::State,
};
use tokio::net::TcpListener;

async fn spawn(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{address}")
}

async fn backend() -> VoteClient {
    let accounts = AccountDirectory::from_passwords([("a@b.com", "p1")]);
    let state = Arc::new(State {
        config: Config::default(),
        votes: VoteService::new(Ledger::memory(), Arc::new(accounts)),
    });

    VoteClient::new(spawn(server::router(state)).await)
}

#[tokio::test]
async fn vote_round_trip() {
    let client = backend().await;

    assert!(client.fetch_votes().await.unwrap().is_empty());

    let message = client.submit_vote("a@b.com", "p1").await.unwrap();
    assert_eq!(message, "Thank you for voting");

    let votes = client.fetch_votes().await.unwrap();
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].email, "a@b.com");

    match client.submit_vote("A@B.com", "p1").await {
        Err(ClientError::Rejected { status, message }) => {
            assert_eq!(status, 409);
            assert_eq!(message, "This account has already voted");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn controller_sign_in_refreshes_list() {
    let client = backend().await;
    let mut controller = Controller::new();

    controller.set_email("a@b.com");
    assert!(controller.next());
    controller.set_password("wrong");

    assert_eq!(controller.sign_in(&client).await, Effect::None);
    assert_eq!(controller.notice(), Some("Invalid email or password"));
    assert!(controller.votes().is_empty());

    controller.set_password("p1");
    assert_eq!(controller.sign_in(&client).await, Effect::RefreshVotes);
    assert_eq!(controller.form(), &Form::default());
    assert_eq!(controller.notice(), Some(THANKS));
    assert_eq!(controller.votes().len(), 1);
}

#[tokio::test]
async fn missing_message_falls_back() {
    let router = Router::new().route(
        "/api/vote",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "") }),
    );
    let client = VoteClient::new(spawn(router).await);

    match client.submit_vote("a@b.com", "p1").await {
        Err(ClientError::Rejected { status, message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "Error submitting vote");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_reports_errors() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let client = VoteClient::new(format!("http://{address}"));
    let mut controller = Controller::new();

    controller.refresh(&client).await;
    assert!(controller.votes().is_empty());
    assert_eq!(
        controller.notice(),
        Some("Unable to fetch votes from server.")
    );

    let err = client.submit_vote("a@b.com", "p1").await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
    assert_eq!(err.to_string(), "Error connecting to server");
}
