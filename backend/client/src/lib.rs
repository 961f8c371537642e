//! # Voting Client
//!
//! Client side of the voting backend.
//!
//! - [`remote`]: JSON calls against `/api/votes` and `/api/vote`
//! - [`controller`]: the two-step email/password form as a state machine
//!
//! The backend URL comes from `BACKEND_URL`, falling back to
//! `http://localhost:1111`.
pub mod controller;
pub mod remote;

pub use controller::{Controller, Effect, Form};
pub use remote::{ClientError, Vote, VoteClient};
