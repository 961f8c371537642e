//! # Sign-in Form
//!
//! Headless version of the two-step voting form.
//!
//! ```text
//!                    next (email not blank)
//! CollectingIdentity ----------------------> CollectingCredential
//!        ^          <----------------------        |
//!        |                   back                  | begin_submit
//!        |                                         v
//!        +------------ finish_submit(Ok) ---- submitting = true
//! ```
//!
//! While a submission is in flight every edit and transition is refused, so
//! one controller never has two votes outstanding. A successful vote asks the
//! caller to reload the list through [`Effect::RefreshVotes`].
use tracing::warn;

use crate::remote::{ClientError, Vote, VoteClient};

pub const MISSING_EMAIL: &str = "Please enter your email or phone";
pub const MISSING_PASSWORD: &str = "Please enter your password";
pub const THANKS: &str = "Thank you for voting. Vote again";
pub const FETCH_FAILED: &str = "Unable to fetch votes from server.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Form {
    CollectingIdentity {
        email: String,
    },
    CollectingCredential {
        email: String,
        password: String,
        submitting: bool,
    },
}

impl Default for Form {
    fn default() -> Self {
        Form::CollectingIdentity {
            email: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    RefreshVotes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default)]
pub struct Controller {
    form: Form,
    votes: Vec<Vote>,
    notice: Option<String>,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        matches!(
            self.form,
            Form::CollectingCredential {
                submitting: true,
                ..
            }
        )
    }

    pub fn set_email(&mut self, value: &str) -> bool {
        match &mut self.form {
            Form::CollectingIdentity { email } => {
                *email = value.to_string();
                true
            }
            Form::CollectingCredential { .. } => false,
        }
    }

    pub fn next(&mut self) -> bool {
        let Form::CollectingIdentity { email } = &mut self.form else {
            return false;
        };

        if email.trim().is_empty() {
            self.notice = Some(MISSING_EMAIL.to_string());
            return false;
        }

        self.form = Form::CollectingCredential {
            email: std::mem::take(email),
            password: String::new(),
            submitting: false,
        };
        self.notice = None;

        true
    }

    pub fn set_password(&mut self, value: &str) -> bool {
        match &mut self.form {
            Form::CollectingCredential {
                password,
                submitting: false,
                ..
            } => {
                *password = value.to_string();
                true
            }
            _ => false,
        }
    }

    pub fn back(&mut self) -> bool {
        let Form::CollectingCredential {
            email,
            submitting: false,
            ..
        } = &mut self.form
        else {
            return false;
        };

        self.form = Form::CollectingIdentity {
            email: std::mem::take(email),
        };

        true
    }

    pub fn begin_submit(&mut self) -> Option<Submission> {
        let Form::CollectingCredential {
            email,
            password,
            submitting,
        } = &mut self.form
        else {
            return None;
        };

        if *submitting {
            return None;
        }

        if password.trim().is_empty() {
            self.notice = Some(MISSING_PASSWORD.to_string());
            return None;
        }

        *submitting = true;
        self.notice = None;

        Some(Submission {
            email: email.clone(),
            password: password.clone(),
        })
    }

    pub fn finish_submit(&mut self, outcome: Result<String, ClientError>) -> Effect {
        let Form::CollectingCredential { submitting, .. } = &mut self.form else {
            return Effect::None;
        };

        if !*submitting {
            return Effect::None;
        }

        match outcome {
            Ok(_) => {
                self.form = Form::default();
                self.notice = Some(THANKS.to_string());
                Effect::RefreshVotes
            }
            Err(e) => {
                *submitting = false;
                self.notice = Some(e.to_string());
                Effect::None
            }
        }
    }

    pub fn apply_votes(&mut self, fetched: Result<Vec<Vote>, ClientError>) {
        match fetched {
            Ok(votes) => self.votes = votes,
            Err(e) => {
                warn!("Error fetching votes: {e}");
                self.notice = Some(FETCH_FAILED.to_string());
            }
        }
    }

    pub async fn refresh(&mut self, client: &VoteClient) {
        let fetched = client.fetch_votes().await;
        self.apply_votes(fetched);
    }

    /// Runs one sign-in round trip, reloading the list when the vote lands.
    pub async fn sign_in(&mut self, client: &VoteClient) -> Effect {
        let Some(submission) = self.begin_submit() else {
            return Effect::None;
        };

        let outcome = client
            .submit_vote(&submission.email, &submission.password)
            .await;

        let effect = self.finish_submit(outcome);
        if effect == Effect::RefreshVotes {
            self.refresh(client).await;
        }

        effect
    }
}
