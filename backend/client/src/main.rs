use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use client::{Controller, Effect, VoteClient};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every recorded vote, oldest first
    List,

    /// Sign in and cast this account's vote
    Vote { email: String, password: String },
}

fn print_votes(controller: &Controller) {
    if controller.votes().is_empty() {
        println!("No votes yet.");
        return;
    }

    for (position, vote) in controller.votes().iter().enumerate() {
        println!(
            "{}. {} ({})",
            position + 1,
            vote.email,
            vote.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();
    let client = VoteClient::from_env();
    let mut controller = Controller::new();

    match args.command {
        Command::List => controller.refresh(&client).await,
        Command::Vote { email, password } => {
            controller.set_email(&email);
            controller.next();
            controller.set_password(&password);

            if controller.sign_in(&client).await == Effect::None {
                bail!(
                    "{}",
                    controller.notice().unwrap_or("Error submitting vote")
                );
            }
        }
    }

    if let Some(notice) = controller.notice() {
        println!("{notice}\n");
    }
    print_votes(&controller);

    Ok(())
}
