//! `MovieBox` - Movie catalog client
//!
//! A line-oriented shell over the catalog and session state core.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod command;
mod render;

use anyhow::Context;
use command::Command;
use moviebox_core::{Config, Store};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so rendered output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moviebox=info,moviebox_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting MovieBox");

    let config = Config::load()
        .await
        .with_context(|| format!("Failed to load {}", Config::default_path().display()))?;
    let store = config
        .build_store()
        .await
        .context("Failed to set up the store")?;

    watch_session(&store);
    if let Some(line) = render::outcome(&store.initialize().await) {
        println!("{line}");
    }
    print!("{}", render::state(&store.snapshot()));

    run(&store).await
}

/// Reads commands from stdin until `quit` or end of input.
async fn run(store: &Store) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => println!("{}", command::HELP),
            Command::State { json: false } => print!("{}", render::state(&store.snapshot())),
            Command::State { json: true } => {
                println!("{}", serde_json::to_string_pretty(&store.snapshot())?);
            }
            Command::Dispatch(intent) => {
                debug!("Dispatching {intent:?}");
                let outcome = store.dispatch(intent).await;
                if let Some(line) = render::outcome(&outcome) {
                    println!("{line}");
                }
                print!("{}", render::state(&store.snapshot()));
            }
        }
    }
    info!("Bye");
    Ok(())
}

/// Logs sign-in and sign-out transitions as they happen.
fn watch_session(store: &Store) {
    let mut rx = store.subscribe();
    tokio::spawn(async move {
        let mut signed_in = rx.borrow().auth.user_id();
        while rx.changed().await.is_ok() {
            let current = rx.borrow_and_update().auth.user_id();
            if current != signed_in {
                match current {
                    Some(id) => info!("Session started for user {id}"),
                    None => info!("Session ended"),
                }
                signed_in = current;
            }
        }
    });
}
