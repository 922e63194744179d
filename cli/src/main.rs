//! Terminal host for the blog client core.
//!
//! # Architecture
//!
//! ```text
//! stdin --> command parser --> App::dispatch --> Fetch --> ureq (blocking task)
//!                                   ^                            |
//!                                   +---- App::handle_response <-+
//! ```
//!
//! One event is applied to the `App` at a time, either a typed command or a
//! completed request, and the shell is re-rendered after each. Requests run
//! on blocking worker tasks so input stays responsive while they are out.

mod command;
mod config;
mod render;
mod transport;

use blog_core::{Action, ApiClient, App, Fetch, FileStore, HttpResponse, Ticket};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::command::{Command, HELP};
use crate::config::Config;
use crate::render::render;
use crate::transport::Transport;

/// A finished round-trip, tagged with the ticket it answers.
struct Completion {
    ticket: Ticket,
    outcome: Result<HttpResponse, String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let data_dir = config.data_dir()?;
    tracing::info!(api = %config.api_url, data_dir = %data_dir.display(), "starting");

    let transport = Transport::new(config.timeout());
    let mut app = App::new(ApiClient::new(&config.api_url), Box::new(FileStore::new(&data_dir)));
    let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();

    spawn_fetches(&transport, &tx, app.start());
    println!("{}", render(&app));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let action = match command::parse(&line) {
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(Command::Help)) => {
                        println!("{HELP}");
                        continue;
                    }
                    Ok(Some(Command::Act(action))) => action,
                    Ok(Some(Command::OpenIndex(n))) => match app.list().posts().get(n - 1) {
                        Some(post) => Action::OpenPost(post.id.clone()),
                        None => {
                            println!("no post at position {n}");
                            continue;
                        }
                    },
                    Ok(None) => continue,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };
                spawn_fetches(&transport, &tx, app.dispatch(action));
            }
            Some(done) = rx.recv() => {
                let follow_up = match done.outcome {
                    Ok(response) => app.handle_response(done.ticket, response),
                    Err(reason) => app.handle_transport_error(done.ticket, reason),
                };
                spawn_fetches(&transport, &tx, follow_up);
            }
        }
        println!("{}", render(&app));
    }
    Ok(())
}

fn spawn_fetches(transport: &Transport, tx: &mpsc::UnboundedSender<Completion>, fetches: Vec<Fetch>) {
    for fetch in fetches {
        let transport = transport.clone();
        let tx = tx.clone();
        tokio::task::spawn_blocking(move || {
            let outcome = transport.execute(fetch.request).map_err(|e| e.to_string());
            if tx.send(Completion { ticket: fetch.ticket, outcome }).is_err() {
                tracing::debug!("shell exited before response arrived");
            }
        });
    }
}
