use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use client_core::{
    config::{load_settings, parse_url},
    selection::SelectOutcome,
    RosterClient,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::error::RecvError,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod commands;
mod view;

use commands::{parse_command, Command, HELP};

#[derive(Parser, Debug)]
#[command(about = "Browse and edit the player roster")]
struct Args {
    /// Overrides `backend_url` from client.toml and the environment.
    #[arg(long)]
    backend_url: Option<String>,
    #[arg(long)]
    enrichment_url: Option<String>,
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings()?;
    if let Some(raw) = &args.backend_url {
        settings.backend_url = parse_url("--backend-url", raw)?;
    }
    if let Some(raw) = &args.enrichment_url {
        settings.enrichment_url = parse_url("--enrichment-url", raw)?;
    }
    if let Some(ms) = args.timeout_ms {
        settings.request_timeout = Duration::from_millis(ms);
    }

    let client = RosterClient::new(&settings);
    let mut events = client.subscribe_events();
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if let Some(line) = view::render_event(&event) {
                        eprintln!("{line}");
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("desktop: event printer skipped {skipped} events");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    println!(
        "backend {} / descriptions {}",
        settings.backend_url, settings.enrichment_url
    );
    if client.mount().await.is_ok() {
        println!("{}", view::render_roster(&client.roster().await, None));
    }
    println!("type `help` for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        // Failures are already printed by the event task.
        if let Err(err) = run_command(&client, command).await {
            warn!("desktop: command failed: {err}");
        }
    }

    client.unmount().await;
    printer.abort();
    Ok(())
}

async fn run_command(client: &RosterClient, command: Command) -> Result<()> {
    match command {
        Command::List => {
            let selected = client.selection().await;
            println!(
                "{}",
                view::render_roster(&client.roster().await, selected.as_ref())
            );
        }
        Command::Sync => {
            client.sync().await?;
            let selected = client.selection().await;
            println!(
                "{}",
                view::render_roster(&client.roster().await, selected.as_ref())
            );
        }
        Command::Select { id } => {
            if let SelectOutcome::Selected(player) = client.select(id).await? {
                println!("{}", view::render_player(&player));
            }
        }
        Command::Show => match client.selection().await {
            Some(player) => println!("{}", view::render_player(&player)),
            None => println!("no player selected"),
        },
        Command::Draft => match client.draft().await {
            Some(draft) => println!("{}", serde_json::to_string_pretty(&draft)?),
            None => println!("no player selected"),
        },
        Command::Edit => {
            client.open_editor().await?;
            println!("editing; `set`, `clear`, `save` or `cancel`");
        }
        Command::Set { field, value } => client.set_field(&field, &value).await?,
        Command::Clear { field } => client.clear_field(&field).await?,
        Command::Cancel => {
            client.cancel_edit().await?;
            println!("draft discarded");
        }
        Command::Save => {
            let report = client.save().await?;
            println!("description: {}", report.description);
            if let Some(err) = report.refresh.sync_error {
                println!("saved, but the roster could not be refreshed: {err}");
            }
            if let Some(player) = client.selection().await {
                println!("{}", view::render_player(&player));
            }
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
    Ok(())
}
