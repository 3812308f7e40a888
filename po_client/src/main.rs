//! A headless Okey table client.
//!
//! Connects to a room server, follows one table and keeps a reconciled
//! picture of it, logging what changes. Lobby requests are typed at stdin.

use anyhow::{Context, Result};
use pico_args::Arguments;
use po_client::{
    commands::{Command, HELP_TEXT, parse_command},
    config::ClientConfig,
    logging,
    runner::TableRunner,
    websocket_client::{CommandSender, WebSocketClient, WsSink},
};
use private_okey::Reconciler;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    time::{Instant, MissedTickBehavior},
};

const HELP: &str = "\
Follow an Okey table from the terminal

USAGE:
  po_client [OPTIONS]

OPTIONS:
  --server URL          WebSocket URL  [default: ws://127.0.0.1:8080/ws]
  --user ID             User id to announce  [default: login name]
  --room ID             Room to join after connecting

FLAGS:
  -h, --help            Print help information

ENVIRONMENT:
  OKEY_SERVER_URL, OKEY_USER_ID, OKEY_ROOM_ID, OKEY_TICK_MS,
  OKEY_DEAL_FLY_SECONDS, RUST_LOG
";

#[tokio::main]
async fn main() -> Result<()> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let server = pargs.opt_value_from_str("--server")?;
    let user = pargs.opt_value_from_str("--user")?;
    let room = pargs.opt_value_from_str("--room")?;

    logging::init();

    let config = ClientConfig::from_env(server, user, room)?;
    config.validate()?;

    run(config).await
}

async fn run(config: ClientConfig) -> Result<()> {
    let connection = WebSocketClient::new(&config.server_url, &config.user_id)
        .connect()
        .await?;
    let mut sender = connection.sender;

    match &config.room_id {
        Some(room) => {
            sender.join_room(room).await?;
        }
        None => {
            sender.list_rooms().await?;
        }
    }

    let reconciler = Reconciler::with_defaults(config.engine.clone(), config.user_id.clone());
    let mut runner = TableRunner::new(reconciler, connection.inbox);

    let mut ticker = tokio::time::interval(config.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last = Instant::now();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            now = ticker.tick() => {
                let outcome = runner.step(now - last);
                last = now;
                if outcome.closed {
                    tracing::info!("Connection closed");
                    break;
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line.context("Failed to read stdin")? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => {
                        if !handle_line(&line, &mut sender, &runner).await? {
                            break;
                        }
                    }
                    None => stdin_open = false,
                }
            }
            _ = &mut shutdown => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    let _ = sender.close().await;
    connection.reader.abort();
    Ok(())
}

/// Returns `false` when the user asked to quit.
async fn handle_line(
    line: &str,
    sender: &mut CommandSender<WsSink>,
    runner: &TableRunner,
) -> Result<bool> {
    let command = match parse_command(line) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}");
            return Ok(true);
        }
    };

    match command {
        Command::Rooms => {
            sender.list_rooms().await?;
        }
        Command::Create => {
            sender.create_room().await?;
        }
        Command::Join(room) => {
            sender.join_room(&room).await?;
        }
        Command::Start(room) => match room.as_deref().or(runner.room_id()) {
            Some(room) => {
                sender.start_game(room).await?;
            }
            None => eprintln!("Not in a room; use 'start ROOM' or join one first"),
        },
        Command::Status => {
            tracing::info!(hud = %runner.reconciler().hud(), "{}", runner.summary());
        }
        Command::Help => println!("{HELP_TEXT}"),
        Command::Quit => return Ok(false),
    }
    Ok(true)
}
