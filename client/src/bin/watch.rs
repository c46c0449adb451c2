//! Terminal table watcher - deals a game and mirrors it until someone
//! pegs out:
//! 1. Asks the server to deal a fresh game
//! 2. Polls `/status` on the configured interval
//! 3. Logs hands, crib, and starter as they change
//! 4. Walks the board pegs and exits on a win

use anyhow::Context;
use clap::Parser;
use pegboard_client::{Board, BoardConfig, BoardEvent, Client, Poller, Store, Update};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Watch a cribbage table from the terminal")]
struct Args {
    #[arg(short, long, default_value = pegboard_client::DEFAULT_BASE_URL)]
    url: String,

    /// Seconds between status polls.
    #[arg(short, long, default_value_t = 2.0)]
    interval_secs: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse args
    let args = Args::parse();

    // Setup logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let client = Client::new(&args.url).context("invalid server URL")?;
    let store = Store::new();
    let board = Board::new(BoardConfig::default());
    let mut poller = Poller::new(client.clone(), store.clone())
        .with_interval(Duration::from_secs_f64(args.interval_secs));

    let mut updates = store.subscribe();
    let mut board_events = board.subscribe();

    info!(url = %args.url, "dealing new game");
    let dealt = client.deal().await.context("deal failed")?;
    for player in &dealt.players {
        let hand: Vec<String> = player.hand.iter().map(|card| card.label()).collect();
        info!(name = %player.name, hand = %hand.join(" "), "dealt hand");
    }
    store.apply_dealt(dealt);
    poller.start();

    loop {
        tokio::select! {
            Some(update) = updates.next() => match update {
                Update::State(state) => {
                    if let Some(starter) = &state.starter {
                        info!(starter = %starter.display_name(), phase = %state.phase, "table updated");
                    }
                    board.apply(&state);
                }
                Update::Failed(err) => warn!(%err, "server unreachable, still trying"),
            },
            Some(event) = board_events.next() => match event {
                BoardEvent::Moved { player, position } => {
                    info!(player, x = position.x, y = position.y, "peg moved");
                }
                BoardEvent::Won { player } => {
                    info!("player {} pegged out, game over", player + 1);
                    break;
                }
            },
            else => break,
        }
    }

    poller.stop();
    client.reset().await.context("reset failed")?;
    store.apply_reset();
    board.reset();

    Ok(())
}
