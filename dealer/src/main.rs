//! Dealer - the runnable cardtable game
//!
//! A single process that runs:
//! 1. The dealer thread: deals cards, validates claims, drives the countdown
//! 2. One thread per player seat
//! 3. One synthetic-input thread per computer seat
//!
//! The board, scores and countdowns are narrated through the log; a
//! graphical frontend would plug in its own `TableView` and feed human
//! seats through their `InputHandle`s.

use anyhow::Result;
use cardtable_core::{Deck, SetJudge, StandardJudge, Table, TableView, TracingView};
use clap::Parser;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

mod config;
mod dealer;
mod player;
#[cfg(test)]
mod test_support;

use crate::config::Config;
use crate::dealer::Dealer;
use crate::player::Seat;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;

    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "tracing initialized");
    info!(
        rows = config.rows,
        columns = config.columns,
        deck_size = config.deck_size,
        humans = config.humans,
        computers = config.computers,
        "starting game"
    );

    // Level-triggered termination flag, observed at every blocking wait.
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = Arc::clone(&shutdown);
        ctrlc::set_handler(move || {
            info!("shutdown signal received, ending the game");
            shutdown.store(true, Ordering::Release);
        })?;
    }

    let view: Arc<dyn TableView> = Arc::new(TracingView);
    let table = Arc::new(Table::new(config.slot_count(), Arc::clone(&view)));
    let judge: Arc<dyn SetJudge> = Arc::new(StandardJudge);
    let deck = Deck::new(config.deck_size);

    let mut seats = vec![Seat::Human; config.humans];
    seats.extend(std::iter::repeat(Seat::Bot).take(config.computers));

    let (mut dealer, players, inputs) = Dealer::new(
        table,
        judge,
        view,
        deck,
        &seats,
        config.timing(),
        config.seed,
        shutdown,
    );

    if config.humans > 0 {
        warn!(
            humans = config.humans,
            "human seats have no input source wired in this binary; they will stay idle"
        );
    }
    // Keep the input channels open for the lifetime of the game.
    let _inputs = inputs;

    match dealer.run(players) {
        Ok(()) => {
            info!("game finished");
            Ok(())
        }
        Err(e) => {
            error!("dealer failed: {e}");
            Err(e)
        }
    }
}
