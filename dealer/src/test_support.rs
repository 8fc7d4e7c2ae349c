//! Shared fixtures for the dealer and player tests.

use cardtable_core::{CardId, Deck, StandardJudge, Table, TableView, TracingView};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Timing;
use crate::dealer::Dealer;
use crate::player::{InputHandle, Player, Seat};

/// Timings short enough to keep threaded tests fast while leaving generous
/// margins around every sleep-based assertion.
pub(crate) fn fast_timing() -> Timing {
    Timing {
        turn_timeout: Duration::from_millis(200),
        turn_timeout_warning: Duration::from_millis(50),
        point_freeze: Duration::from_millis(20),
        penalty_freeze: Duration::from_millis(20),
        refresh: Duration::from_millis(5),
        bot_interval: Duration::from_millis(1),
    }
}

/// Place the given cards on slots 0, 1, 2, ... of a table.
pub(crate) fn stage_table(table: &Table, cards: &[CardId]) {
    for (slot, &card) in cards.iter().enumerate() {
        assert!(table.place_card(card, slot));
    }
}

/// A 12-slot game with a staged table layout and deck, real rules, and a
/// seeded dealer rng.
pub(crate) fn staged_dealer(
    table_cards: &[CardId],
    deck_cards: &[CardId],
    seats: &[Seat],
    timing: Timing,
) -> (Dealer, Vec<Player>, Vec<InputHandle>, Arc<AtomicBool>) {
    let view: Arc<dyn TableView> = Arc::new(TracingView);
    let table = Arc::new(Table::new(12, Arc::clone(&view)));
    stage_table(&table, table_cards);

    let shutdown = Arc::new(AtomicBool::new(false));
    let (dealer, players, inputs) = Dealer::new(
        table,
        Arc::new(StandardJudge),
        view,
        Deck::from_cards(deck_cards.to_vec()),
        seats,
        timing,
        Some(7),
        Arc::clone(&shutdown),
    );
    (dealer, players, inputs, shutdown)
}
