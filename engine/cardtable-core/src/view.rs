//! One-way display notifications.
//!
//! The engine never waits on the display: every method is fire-and-forget.
//! The binary wires in [`TracingView`]; a graphical frontend would provide
//! its own implementation.

use crate::{CardId, PlayerId, SlotId};
use tracing::{debug, info, trace};

/// Display collaborator for the table, scores and countdowns.
pub trait TableView: Send + Sync {
    /// A card appeared on a slot.
    fn place_card(&self, card: CardId, slot: SlotId);

    /// A slot was emptied.
    fn remove_card(&self, slot: SlotId);

    /// A player placed a token on a slot.
    fn place_token(&self, player: PlayerId, slot: SlotId);

    /// A player's token left a slot.
    fn remove_token(&self, player: PlayerId, slot: SlotId);

    /// All tokens left a slot (the slot's card is being removed).
    fn remove_tokens(&self, slot: SlotId);

    /// A player's score changed.
    fn set_score(&self, player: PlayerId, score: u32);

    /// Remaining lockout time for a player; zero clears the freeze display.
    fn set_freeze(&self, player: PlayerId, millis: u64);

    /// Remaining time until the reshuffle deadline. `warn` is set when the
    /// remaining time dropped below the configured warning threshold.
    fn set_countdown(&self, millis: u64, warn: bool);

    /// The game ended; every listed player holds the top score.
    fn announce_winners(&self, players: &[PlayerId]);
}

/// A view that narrates the game through the log.
///
/// Countdown and freeze refreshes arrive many times per second, so they log
/// at trace; discrete board events log at debug.
#[derive(Debug, Default)]
pub struct TracingView;

impl TableView for TracingView {
    fn place_card(&self, card: CardId, slot: SlotId) {
        debug!(card, slot, "card placed");
    }

    fn remove_card(&self, slot: SlotId) {
        debug!(slot, "card removed");
    }

    fn place_token(&self, player: PlayerId, slot: SlotId) {
        debug!(player, slot, "token placed");
    }

    fn remove_token(&self, player: PlayerId, slot: SlotId) {
        debug!(player, slot, "token removed");
    }

    fn remove_tokens(&self, slot: SlotId) {
        trace!(slot, "slot tokens cleared");
    }

    fn set_score(&self, player: PlayerId, score: u32) {
        info!(player, score, "score updated");
    }

    fn set_freeze(&self, player: PlayerId, millis: u64) {
        trace!(player, millis, "freeze countdown");
    }

    fn set_countdown(&self, millis: u64, warn: bool) {
        trace!(millis, warn, "reshuffle countdown");
    }

    fn announce_winners(&self, players: &[PlayerId]) {
        info!(?players, "winners");
    }
}
