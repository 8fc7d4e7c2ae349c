//! The dealer thread: sole authority over card placement and the deck.
//!
//! The dealer owns the claims queue fed by every player. Claims are drained
//! one at a time, in arrival order, by this single consumer; that is the
//! mutual exclusion that makes it impossible for two players to be credited
//! for overlapping cards. The round countdown is folded into the same wait:
//! the dealer blocks on the claims channel with a timeout bounded by the
//! time remaining, so it wakes for whichever comes first, a claim or the
//! reshuffle deadline.

use anyhow::Result;
use cardtable_core::{CardId, Deck, PlayerId, SetJudge, SlotId, Table, TableView};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::Timing;
use crate::player::{InputHandle, Player, PlayerShared, Seat};

/// A player's submission of its three current token slots for validation.
/// Carries only the identity; the dealer reads the token record at service
/// time, which is what makes the stale-claim policy well defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Claim {
    pub player: PlayerId,
}

/// How the dealer disposed of a claim.
///
/// `Stale` is deliberately not an error: a claim that no longer matches the
/// table is a defined no-op, dropped without a verdict. Tagging the reason
/// keeps that policy from swallowing anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// Three live tokens on a valid set: point awarded, cards replaced.
    Valid,
    /// Three live tokens on an invalid triple: penalty verdict delivered.
    Invalid,
    /// The claim no longer matches the table; no verdict is delivered.
    Stale(StaleReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    /// The claimant's token record no longer lists three slots.
    TokensChanged,
    /// A claimed slot lost its card, or the claimant's token on it, before
    /// the claim was serviced.
    SlotVacated,
}

/// The dealer. Built together with the player agents so the claim and
/// verdict channels stay single-consumer by construction.
pub struct Dealer {
    table: Arc<Table>,
    judge: Arc<dyn SetJudge>,
    view: Arc<dyn TableView>,
    deck: Deck,
    players: Vec<Arc<PlayerShared>>,
    verdicts: Vec<Sender<bool>>,
    pub(crate) claims_rx: Receiver<Claim>,
    shutdown: Arc<AtomicBool>,
    timing: Timing,
    rng: ChaCha20Rng,
    /// Slot visit order for placement, reshuffled each pass to avoid
    /// positional bias.
    slot_order: Vec<SlotId>,
    reshuffle_at: Instant,
    /// Cards removed for valid claims; they never return to the deck.
    matched: Vec<CardId>,
}

impl Dealer {
    /// Wire up the dealer and one player agent per seat.
    ///
    /// Returns the dealer, the players (to be consumed by their threads via
    /// [`Dealer::run`]) and one input handle per seat for external input
    /// sources.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        table: Arc<Table>,
        judge: Arc<dyn SetJudge>,
        view: Arc<dyn TableView>,
        deck: Deck,
        seats: &[Seat],
        timing: Timing,
        seed: Option<u64>,
        shutdown: Arc<AtomicBool>,
    ) -> (Dealer, Vec<Player>, Vec<InputHandle>) {
        let (claims_tx, claims_rx) = unbounded();

        let mut players = Vec::with_capacity(seats.len());
        let mut shared = Vec::with_capacity(seats.len());
        let mut verdicts = Vec::with_capacity(seats.len());
        let mut inputs = Vec::with_capacity(seats.len());

        for (id, &seat) in seats.iter().enumerate() {
            let (input_tx, input_rx) = unbounded();
            // Unbounded so verdict delivery never blocks the dealer, even
            // for a player that stopped listening.
            let (verdict_tx, verdict_rx) = unbounded();

            let player = Player::new(
                id,
                seat,
                Arc::clone(&table),
                Arc::clone(&view),
                input_tx.clone(),
                input_rx,
                claims_tx.clone(),
                verdict_rx,
                Arc::clone(&shutdown),
                timing,
                seed.map(|s| s.wrapping_add(id as u64)),
            );
            shared.push(player.shared());
            players.push(player);
            verdicts.push(verdict_tx);
            inputs.push(InputHandle::new(id, input_tx));
        }

        let slot_order: Vec<SlotId> = (0..table.slot_count()).collect();
        let rng = match seed {
            Some(s) => ChaCha20Rng::seed_from_u64(s),
            None => ChaCha20Rng::from_entropy(),
        };

        let dealer = Dealer {
            table,
            judge,
            view,
            deck,
            players: shared,
            verdicts,
            claims_rx,
            shutdown,
            timing,
            rng,
            slot_order,
            reshuffle_at: Instant::now() + timing.turn_timeout,
            matched: Vec::new(),
        };
        (dealer, players, inputs)
    }

    /// Main loop for the dealer thread. Spawns the player threads, runs
    /// rounds until the game is over, then signals shutdown, joins every
    /// player and announces the winners.
    pub fn run(&mut self, players: Vec<Player>) -> Result<()> {
        info!("dealer thread starting");

        let mut handles = Vec::with_capacity(players.len());
        for player in players {
            let name = format!("player-{}", player.id());
            handles.push(thread::Builder::new().name(name).spawn(move || player.run())?);
        }

        while !self.should_finish() {
            self.place_cards_on_table();
            self.update_countdown(true);
            self.timer_loop();
            self.remove_all_cards_from_table();
        }

        // Level-triggered: every blocking wait in the player and bot threads
        // rechecks this flag on wake.
        self.shutdown.store(true, Ordering::Release);
        for handle in handles {
            if handle.join().is_err() {
                warn!("player thread panicked");
            }
        }

        self.announce_winners();
        info!("dealer thread terminated");
        Ok(())
    }

    /// Inner loop of one round: wait for claims or the deadline, whichever
    /// comes first, refreshing the countdown display on every wake.
    fn timer_loop(&mut self) {
        loop {
            if self.shutdown.load(Ordering::Acquire) {
                return;
            }
            let remaining = self.reshuffle_at.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return;
            }

            match self.claims_rx.recv_timeout(remaining.min(self.timing.refresh)) {
                Ok(claim) => {
                    self.update_countdown(false);
                    let outcome = self.service_claim(claim);
                    debug!(player = claim.player, ?outcome, "claim serviced");
                    self.fill_empty_slots();
                }
                Err(RecvTimeoutError::Timeout) => self.update_countdown(false),
                // All claim senders gone means all players exited.
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }
    }

    /// Validate one claim against the current table. This runs only on the
    /// dealer thread, one claim at a time.
    pub(crate) fn service_claim(&mut self, claim: Claim) -> ClaimOutcome {
        let player = claim.player;
        let slots: Vec<SlotId> = self.players[player].tokens().clone();
        if slots.len() != 3 {
            debug!(player, held = slots.len(), "stale claim: token count changed");
            return ClaimOutcome::Stale(StaleReason::TokensChanged);
        }

        let mut cards = [0; 3];
        for (i, &slot) in slots.iter().enumerate() {
            let live = self.table.has_token(player, slot);
            match self.table.card_at(slot) {
                Some(card) if live => cards[i] = card,
                _ => {
                    debug!(player, slot, "stale claim: slot vacated before service");
                    return ClaimOutcome::Stale(StaleReason::SlotVacated);
                }
            }
        }

        if !self.judge.is_valid_set(cards) {
            self.deliver_verdict(player, false);
            return ClaimOutcome::Invalid;
        }

        for &slot in &slots {
            self.table.remove_token(player, slot);
        }
        self.players[player].tokens().clear();

        // Slot-for-slot replacement: each vacated slot is refilled right
        // away while the deck lasts.
        for &slot in &slots {
            if let Some(card) = self.table.remove_card(slot) {
                self.matched.push(card);
            }
            if let Some(card) = self.deck.draw() {
                self.table.place_card(card, slot);
            }
        }

        let score = self.players[player].add_point();
        info!(player, score, ?cards, "valid set claimed");
        self.update_countdown(true);
        self.deliver_verdict(player, true);
        ClaimOutcome::Valid
    }

    fn deliver_verdict(&self, player: PlayerId, valid: bool) {
        if self.verdicts[player].send(valid).is_err() {
            warn!(player, "verdict channel closed; player already terminated");
        }
    }

    /// Fill every empty slot from the deck, shuffling the deck and the slot
    /// visit order first.
    fn place_cards_on_table(&mut self) {
        self.deck.shuffle(&mut self.rng);
        self.slot_order.shuffle(&mut self.rng);
        self.fill_empty_slots();
    }

    fn fill_empty_slots(&mut self) {
        if self.deck.is_empty() {
            return;
        }
        for i in 0..self.slot_order.len() {
            let slot = self.slot_order[i];
            if self.table.card_at(slot).is_none() {
                match self.deck.draw() {
                    Some(card) => {
                        self.table.place_card(card, slot);
                    }
                    None => break,
                }
            }
        }
    }

    /// Reset and/or refresh the countdown and its display.
    fn update_countdown(&mut self, reset: bool) {
        if reset {
            self.reshuffle_at = Instant::now() + self.timing.turn_timeout;
        }
        let remaining = self.reshuffle_at.saturating_duration_since(Instant::now());
        self.view.set_countdown(
            remaining.as_millis() as u64,
            remaining <= self.timing.turn_timeout_warning,
        );
    }

    /// Sweep every card on the table back into the deck at round end. Token
    /// clearing rides along inside `Table::remove_card`.
    fn remove_all_cards_from_table(&mut self) {
        for slot in 0..self.table.slot_count() {
            if let Some(card) = self.table.remove_card(slot) {
                self.deck.return_card(card);
            }
        }
    }

    /// Whether the game is over: termination requested, the deck exhausted,
    /// or no valid set left among the undealt cards.
    fn should_finish(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
            || self.deck.is_empty()
            || !self.judge.has_set(self.deck.cards())
    }

    /// Every player whose score equals the maximum wins.
    fn announce_winners(&self) {
        let top = self
            .players
            .iter()
            .map(|p| p.score())
            .max()
            .unwrap_or(0);
        let winners: Vec<PlayerId> = self
            .players
            .iter()
            .filter(|p| p.score() == top)
            .map(|p| p.id)
            .collect();
        info!(?winners, top_score = top, "game over");
        self.view.announce_winners(&winners);
    }

    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn matched_cards(&self) -> &[CardId] {
        &self.matched
    }

    pub fn player(&self, id: PlayerId) -> &Arc<PlayerShared> {
        &self.players[id]
    }
}
