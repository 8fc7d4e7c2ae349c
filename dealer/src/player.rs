//! Player agent threads.
//!
//! Each seat runs one thread of control that drains its private input
//! channel of slot selections, maintains its tokens on the table, and
//! submits a claim to the dealer once three tokens are down. Computer seats
//! additionally run a synthetic-input thread feeding the same channel a
//! human input source would use; the player thread joins it before
//! returning.
//!
//! While a claim is in flight the player thread blocks on its private
//! verdict channel, so the only writer to a player's token record during
//! claim resolution is the dealer. The wait is a timed loop: it abandons the
//! claim when the shutdown flag rises, or when the dealer has consumed the
//! claimed slots for someone else's valid claim (the dealer drops such stale
//! claims without replying).

use cardtable_core::{PlayerId, SlotId, Table, TableView};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::Timing;
use crate::dealer::Claim;

/// Who drives a seat's input channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    /// Selections arrive through an [`InputHandle`].
    Human,
    /// Selections are generated by a synthetic-input thread.
    Bot,
}

/// The slice of a player visible to the dealer: the token-slot record the
/// dealer reads when servicing a claim (and clears on a valid one), and the
/// score the dealer increments.
#[derive(Debug)]
pub struct PlayerShared {
    pub id: PlayerId,
    tokens: Mutex<Vec<SlotId>>,
    score: AtomicU32,
}

impl PlayerShared {
    fn new(id: PlayerId) -> Self {
        Self {
            id,
            tokens: Mutex::new(Vec::with_capacity(3)),
            score: AtomicU32::new(0),
        }
    }

    pub(crate) fn tokens(&self) -> MutexGuard<'_, Vec<SlotId>> {
        match self.tokens.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn score(&self) -> u32 {
        self.score.load(Ordering::Acquire)
    }

    pub(crate) fn add_point(&self) -> u32 {
        self.score.fetch_add(1, Ordering::AcqRel) + 1
    }
}

/// Input-collaborator seam: delivers slot selections into one player's
/// input channel. Cloneable; selections from all producers interleave in
/// arrival order.
#[derive(Debug, Clone)]
pub struct InputHandle {
    player: PlayerId,
    tx: Sender<SlotId>,
}

impl InputHandle {
    pub(crate) fn new(player: PlayerId, tx: Sender<SlotId>) -> Self {
        Self { player, tx }
    }

    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Deliver a slot selection. Returns false once the player is gone.
    pub fn select(&self, slot: SlotId) -> bool {
        self.tx.send(slot).is_ok()
    }
}

/// One player agent. Owns the receiving ends of its input and verdict
/// channels; runs on its own thread via [`Player::run`].
pub struct Player {
    pub(crate) shared: Arc<PlayerShared>,
    pub(crate) table: Arc<Table>,
    pub(crate) view: Arc<dyn TableView>,
    pub(crate) seat: Seat,
    // Kept so the input channel stays open even with no external producer.
    pub(crate) input_tx: Sender<SlotId>,
    pub(crate) input_rx: Receiver<SlotId>,
    pub(crate) claims_tx: Sender<Claim>,
    pub(crate) verdict_rx: Receiver<bool>,
    pub(crate) shutdown: Arc<AtomicBool>,
    pub(crate) timing: Timing,
    pub(crate) bot_seed: Option<u64>,
    pub(crate) penalized: bool,
}

impl Player {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: PlayerId,
        seat: Seat,
        table: Arc<Table>,
        view: Arc<dyn TableView>,
        input_tx: Sender<SlotId>,
        input_rx: Receiver<SlotId>,
        claims_tx: Sender<Claim>,
        verdict_rx: Receiver<bool>,
        shutdown: Arc<AtomicBool>,
        timing: Timing,
        bot_seed: Option<u64>,
    ) -> Self {
        Self {
            shared: Arc::new(PlayerShared::new(id)),
            table,
            view,
            seat,
            input_tx,
            input_rx,
            claims_tx,
            verdict_rx,
            shutdown,
            timing,
            bot_seed,
            penalized: false,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.shared.id
    }

    pub fn shared(&self) -> Arc<PlayerShared> {
        Arc::clone(&self.shared)
    }

    /// Main loop for the player thread.
    pub fn run(mut self) {
        info!(player = self.shared.id, "player thread starting");
        let bot = match self.seat {
            Seat::Bot => self.spawn_bot(),
            Seat::Human => None,
        };

        while !self.shutdown.load(Ordering::Acquire) {
            match self.input_rx.recv_timeout(self.timing.refresh) {
                Ok(slot) => self.handle_selection(slot),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        if let Some(handle) = bot {
            if handle.join().is_err() {
                warn!(player = self.shared.id, "bot thread panicked");
            }
        }
        info!(player = self.shared.id, "player thread terminated");
    }

    /// Apply one slot selection.
    ///
    /// Selecting a slot already bearing this player's token cancels that
    /// token and lifts the penalty gate; otherwise a token is placed unless
    /// the player is penalized or already holds three. The third token
    /// submits a claim and blocks for the verdict.
    pub(crate) fn handle_selection(&mut self, slot: SlotId) {
        if slot >= self.table.slot_count() {
            debug!(player = self.shared.id, slot, "selection outside the table");
            return;
        }

        let held = self.shared.tokens().iter().position(|&s| s == slot);
        if let Some(position) = held {
            // Cancel affordance: revising the selection also ends a penalty.
            self.penalized = false;
            self.table.remove_token(self.shared.id, slot);
            self.shared.tokens().remove(position);
        } else if !self.penalized && self.shared.tokens().len() < 3 {
            if self.table.place_token(self.shared.id, slot) {
                self.shared.tokens().push(slot);
            }
        }

        let ready = !self.penalized && self.shared.tokens().len() == 3;
        if ready {
            self.submit_claim();
        }
    }

    fn submit_claim(&mut self) {
        // A verdict from an abandoned claim may still be buffered; a fresh
        // claim must only observe fresh verdicts.
        while self.verdict_rx.try_recv().is_ok() {}

        debug!(player = self.shared.id, "submitting claim");
        if self
            .claims_tx
            .send(Claim {
                player: self.shared.id,
            })
            .is_err()
        {
            // Dealer is gone; the shutdown flag ends the loop shortly.
            return;
        }

        match self.await_verdict() {
            Some(true) => {
                self.penalized = false;
                self.point();
            }
            Some(false) => {
                self.penalized = true;
                self.penalty();
            }
            None => self.prune_tokens(),
        }
    }

    /// Block for the verdict on the claim just submitted.
    ///
    /// Returns None when the wait is abandoned: shutdown, a closed channel,
    /// or the claim turning stale (fewer than three of our tokens left on
    /// the table, meaning the dealer gave the slots to someone else and will
    /// drop our claim unanswered).
    fn await_verdict(&self) -> Option<bool> {
        loop {
            match self.verdict_rx.recv_timeout(self.timing.refresh) {
                Ok(verdict) => return Some(verdict),
                Err(RecvTimeoutError::Timeout) => {
                    if self.shutdown.load(Ordering::Acquire) {
                        return None;
                    }
                    if self.live_token_count() < 3 {
                        debug!(player = self.shared.id, "claim went stale, abandoning wait");
                        return None;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => return None,
            }
        }
    }

    /// How many of our recorded tokens still sit on the table.
    fn live_token_count(&self) -> usize {
        let slots = self.shared.tokens().clone();
        slots
            .iter()
            .filter(|&&slot| self.table.has_token(self.shared.id, slot))
            .count()
    }

    /// Drop recorded tokens whose table counterpart is gone.
    fn prune_tokens(&self) {
        let id = self.shared.id;
        let table = Arc::clone(&self.table);
        self.shared.tokens().retain(|&slot| table.has_token(id, slot));
    }

    /// Point lockout: refresh the displayed score, then freeze.
    fn point(&self) {
        self.view.set_score(self.shared.id, self.shared.score());
        self.freeze(self.timing.point_freeze);
    }

    /// Penalty lockout. The penalty gate itself stays up after the freeze
    /// until the player cancels one of its tokens; that is what keeps a
    /// rejected triple from being resubmitted unchanged.
    fn penalty(&self) {
        self.freeze(self.timing.penalty_freeze);
    }

    /// Sleep out a lockout, refreshing the freeze display each step and
    /// observing the shutdown flag at every wake.
    fn freeze(&self, duration: Duration) {
        let deadline = Instant::now() + duration;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            self.view
                .set_freeze(self.shared.id, remaining.as_millis() as u64);
            if remaining.is_zero() || self.shutdown.load(Ordering::Acquire) {
                break;
            }
            thread::sleep(remaining.min(self.timing.refresh));
        }
    }

    /// Start the synthetic-input thread for a computer seat. It proposes a
    /// uniformly random slot at a fixed interval until shutdown.
    fn spawn_bot(&self) -> Option<thread::JoinHandle<()>> {
        let tx = self.input_tx.clone();
        let shutdown = Arc::clone(&self.shutdown);
        let slot_count = self.table.slot_count();
        let interval = self.timing.bot_interval;
        let mut rng = match self.bot_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let id = self.shared.id;

        let spawned = thread::Builder::new()
            .name(format!("bot-{id}"))
            .spawn(move || {
                info!(player = id, "bot thread starting");
                while !shutdown.load(Ordering::Acquire) {
                    let slot = rng.gen_range(0..slot_count);
                    if tx.send(slot).is_err() {
                        break;
                    }
                    thread::sleep(interval);
                }
                info!(player = id, "bot thread terminated");
            });

        match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(player = id, error = %e, "failed to spawn bot thread");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fast_timing, staged_dealer};

    #[test]
    fn selection_places_and_cancels_tokens() {
        // Slots 0..3 hold cards 0, 1, 3 (an invalid triple, so no claim can
        // fire even if the test places three tokens).
        let (_dealer, mut players, _inputs, _shutdown) =
            staged_dealer(&[0, 1, 3], &[], &[Seat::Human], fast_timing());
        let mut player = players.remove(0);

        player.handle_selection(0);
        player.handle_selection(1);
        assert!(player.table.has_token(0, 0));
        assert!(player.table.has_token(0, 1));
        assert_eq!(player.shared.tokens().as_slice(), &[0, 1]);

        // Selecting a held slot cancels the token.
        player.handle_selection(0);
        assert!(!player.table.has_token(0, 0));
        assert_eq!(player.shared.tokens().as_slice(), &[1]);
    }

    #[test]
    fn selection_on_empty_slot_is_ignored() {
        let (_dealer, mut players, _inputs, _shutdown) =
            staged_dealer(&[0, 1], &[], &[Seat::Human], fast_timing());
        let mut player = players.remove(0);

        // Slot 2 exists but holds no card; slot 99 is off the table.
        player.handle_selection(2);
        player.handle_selection(99);
        assert!(player.shared.tokens().is_empty());
    }

    #[test]
    fn penalty_gate_blocks_new_tokens_until_cancel() {
        let (_dealer, mut players, _inputs, _shutdown) =
            staged_dealer(&[0, 1, 3, 9], &[], &[Seat::Human], fast_timing());
        let mut player = players.remove(0);

        player.handle_selection(0);
        player.penalized = true;

        // New placements are ignored while the gate is up.
        player.handle_selection(3);
        assert!(!player.table.has_token(0, 3));
        assert_eq!(player.shared.tokens().as_slice(), &[0]);

        // Canceling the held token lifts the gate.
        player.handle_selection(0);
        assert!(!player.penalized);
        player.handle_selection(3);
        assert!(player.table.has_token(0, 3));
    }

    #[test]
    fn fourth_selection_never_places_a_token() {
        // Cards 0, 1, 3 (slots 0..3) are an invalid triple, so the claim
        // the full hand triggers comes back as a penalty, not a clear.
        let (mut dealer, mut players, _inputs, _shutdown) =
            staged_dealer(&[0, 1, 3, 9], &[], &[Seat::Human], fast_timing());
        let mut player = players.remove(0);

        player.handle_selection(0);
        player.handle_selection(1);
        // Stage the third token directly so the hand fills without a claim.
        assert!(player.table.place_token(0, 2));
        player.shared.tokens().push(2);
        assert!(!player.penalized);

        let dealer_handle = std::thread::spawn(move || {
            if let Ok(claim) = dealer.claims_rx.recv_timeout(Duration::from_secs(2)) {
                dealer.service_claim(claim);
            }
            dealer
        });

        // A fourth selection on a fresh slot is ignored outright; the full
        // hand it leaves behind is what gets (re)claimed.
        player.handle_selection(3);
        let dealer = dealer_handle.join().unwrap();

        assert!(!dealer.table().has_token(0, 3));
        assert_eq!(player.shared.tokens().as_slice(), &[0, 1, 2]);
        for slot in 0..3 {
            assert!(dealer.table().has_token(0, slot));
        }
    }

    #[test]
    fn claim_round_trip_awards_point_and_clears_tokens() {
        // Cards 0, 1, 2 form a valid set.
        let (mut dealer, mut players, inputs, shutdown) =
            staged_dealer(&[0, 1, 2], &[], &[Seat::Human], fast_timing());
        let player = players.remove(0);
        let shared = player.shared();

        let player_handle = std::thread::spawn(move || player.run());
        let dealer_handle = std::thread::spawn(move || {
            if let Ok(claim) = dealer.claims_rx.recv_timeout(Duration::from_secs(2)) {
                dealer.service_claim(claim);
            }
            dealer
        });

        assert!(inputs[0].select(0));
        assert!(inputs[0].select(1));
        assert!(inputs[0].select(2));

        let dealer = dealer_handle.join().unwrap();
        assert_eq!(shared.score(), 1);
        assert_eq!(dealer.matched_cards(), &[0, 1, 2]);
        for slot in 0..3 {
            assert_eq!(dealer.table().card_at(slot), None); // staged deck was empty
            assert!(!dealer.table().has_token(0, slot));
        }
        assert!(shared.tokens().is_empty());

        shutdown.store(true, Ordering::Release);
        player_handle.join().unwrap();
    }

    #[test]
    fn invalid_claim_penalizes_and_keeps_tokens() {
        // Cards 0, 1, 3 do not form a set.
        let (mut dealer, mut players, inputs, shutdown) =
            staged_dealer(&[0, 1, 3, 9], &[], &[Seat::Human], fast_timing());
        let player = players.remove(0);
        let shared = player.shared();

        let player_handle = std::thread::spawn(move || player.run());
        let dealer_handle = std::thread::spawn(move || {
            if let Ok(claim) = dealer.claims_rx.recv_timeout(Duration::from_secs(2)) {
                dealer.service_claim(claim);
            }
            dealer
        });

        for slot in 0..3 {
            assert!(inputs[0].select(slot));
        }
        let dealer = dealer_handle.join().unwrap();

        // Wait out the (tiny) penalty freeze, then probe the gate: a new
        // placement must be ignored, a cancel must land.
        std::thread::sleep(Duration::from_millis(300));
        assert_eq!(shared.score(), 0);
        for slot in 0..3 {
            assert!(dealer.table().has_token(0, slot));
        }

        assert!(inputs[0].select(3));
        std::thread::sleep(Duration::from_millis(200));
        assert!(!dealer.table().has_token(0, 3));

        assert!(inputs[0].select(0)); // cancel lifts the gate
        assert!(inputs[0].select(3));
        std::thread::sleep(Duration::from_millis(200));
        assert!(!dealer.table().has_token(0, 0));
        assert!(dealer.table().has_token(0, 3));

        shutdown.store(true, Ordering::Release);
        player_handle.join().unwrap();
    }

    #[test]
    fn shutdown_ends_player_and_bot_threads() {
        let (dealer, mut players, _inputs, shutdown) =
            staged_dealer(&[0, 1, 3], &[], &[Seat::Bot], fast_timing());
        let player = players.remove(0);
        let handle = std::thread::spawn(move || player.run());

        std::thread::sleep(Duration::from_millis(50));
        shutdown.store(true, Ordering::Release);
        handle.join().unwrap();
        drop(dealer);
    }
}
