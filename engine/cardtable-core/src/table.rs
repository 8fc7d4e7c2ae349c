//! The shared board of slots.
//!
//! Each slot holds at most one card plus the set of players with a token on
//! it, guarded by its own lock so unrelated slots never serialize against
//! each other. Card placement and removal go through the dealer thread only;
//! token placement and removal may come from any player thread.
//!
//! Invariant: a token exists only on a slot that currently holds a card.
//! Removing a card clears the slot's tokens inside the same critical section,
//! so no thread can ever observe a token on an empty slot.

use crate::view::TableView;
use crate::{CardId, PlayerId, SlotId};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Slot {
    card: Option<CardId>,
    tokens: HashSet<PlayerId>,
}

/// The table: a fixed grid of slots shared between the dealer and the
/// player threads.
pub struct Table {
    slots: Vec<Mutex<Slot>>,
    view: Arc<dyn TableView>,
}

impl Table {
    pub fn new(slot_count: usize, view: Arc<dyn TableView>) -> Self {
        let slots = (0..slot_count).map(|_| Mutex::new(Slot::default())).collect();
        Self { slots, view }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn lock(&self, slot: SlotId) -> MutexGuard<'_, Slot> {
        // A poisoned slot lock means a holder panicked; the slot data itself
        // is a plain card/token pair and stays usable.
        match self.slots[slot].lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Place a card on an empty slot. Returns false (and changes nothing)
    /// if the slot is occupied.
    pub fn place_card(&self, card: CardId, slot: SlotId) -> bool {
        let mut guard = self.lock(slot);
        if guard.card.is_some() {
            return false;
        }
        guard.card = Some(card);
        self.view.place_card(card, slot);
        true
    }

    /// Remove the card from a slot, clearing every token on it in the same
    /// critical section. Returns the removed card, if the slot held one.
    pub fn remove_card(&self, slot: SlotId) -> Option<CardId> {
        let mut guard = self.lock(slot);
        let card = guard.card.take()?;
        guard.tokens.clear();
        self.view.remove_tokens(slot);
        self.view.remove_card(slot);
        Some(card)
    }

    /// The card currently on a slot.
    pub fn card_at(&self, slot: SlotId) -> Option<CardId> {
        self.lock(slot).card
    }

    /// Place a player's token on a slot. Ignored (returns false) when the
    /// slot holds no card or the token is already there.
    pub fn place_token(&self, player: PlayerId, slot: SlotId) -> bool {
        let mut guard = self.lock(slot);
        if guard.card.is_none() || !guard.tokens.insert(player) {
            return false;
        }
        self.view.place_token(player, slot);
        true
    }

    /// Remove a player's token from a slot. Returns whether it was present.
    pub fn remove_token(&self, player: PlayerId, slot: SlotId) -> bool {
        let mut guard = self.lock(slot);
        if !guard.tokens.remove(&player) {
            return false;
        }
        self.view.remove_token(player, slot);
        true
    }

    /// Whether a player's token sits on a slot.
    pub fn has_token(&self, player: PlayerId, slot: SlotId) -> bool {
        self.lock(slot).tokens.contains(&player)
    }

    /// Number of occupied slots.
    pub fn count_cards(&self) -> usize {
        (0..self.slots.len())
            .filter(|&s| self.lock(s).card.is_some())
            .count()
    }

    /// The cards currently on the table, in slot order.
    pub fn cards(&self) -> Vec<CardId> {
        (0..self.slots.len()).filter_map(|s| self.lock(s).card).collect()
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("slot_count", &self.slots.len())
            .field("occupied", &self.count_cards())
            .finish()
    }
}
