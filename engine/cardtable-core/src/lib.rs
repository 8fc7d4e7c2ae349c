//! Core types for the cardtable engine
//!
//! This crate provides the leaf components of the game:
//! - `Table`: the shared board of slots holding cards and player tokens
//! - `Deck`: the pool of cards not currently on the table
//! - `SetJudge`: the pure pass/fail predicate over three cards
//! - `TableView`: one-way display notifications
//!
//! Card placement on the `Table` is mutated by a single coordinating thread;
//! token placement is safe from any thread because every slot carries its own
//! lock.

pub mod deck;
pub mod judge;
pub mod table;
pub mod view;

pub use deck::Deck;
pub use judge::{SetJudge, StandardJudge, CARD_UNIVERSE};
pub use table::Table;
pub use view::{TableView, TracingView};

/// Identifier of a card, `0..universe`.
pub type CardId = usize;

/// Index of a slot on the table.
pub type SlotId = usize;

/// Identifier of a player, `0..player_count`.
pub type PlayerId = usize;
