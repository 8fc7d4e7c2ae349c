//! The set-judging predicate.
//!
//! Cards encode four features with three values each: the feature vector of a
//! card is the base-3 digit expansion of its id, which gives the standard
//! 81-card universe. Three cards form a valid set when every feature is
//! either identical across the three or pairwise distinct.

use crate::CardId;

/// Number of features per card.
pub const FEATURES: usize = 4;

/// Number of values per feature.
pub const FEATURE_VALUES: usize = 3;

/// Size of the card universe: every feature combination exactly once.
/// Card ids at or above this bound would alias the feature vectors of
/// lower ids.
pub const CARD_UNIVERSE: usize = FEATURE_VALUES.pow(FEATURES as u32);

/// Pass/fail judgement over three cards, plus a combinatorial search used
/// for the game-over check.
///
/// The judge is pure and stateless; implementations other than
/// [`StandardJudge`] exist so tests can rig verdicts.
pub trait SetJudge: Send + Sync {
    /// Whether the three cards form a valid set.
    fn is_valid_set(&self, cards: [CardId; 3]) -> bool;

    /// Find up to `limit` valid sets among `pool`. A `limit` of zero returns
    /// nothing.
    fn find_sets(&self, pool: &[CardId], limit: usize) -> Vec<[CardId; 3]> {
        let mut found = Vec::new();
        if limit == 0 {
            return found;
        }
        for i in 0..pool.len() {
            for j in i + 1..pool.len() {
                for k in j + 1..pool.len() {
                    if self.is_valid_set([pool[i], pool[j], pool[k]]) {
                        found.push([pool[i], pool[j], pool[k]]);
                        if found.len() == limit {
                            return found;
                        }
                    }
                }
            }
        }
        found
    }

    /// Whether any valid set exists among `pool`.
    fn has_set(&self, pool: &[CardId]) -> bool {
        !self.find_sets(pool, 1).is_empty()
    }
}

/// The real rules: four base-3 features, each all-same or all-different.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardJudge;

impl StandardJudge {
    /// Feature vector of a card (base-3 digits, least significant first).
    pub fn features(card: CardId) -> [u8; FEATURES] {
        let mut digits = [0u8; FEATURES];
        let mut rest = card;
        for digit in digits.iter_mut() {
            *digit = (rest % FEATURE_VALUES) as u8;
            rest /= FEATURE_VALUES;
        }
        digits
    }
}

impl SetJudge for StandardJudge {
    fn is_valid_set(&self, cards: [CardId; 3]) -> bool {
        let [a, b, c] = cards;
        if a == b || b == c || a == c {
            return false;
        }
        let (fa, fb, fc) = (Self::features(a), Self::features(b), Self::features(c));
        (0..FEATURES).all(|i| {
            let same = fa[i] == fb[i] && fb[i] == fc[i];
            let distinct = fa[i] != fb[i] && fb[i] != fc[i] && fa[i] != fc[i];
            same || distinct
        })
    }
}
