#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Card-based ammunition deck owned by every tower.
//!
//! Slots hold bullet configurations. Compiling the deck turns the occupied
//! slots into a draw pile of cards; fired cards land in the discard pile and
//! come back, in slot order, after a timed shuffle.

use std::{collections::VecDeque, time::Duration};

use card_defence_core::{BulletCard, BulletConfig, BulletKind, ConfigError, DeckSnapshot};

/// Progress reported by [`AmmunitionDeck::tick_shuffle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShuffleProgress {
    /// No shuffle is running.
    Idle,
    /// A shuffle is still running.
    Shuffling {
        /// Time left before the draw pile is restored.
        remaining: Duration,
    },
    /// The shuffle finished during this tick and the draw pile is restored.
    Completed,
}

/// Slots, draw pile, discard pile and shuffle timer of a single tower.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AmmunitionDeck {
    slots: Vec<Option<BulletConfig>>,
    draw_pile: VecDeque<BulletCard>,
    discard_pile: Vec<BulletCard>,
    shuffle: Option<Duration>,
}

impl AmmunitionDeck {
    /// Creates a deck with `slot_count` empty slots.
    #[must_use]
    pub fn new(slot_count: usize) -> Self {
        Self {
            slots: vec![None; slot_count],
            ..Self::default()
        }
    }

    /// Sets or clears the bullet loaded into slot `index`.
    ///
    /// The piles are left untouched; call [`AmmunitionDeck::compile`] to
    /// rebuild them from the slots.
    pub fn configure_slot(
        &mut self,
        index: usize,
        bullet: Option<BulletConfig>,
    ) -> Result<(), ConfigError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(ConfigError::SlotOutOfBounds { index, len })?;
        *slot = bullet;
        Ok(())
    }

    /// Rebuilds the draw pile from the occupied slots in ascending slot order.
    ///
    /// The discard pile is emptied and any running shuffle is cancelled.
    pub fn compile(&mut self) {
        self.draw_pile.clear();
        self.discard_pile.clear();
        self.shuffle = None;
        self.draw_pile.extend(
            self.slots
                .iter()
                .enumerate()
                .filter_map(|(index, slot)| slot.map(|config| BulletCard::new(config, index))),
        );
    }

    /// Draws the next card.
    ///
    /// Returns `None` while shuffling or when the deck holds no card. Running
    /// out of cards with a non-empty discard pile starts a shuffle lasting
    /// `reload_time`; drawing the last card starts it right away.
    pub fn draw(&mut self, reload_time: Duration) -> Option<BulletCard> {
        if self.shuffle.is_some() {
            return None;
        }

        let Some(card) = self.draw_pile.pop_front() else {
            self.begin_shuffle(reload_time);
            return None;
        };

        if self.draw_pile.is_empty() {
            self.begin_shuffle(reload_time);
        }
        Some(card)
    }

    /// Places a fired card on the discard pile.
    pub fn discard(&mut self, card: BulletCard) {
        self.discard_pile.push(card);
    }

    /// Advances the shuffle timer by `dt`.
    pub fn tick_shuffle(&mut self, dt: Duration) -> ShuffleProgress {
        let Some(remaining) = self.shuffle else {
            return ShuffleProgress::Idle;
        };

        let remaining = remaining.saturating_sub(dt);
        if !remaining.is_zero() {
            self.shuffle = Some(remaining);
            return ShuffleProgress::Shuffling { remaining };
        }

        self.shuffle = None;
        self.discard_pile.sort_by_key(BulletCard::home_slot);
        self.draw_pile.extend(self.discard_pile.drain(..));
        tracing::debug!(cards = self.draw_pile.len(), "shuffle completed");
        ShuffleProgress::Completed
    }

    /// Reports whether a shuffle is running.
    #[must_use]
    pub fn is_shuffling(&self) -> bool {
        self.shuffle.is_some()
    }

    /// Time left in the running shuffle.
    #[must_use]
    pub fn shuffle_remaining(&self) -> Option<Duration> {
        self.shuffle
    }

    /// Number of cards waiting in the draw pile.
    #[must_use]
    pub fn draw_pile_len(&self) -> usize {
        self.draw_pile.len()
    }

    /// Number of cards waiting in the discard pile.
    #[must_use]
    pub fn discard_pile_len(&self) -> usize {
        self.discard_pile.len()
    }

    /// Bullet configuration held by every slot.
    #[must_use]
    pub fn slots(&self) -> &[Option<BulletConfig>] {
        &self.slots
    }

    /// Number of slots in the deck.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Captures the deck state for queries.
    #[must_use]
    pub fn snapshot(&self) -> DeckSnapshot {
        DeckSnapshot {
            slots: self
                .slots
                .iter()
                .map(|slot| slot.as_ref().map(BulletConfig::kind))
                .collect::<Vec<Option<BulletKind>>>(),
            draw_pile: self.draw_pile.len(),
            discard_pile: self.discard_pile.len(),
            shuffle_remaining: self.shuffle,
        }
    }

    fn begin_shuffle(&mut self, reload_time: Duration) {
        if self.discard_pile.is_empty() {
            return;
        }

        self.shuffle = Some(reload_time);
        tracing::debug!(
            cards = self.discard_pile.len(),
            reload_ms = reload_time.as_millis() as u64,
            "shuffle started"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_defence_core::BulletPayload;

    const RELOAD: Duration = Duration::from_secs(2);

    fn archer() -> BulletConfig {
        BulletConfig::new(12, Duration::from_millis(700), BulletPayload::Single)
    }

    fn cannon() -> BulletConfig {
        BulletConfig::new(20, Duration::from_secs(2), BulletPayload::Splash { radius: 50.0 })
    }

    fn loaded_deck() -> AmmunitionDeck {
        let mut deck = AmmunitionDeck::new(3);
        deck.configure_slot(0, Some(archer())).expect("slot 0");
        deck.configure_slot(2, Some(cannon())).expect("slot 2");
        deck.compile();
        deck
    }

    #[test]
    fn compile_orders_cards_by_slot() {
        let mut deck = loaded_deck();
        assert_eq!(deck.draw_pile_len(), 2);

        let first = deck.draw(RELOAD).expect("first card");
        assert_eq!(first.home_slot(), 0);
        assert_eq!(first.kind(), BulletKind::Archer);
        deck.discard(first);

        let second = deck.draw(RELOAD).expect("second card");
        assert_eq!(second.home_slot(), 2);
        assert_eq!(second.kind(), BulletKind::Cannon);
    }

    #[test]
    fn full_cycle_restores_slot_order() {
        let mut deck = loaded_deck();
        let mut fired = Vec::new();

        while let Some(card) = deck.draw(RELOAD) {
            fired.push(card.home_slot());
            deck.discard(card);
        }
        assert!(deck.is_shuffling());
        assert_eq!(deck.discard_pile_len(), 2);

        assert_eq!(
            deck.tick_shuffle(Duration::from_secs(1)),
            ShuffleProgress::Shuffling {
                remaining: Duration::from_secs(1)
            }
        );
        assert_eq!(deck.tick_shuffle(Duration::from_secs(1)), ShuffleProgress::Completed);

        while let Some(card) = deck.draw(RELOAD) {
            fired.push(card.home_slot());
            deck.discard(card);
        }

        assert_eq!(fired, vec![0, 2, 0, 2]);
        assert_eq!(deck.draw_pile_len() + deck.discard_pile_len(), 2);
    }

    #[test]
    fn shuffle_restores_slot_order_regardless_of_discard_order() {
        let mut deck = AmmunitionDeck::new(3);
        deck.configure_slot(0, Some(archer())).expect("slot 0");
        deck.configure_slot(1, Some(cannon())).expect("slot 1");
        deck.configure_slot(2, Some(archer())).expect("slot 2");
        deck.compile();

        let mut in_hand = Vec::new();
        while let Some(card) = deck.draw(RELOAD) {
            in_hand.push(card);
        }
        assert_eq!(in_hand.len(), 3);
        for card in in_hand.into_iter().rev() {
            deck.discard(card);
        }

        assert_eq!(deck.draw(RELOAD), None);
        assert!(deck.is_shuffling());
        assert_eq!(deck.tick_shuffle(RELOAD), ShuffleProgress::Completed);

        let mut order = Vec::new();
        while let Some(card) = deck.draw(RELOAD) {
            order.push(card.home_slot());
        }
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn no_draw_while_shuffling() {
        let mut deck = loaded_deck();
        let first = deck.draw(RELOAD).expect("first");
        deck.discard(first);
        let second = deck.draw(RELOAD).expect("second");

        // The last draw found a non-empty discard pile, so the shuffle began.
        assert!(deck.is_shuffling());
        deck.discard(second);
        assert_eq!(deck.draw(RELOAD), None);
        assert_eq!(deck.shuffle_remaining(), Some(RELOAD));
    }

    #[test]
    fn single_slot_deck_shuffles_on_the_following_draw() {
        let mut deck = AmmunitionDeck::new(3);
        deck.configure_slot(1, Some(archer())).expect("slot 1");
        deck.compile();

        let card = deck.draw(RELOAD).expect("card");
        assert!(!deck.is_shuffling());
        deck.discard(card);

        assert_eq!(deck.draw(RELOAD), None);
        assert!(deck.is_shuffling());
        assert_eq!(deck.tick_shuffle(RELOAD), ShuffleProgress::Completed);
        assert_eq!(deck.draw(RELOAD).map(|card| card.home_slot()), Some(1));
    }

    #[test]
    fn empty_deck_never_shuffles() {
        let mut deck = AmmunitionDeck::new(3);
        deck.compile();

        assert_eq!(deck.draw(RELOAD), None);
        assert!(!deck.is_shuffling());
        assert_eq!(deck.tick_shuffle(RELOAD), ShuffleProgress::Idle);
    }

    #[test]
    fn out_of_bounds_slot_is_rejected() {
        let mut deck = AmmunitionDeck::new(3);
        let before = deck.clone();

        assert_eq!(
            deck.configure_slot(3, Some(archer())),
            Err(ConfigError::SlotOutOfBounds { index: 3, len: 3 })
        );
        assert_eq!(deck, before);
    }

    #[test]
    fn compile_cancels_shuffle_and_clears_discard() {
        let mut deck = loaded_deck();
        while let Some(card) = deck.draw(RELOAD) {
            deck.discard(card);
        }
        assert!(deck.is_shuffling());

        deck.configure_slot(1, Some(archer())).expect("slot 1");
        deck.compile();

        assert!(!deck.is_shuffling());
        assert_eq!(deck.discard_pile_len(), 0);
        assert_eq!(deck.draw_pile_len(), 3);
    }

    #[test]
    fn snapshot_reports_slot_kinds() {
        let deck = loaded_deck();
        let snapshot = deck.snapshot();

        assert_eq!(
            snapshot.slots,
            vec![Some(BulletKind::Archer), None, Some(BulletKind::Cannon)]
        );
        assert_eq!(snapshot.draw_pile, 2);
        assert!(!snapshot.is_shuffling());
    }
}
