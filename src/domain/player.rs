use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::{PlayerId, SeatIndex};

/// A seated player and their per-hand state.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Chips not committed to the current hand.
    pub stack: Chips,
    /// Chips committed on the current street.
    pub current_bet: Chips,
    /// Seated and dealt in. A busted player who has not rebought sits out
    /// with `is_active == false`.
    pub is_active: bool,
    pub is_all_in: bool,
    pub has_folded: bool,
    /// Seat index, equal to the player's index in `GameState::players`.
    pub position: SeatIndex,
    /// Hole cards. Redacted views leave this empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cards: Vec<Card>,
}

impl Player {
    pub fn new(id: PlayerId, name: String, stack: Chips, position: SeatIndex) -> Self {
        Self {
            id,
            name,
            stack,
            current_bet: Chips::ZERO,
            is_active: true,
            is_all_in: false,
            has_folded: false,
            position,
            cards: Vec::new(),
        }
    }

    /// Still contesting the pot (dealt in and not folded).
    pub fn is_in_hand(&self) -> bool {
        self.is_active && !self.has_folded
    }

    /// Can still make betting decisions this hand.
    pub fn can_act(&self) -> bool {
        self.is_in_hand() && !self.is_all_in
    }

    /// Move up to `amount` from the stack into the current street bet.
    /// Returns what was actually committed; running dry marks the player all-in.
    pub fn commit(&mut self, amount: Chips) -> Chips {
        let paid = amount.min(self.stack);
        self.stack -= paid;
        self.current_bet += paid;
        if self.stack.is_zero() && !paid.is_zero() {
            self.is_all_in = true;
        }
        paid
    }

    /// Take up to `amount` as dead money (antes): it goes to the pot without
    /// counting toward the street bet.
    pub fn post_dead(&mut self, amount: Chips) -> Chips {
        let paid = amount.min(self.stack);
        self.stack -= paid;
        if self.stack.is_zero() && !paid.is_zero() {
            self.is_all_in = true;
        }
        paid
    }

    /// Clear everything that only lives for one hand.
    pub fn reset_for_hand(&mut self) {
        self.current_bet = Chips::ZERO;
        self.is_all_in = false;
        self.has_folded = false;
        self.cards.clear();
        self.is_active = !self.stack.is_zero();
    }
}
