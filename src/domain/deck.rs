use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, Rank, Suit};

/// Deck of cards, dealt from the top (the end of `cards`).
/// Shuffling is the engine's job (through its `RandomSource`), not the deck's.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    pub cards: Vec<Card>,
}

impl Deck {
    /// Standard 52-card deck in the order
    /// Clubs 2..A, Diamonds 2..A, Hearts 2..A, Spades 2..A.
    pub fn standard_52() -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
        Deck { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn draw_one(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Draw up to `n` cards; fewer are returned if the deck runs out.
    pub fn draw_n(&mut self, n: usize) -> Vec<Card> {
        let mut taken = Vec::with_capacity(n);
        for _ in 0..n {
            match self.cards.pop() {
                Some(card) => taken.push(card),
                None => break,
            }
        }
        taken
    }

    /// Discard the top card face down.
    pub fn burn(&mut self) -> Option<Card> {
        self.cards.pop()
    }
}

impl Default for Deck {
    fn default() -> Self {
        Deck::standard_52()
    }
}
