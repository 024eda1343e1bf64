//! Hand strength evaluation.
//!
//! Main entry points:
//!   `evaluate_best_hand(hole, board) -> Result<HandRank, EvalError>`
//!   `HandEvaluator::for_variant(variant)` for variant-aware callers.

use std::cmp::Ordering;

use thiserror::Error;

use crate::domain::card::Card;
use crate::domain::hand::HandRank;
use crate::domain::settings::Variant;

pub mod evaluator;
pub mod hand_rank;
pub mod lookup_tables;

pub use evaluator::{evaluate_5card_hand, evaluate_best_hand};
pub use hand_rank::{describe_hand, hand_category, HandCategory};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("need 5 to 7 cards to evaluate, got {0}")]
    CardCount(usize),

    #[error("card {0} appears twice")]
    DuplicateCard(Card),

    #[error("no evaluator for variant {0}")]
    UnsupportedVariant(Variant),
}

/// Variant-specific evaluator. Only hold'em exists: Omaha needs exactly two
/// hole cards in every combination and Hi-Lo needs a second low ranking, both
/// of which are separate algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandEvaluator {
    TexasHoldem,
}

impl HandEvaluator {
    pub fn for_variant(variant: Variant) -> Result<Self, EvalError> {
        match variant {
            Variant::TexasHoldem => Ok(HandEvaluator::TexasHoldem),
            other => Err(EvalError::UnsupportedVariant(other)),
        }
    }

    /// Hole cards dealt to each player.
    pub fn hole_cards(&self) -> usize {
        match self {
            HandEvaluator::TexasHoldem => 2,
        }
    }

    pub fn evaluate(&self, hole: &[Card], board: &[Card]) -> Result<HandRank, EvalError> {
        match self {
            HandEvaluator::TexasHoldem => evaluate_best_hand(hole, board),
        }
    }

    pub fn compare(&self, a: HandRank, b: HandRank) -> Ordering {
        a.cmp(&b)
    }
}
