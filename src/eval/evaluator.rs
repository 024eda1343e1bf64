use crate::domain::card::{Card, Rank};
use crate::domain::hand::HandRank;

use super::hand_rank::HandCategory;
use super::lookup_tables::{detect_straight, mask_of};
use super::EvalError;

/// Best 5-card hand out of hole + board.
///
/// Hold'em gives 2 hole cards and 3–5 board cards; any 5–7 total works.
pub fn evaluate_best_hand(hole: &[Card], board: &[Card]) -> Result<HandRank, EvalError> {
    let mut all_cards = Vec::with_capacity(hole.len() + board.len());
    all_cards.extend_from_slice(hole);
    all_cards.extend_from_slice(board);

    if !(5..=7).contains(&all_cards.len()) {
        return Err(EvalError::CardCount(all_cards.len()));
    }
    for (i, c) in all_cards.iter().enumerate() {
        if all_cards[..i].contains(c) {
            return Err(EvalError::DuplicateCard(*c));
        }
    }

    Ok(best_of_all_5card_combinations(&all_cards))
}

/// Try every 5-card subset (at most C(7,5) = 21) and keep the strongest.
fn best_of_all_5card_combinations(cards: &[Card]) -> HandRank {
    let n = cards.len();
    let mut best = HandRank(0);

    for a in 0..n {
        for b in (a + 1)..n {
            for c in (b + 1)..n {
                for d in (c + 1)..n {
                    for e in (d + 1)..n {
                        let five = [cards[a], cards[b], cards[c], cards[d], cards[e]];
                        best = best.max(evaluate_5card_hand(&five));
                    }
                }
            }
        }
    }

    best
}

/// Rank exactly five cards.
pub fn evaluate_5card_hand(cards: &[Card; 5]) -> HandRank {
    let is_flush = cards.iter().all(|c| c.suit == cards[0].suit);
    let straight_high = detect_straight(mask_of(cards.iter().map(|c| c.rank)));

    // (count, rank) groups, biggest group first, then highest rank.
    let mut groups: Vec<(u8, Rank)> = Vec::with_capacity(5);
    for card in cards {
        match groups.iter_mut().find(|(_, r)| *r == card.rank) {
            Some(g) => g.0 += 1,
            None => groups.push((1, card.rank)),
        }
    }
    groups.sort_by(|a, b| b.cmp(a));

    let pattern: Vec<u8> = groups.iter().map(|g| g.0).collect();
    let ordered: Vec<Rank> = groups.iter().map(|g| g.1).collect();

    let category = match (is_flush, straight_high, pattern.as_slice()) {
        (true, Some(high), _) => {
            return HandRank::from_category_and_ranks(HandCategory::StraightFlush, &[high]);
        }
        (_, _, [4, 1]) => HandCategory::FourOfAKind,
        (_, _, [3, 2]) => HandCategory::FullHouse,
        (true, None, _) => HandCategory::Flush,
        (false, Some(high), _) => {
            return HandRank::from_category_and_ranks(HandCategory::Straight, &[high]);
        }
        (_, _, [3, 1, 1]) => HandCategory::ThreeOfAKind,
        (_, _, [2, 2, 1]) => HandCategory::TwoPair,
        (_, _, [2, 1, 1, 1]) => HandCategory::OnePair,
        _ => HandCategory::HighCard,
    };

    HandRank::from_category_and_ranks(category, &ordered)
}
