use core::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::card::Rank;
use crate::domain::hand::HandRank;

/// Hand category, weakest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl HandCategory {
    const ALL: [HandCategory; 9] = [
        HandCategory::HighCard,
        HandCategory::OnePair,
        HandCategory::TwoPair,
        HandCategory::ThreeOfAKind,
        HandCategory::Straight,
        HandCategory::Flush,
        HandCategory::FullHouse,
        HandCategory::FourOfAKind,
        HandCategory::StraightFlush,
    ];
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HandCategory::HighCard => "High card",
            HandCategory::OnePair => "One pair",
            HandCategory::TwoPair => "Two pair",
            HandCategory::ThreeOfAKind => "Three of a kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full house",
            HandCategory::FourOfAKind => "Four of a kind",
            HandCategory::StraightFlush => "Straight flush",
        };
        f.write_str(s)
    }
}

impl HandRank {
    /// Pack a category and up to five tie-break ranks (most significant
    /// first) into one comparable integer:
    ///
    ///   [category:4][r0:4][r1:4][r2:4][r3:4][r4:4]
    ///
    /// Unused tie-break slots are zero, so they never influence comparison.
    pub fn from_category_and_ranks(category: HandCategory, ranks: &[Rank]) -> Self {
        debug_assert!(ranks.len() <= 5);
        let mut value = category as u32;
        for slot in 0..5 {
            let nibble = ranks.get(slot).map_or(0, |r| *r as u32);
            value = (value << 4) | nibble;
        }
        HandRank(value)
    }

    pub fn category(&self) -> HandCategory {
        let id = ((self.0 >> 20) & 0x0F) as usize;
        HandCategory::ALL.get(id).copied().unwrap_or(HandCategory::HighCard)
    }

    /// Tie-break ranks, most significant first.
    pub fn ranks(&self) -> Vec<Rank> {
        (0..5)
            .rev()
            .filter_map(|slot| Rank::from_value(((self.0 >> (slot * 4)) & 0x0F) as u8))
            .collect()
    }
}

pub fn hand_category(rank: HandRank) -> HandCategory {
    rank.category()
}

pub fn describe_hand(rank: HandRank) -> String {
    rank.category().to_string()
}
