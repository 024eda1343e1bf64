use crate::domain::card::Rank;

/// Rank bit mask: bit 0 = deuce ... bit 12 = ace.
pub type RankMask = u16;

/// Masks of all ten straights, indexed by the straight's top card minus five:
/// index 0 is the wheel (A2345), index 9 is broadway (TJQKA).
pub const STRAIGHT_MASKS: [RankMask; 10] = build_straight_masks();

const fn build_straight_masks() -> [RankMask; 10] {
    let mut masks = [0; 10];
    // wheel: ace plays low
    masks[0] = 0b1_0000_0000_1111;
    let mut i = 1;
    while i < 10 {
        // straight with top card (i + 5) covers bits (i - 1)..=(i + 3)
        masks[i] = 0b1_1111 << (i - 1);
        i += 1;
    }
    masks
}

pub fn rank_to_bit(rank: Rank) -> RankMask {
    1 << (rank as u8 - 2)
}

pub fn mask_of(ranks: impl IntoIterator<Item = Rank>) -> RankMask {
    ranks.into_iter().fold(0, |m, r| m | rank_to_bit(r))
}

/// Top card of the best straight contained in `rank_mask`, if any.
/// The wheel reports `Rank::Five`.
pub fn detect_straight(rank_mask: RankMask) -> Option<Rank> {
    STRAIGHT_MASKS
        .iter()
        .enumerate()
        .rev()
        .find(|&(_, &sm)| rank_mask & sm == sm)
        .and_then(|(i, _)| Rank::from_value(i as u8 + 5))
}
