use serde::{Deserialize, Serialize};

use crate::domain::{chips::Chips, SeatIndex};

/// What one seat put into the hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Contribution {
    pub seat: SeatIndex,
    /// Everything the seat committed this hand, antes and every street.
    pub amount: Chips,
    pub folded: bool,
}

/// One pot tier: every contributor put in at least `level`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SidePot {
    pub amount: Chips,
    /// Cumulative contribution threshold that defines this tier.
    pub level: Chips,
    /// Seats that paid into this tier, folded ones included.
    pub contributors: Vec<SeatIndex>,
    /// Contributors still holding cards.
    pub eligible_seats: Vec<SeatIndex>,
}

/// Split the hand's contributions into tiers, smallest level first.
///
/// Tier k covers contributions in `(level[k-1], level[k]]`; its size is that
/// slice times the number of seats that reached `level[k]`. The tiers sum to
/// exactly the total contributed.
pub fn compute_side_pots(contributions: &[Contribution]) -> Vec<SidePot> {
    let mut levels: Vec<Chips> = contributions
        .iter()
        .map(|c| c.amount)
        .filter(|a| !a.is_zero())
        .collect();
    levels.sort();
    levels.dedup();

    let mut pots = Vec::with_capacity(levels.len());
    let mut prev_level = Chips::ZERO;

    for level in levels {
        let reached: Vec<&Contribution> =
            contributions.iter().filter(|c| c.amount >= level).collect();

        let slice = level - prev_level;
        pots.push(SidePot {
            amount: Chips(slice.0 * reached.len() as u64),
            level,
            contributors: reached.iter().map(|c| c.seat).collect(),
            eligible_seats: reached.iter().filter(|c| !c.folded).map(|c| c.seat).collect(),
        });

        prev_level = level;
    }

    pots
}

/// Split `amount` evenly across `winners`. Odd chips go one at a time to the
/// first winners in the given order.
pub fn split_pot(amount: Chips, winners: &[SeatIndex]) -> Vec<(SeatIndex, Chips)> {
    if winners.is_empty() {
        return Vec::new();
    }
    let n = winners.len() as u64;
    let share = amount.0 / n;
    let remainder = (amount.0 % n) as usize;

    winners
        .iter()
        .enumerate()
        .map(|(i, &seat)| {
            let odd = u64::from(i < remainder);
            (seat, Chips(share + odd))
        })
        .collect()
}
