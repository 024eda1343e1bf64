use core::fmt;

use serde::{Serialize, Serializer};

use crate::domain::player::Player;
use crate::domain::SeatIndex;

/// First seat clockwise strictly after `start` matching `pred`. `start`
/// itself is checked last.
pub fn next_seat_where(
    players: &[Player],
    start: SeatIndex,
    pred: impl Fn(&Player) -> bool,
) -> Option<SeatIndex> {
    let n = players.len();
    (1..=n).map(|k| (start + k) % n).find(|&seat| pred(&players[seat]))
}

/// Seats matching `pred` in clockwise order, beginning right after `start`.
pub fn seats_clockwise_after(
    players: &[Player],
    start: SeatIndex,
    pred: impl Fn(&Player) -> bool,
) -> Vec<SeatIndex> {
    let n = players.len();
    (1..=n)
        .map(|k| (start + k) % n)
        .filter(|&seat| pred(&players[seat]))
        .collect()
}

/// Button for the next hand: seat 0 (or the first seat with chips) on the
/// first hand, then the next seat clockwise that still has chips.
pub fn next_dealer(players: &[Player], current: Option<SeatIndex>) -> Option<SeatIndex> {
    let has_chips = |p: &Player| !p.stack.is_zero();
    match current {
        Some(button) => next_seat_where(players, button, has_chips),
        None => players.iter().position(has_chips),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlindSeats {
    pub dealer: SeatIndex,
    pub small_blind: SeatIndex,
    pub big_blind: SeatIndex,
}

/// Blind seats for a hand with the button on `dealer`, counting only seats
/// matching `dealt`. Heads-up the button posts the small blind.
pub fn blind_seats(
    players: &[Player],
    dealer: SeatIndex,
    dealt: impl Fn(&Player) -> bool + Copy,
) -> Option<BlindSeats> {
    let count = players.iter().filter(|p| dealt(p)).count();
    if count < 2 {
        return None;
    }

    let small_blind = if count == 2 {
        dealer
    } else {
        next_seat_where(players, dealer, dealt)?
    };
    let big_blind = next_seat_where(players, small_blind, dealt)?;

    Some(BlindSeats {
        dealer,
        small_blind,
        big_blind,
    })
}

/// Table position name relative to the button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PositionLabel {
    Button,
    SmallBlind,
    BigBlind,
    UnderTheGun,
    /// UTG+n for the early-middle seats of full rings.
    UnderTheGunPlus(u8),
    Lojack,
    Hijack,
    Cutoff,
}

/// Serialized as the short table name ("BTN", "UTG+1", ...).
impl Serialize for PositionLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl fmt::Display for PositionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionLabel::Button => f.write_str("BTN"),
            PositionLabel::SmallBlind => f.write_str("SB"),
            PositionLabel::BigBlind => f.write_str("BB"),
            PositionLabel::UnderTheGun => f.write_str("UTG"),
            PositionLabel::UnderTheGunPlus(n) => write!(f, "UTG+{n}"),
            PositionLabel::Lojack => f.write_str("LJ"),
            PositionLabel::Hijack => f.write_str("HJ"),
            PositionLabel::Cutoff => f.write_str("CO"),
        }
    }
}

/// Label for the seat `offset` places clockwise of the button at a table of
/// `seat_count` dealt-in players.
///
/// Heads-up the button is also the small blind and is labelled BTN. Seats
/// between the big blind and the button are UTG first, then named back from
/// the button (CO, HJ, LJ); any left over in a full ring become UTG+n.
pub fn position_label(seat_count: usize, offset: usize) -> PositionLabel {
    let offset = if seat_count == 0 { 0 } else { offset % seat_count };
    if seat_count <= 2 {
        return if offset == 0 {
            PositionLabel::Button
        } else {
            PositionLabel::BigBlind
        };
    }

    match offset {
        0 => PositionLabel::Button,
        1 => PositionLabel::SmallBlind,
        2 => PositionLabel::BigBlind,
        _ => {
            let middle = seat_count - 3;
            let k = offset - 3;
            let from_button = middle - 1 - k;
            if k == 0 {
                return PositionLabel::UnderTheGun;
            }
            match from_button {
                0 => PositionLabel::Cutoff,
                1 => PositionLabel::Hijack,
                2 => PositionLabel::Lojack,
                _ => PositionLabel::UnderTheGunPlus(k as u8),
            }
        }
    }
}

/// Labels for every dealt-in seat of a table with the button on `dealer`.
pub fn table_labels(players: &[Player], dealer: SeatIndex) -> Vec<(SeatIndex, PositionLabel)> {
    let mut seats = seats_clockwise_after(players, dealer, |p| p.is_active);
    // Clockwise-after puts the button last; rotate it to the front.
    if seats.last() == Some(&dealer) {
        seats.rotate_right(1);
    }
    let count = seats.len();
    seats
        .into_iter()
        .enumerate()
        .map(|(offset, seat)| (seat, position_label(count, offset)))
        .collect()
}
