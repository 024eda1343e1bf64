use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::hand::Phase;
use crate::domain::player::Player;
use crate::domain::SeatIndex;

/// State of the betting round on one street.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BettingRound {
    pub phase: Phase,
    /// Level every player still acting has to match.
    pub current_bet: Chips,
    /// Minimum raise increment: the big blind, or the last full raise.
    pub min_raise: Chips,
    /// Seat of the last full bet/raise.
    pub last_aggressor: Option<SeatIndex>,
    /// Seats that have acted since the last full bet/raise.
    pub acted: Vec<SeatIndex>,
    /// Table bet at which action reopens: the last full bet plus the
    /// minimum increment. Short all-ins that add up to it reopen as well.
    pub reopen_at: Chips,
}

impl BettingRound {
    pub fn new(phase: Phase, current_bet: Chips, min_raise: Chips) -> Self {
        Self {
            phase,
            current_bet,
            min_raise,
            last_aggressor: None,
            acted: Vec::new(),
            reopen_at: current_bet + min_raise,
        }
    }

    pub fn has_acted(&self, seat: SeatIndex) -> bool {
        self.acted.contains(&seat)
    }

    pub fn mark_acted(&mut self, seat: SeatIndex) {
        if !self.has_acted(seat) {
            self.acted.push(seat);
        }
    }

    /// A bet/raise of at least the minimum increment: reopens the action for
    /// everybody else.
    pub fn on_full_raise(&mut self, seat: SeatIndex, new_bet: Chips) {
        self.min_raise = new_bet - self.current_bet;
        self.current_bet = new_bet;
        self.reopen(seat);
    }

    /// An all-in above the current bet but short of a full raise: others must
    /// match the new level, but players who already acted may not re-raise
    /// until the short raises together reach a full one.
    pub fn on_short_raise(&mut self, seat: SeatIndex, new_bet: Chips) {
        self.current_bet = new_bet;
        if new_bet >= self.reopen_at {
            self.reopen(seat);
        } else {
            self.mark_acted(seat);
        }
    }

    fn reopen(&mut self, seat: SeatIndex) {
        self.reopen_at = self.current_bet + self.min_raise;
        self.last_aggressor = Some(seat);
        self.acted.clear();
        self.acted.push(seat);
    }

    pub fn to_call(&self, player: &Player) -> Chips {
        self.current_bet.saturating_sub(player.current_bet)
    }

    /// Does this seat still owe a decision on this street?
    pub fn needs_action(&self, seat: SeatIndex, player: &Player) -> bool {
        player.can_act() && (!self.has_acted(seat) || player.current_bet < self.current_bet)
    }

    /// The street is over when nobody owes a decision.
    ///
    /// With one player (or none) left able to bet there is nobody to bet
    /// against: the round ends as soon as that player has matched, even if
    /// they never acted. A lone player still facing an all-in has to call or
    /// fold first.
    pub fn is_complete(&self, players: &[Player]) -> bool {
        let mut actors = players.iter().enumerate().filter(|(_, p)| p.can_act());
        match (actors.next(), actors.next()) {
            (None, _) => true,
            (Some((_, lone)), None) => lone.current_bet >= self.current_bet,
            _ => players
                .iter()
                .enumerate()
                .all(|(seat, p)| !self.needs_action(seat, p)),
        }
    }

    /// First seat clockwise after `after` that still owes a decision, or
    /// `None` when the street is complete.
    pub fn next_actor(&self, players: &[Player], after: SeatIndex) -> Option<SeatIndex> {
        if players.is_empty() || self.is_complete(players) {
            return None;
        }
        let n = players.len();
        (1..=n)
            .map(|k| (after + k) % n)
            .find(|&seat| self.needs_action(seat, &players[seat]))
    }
}
