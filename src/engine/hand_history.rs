use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::{HandRank, Phase};
use crate::domain::{PlayerId, SeatIndex};
use crate::engine::actions::ActionType;
use crate::eval::HandCategory;

/// One accepted player action, as appended to `GameState::history`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameAction {
    pub player_id: PlayerId,
    pub action: ActionType,
    /// Chips the action moved into the pot; `None` for fold and check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Chips>,
    pub phase: Phase,
    /// Player's street total after the action.
    pub bet_to: Chips,
    /// Table bet after the action.
    pub current_bet_after: Chips,
    pub hand_number: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum HandEndReason {
    /// Everybody else folded.
    Fold,
    Showdown,
}

/// Total a player took from the pot this hand.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WinnerShare {
    pub player_id: PlayerId,
    pub amount: Chips,
}

/// How one pot tier was settled.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PotAward {
    pub amount: Chips,
    pub eligible: Vec<PlayerId>,
    pub winners: Vec<WinnerShare>,
}

/// A hand shown down.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShowdownHand {
    pub player_id: PlayerId,
    pub cards: Vec<Card>,
    pub category: HandCategory,
    pub rank: HandRank,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeatSnapshot {
    pub seat: SeatIndex,
    pub player_id: PlayerId,
    pub name: String,
    pub stack: Chips,
}

/// Seating and button at the moment the hand was dealt.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableSnapshot {
    pub seats: Vec<SeatSnapshot>,
    pub dealer: SeatIndex,
    pub small_blind: SeatIndex,
    pub big_blind: SeatIndex,
}

/// Everything about a finished hand, for display and for the history store.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HandResult {
    pub hand_number: u64,
    pub reason: HandEndReason,
    /// Aggregated per player, in the order their first award was made.
    pub winners: Vec<WinnerShare>,
    /// Total pot that was settled.
    pub pot: Chips,
    pub community_cards: Vec<Card>,
    pub actions: Vec<GameAction>,
    pub pots: Vec<PotAward>,
    /// Empty when the hand ended on a fold.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub showdown: Vec<ShowdownHand>,
    pub stacks_start: BTreeMap<PlayerId, Chips>,
    pub stacks_end: BTreeMap<PlayerId, Chips>,
    pub table: TableSnapshot,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

impl HandResult {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Chips won by `player_id` this hand (before subtracting what they put in).
    pub fn amount_won(&self, player_id: &str) -> Chips {
        self.winners
            .iter()
            .filter(|w| w.player_id == player_id)
            .map(|w| w.amount)
            .sum()
    }

    /// Stack change over the hand for every player dealt in.
    pub fn net_by_player(&self) -> BTreeMap<PlayerId, i64> {
        self.stacks_start
            .iter()
            .map(|(id, start)| {
                let end = self.stacks_end.get(id).copied().unwrap_or(Chips::ZERO);
                (id.clone(), end.0 as i64 - start.0 as i64)
            })
            .collect()
    }
}

/// Add `amount` to `player_id`'s running total, keeping first-award order.
pub(crate) fn credit(winners: &mut Vec<WinnerShare>, player_id: &str, amount: Chips) {
    match winners.iter_mut().find(|w| w.player_id == player_id) {
        Some(w) => w.amount += amount,
        None => winners.push(WinnerShare {
            player_id: player_id.to_string(),
            amount,
        }),
    }
}
