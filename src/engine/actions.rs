use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{Chips, PlayerId};

/// What a player wants to do.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ActionType {
    Fold,
    Check,
    Call,
    /// Bet or raise to a street total; opening bets are raises from zero.
    Raise,
    /// Put the whole stack in.
    AllIn,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionType::Fold => "fold",
            ActionType::Check => "check",
            ActionType::Call => "call",
            ActionType::Raise => "raise",
            ActionType::AllIn => "all-in",
        };
        f.write_str(s)
    }
}

impl FromStr for ActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fold" => Ok(ActionType::Fold),
            "check" => Ok(ActionType::Check),
            "call" => Ok(ActionType::Call),
            "raise" | "bet" => Ok(ActionType::Raise),
            "all-in" | "allin" | "all_in" => Ok(ActionType::AllIn),
            other => Err(format!("unknown action {other:?}")),
        }
    }
}

/// An action as delivered by the transport.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerAction {
    pub player_id: PlayerId,
    pub action: ActionType,
    /// Bet-to level for `raise`; ignored otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Chips>,
}

impl PlayerAction {
    pub fn new(player_id: impl Into<PlayerId>, action: ActionType) -> Self {
        Self {
            player_id: player_id.into(),
            action,
            amount: None,
        }
    }

    pub fn raise_to(player_id: impl Into<PlayerId>, amount: u64) -> Self {
        Self {
            player_id: player_id.into(),
            action: ActionType::Raise,
            amount: Some(Chips(amount)),
        }
    }
}
