use crate::domain::chips::Chips;
use crate::domain::PlayerId;

use thiserror::Error;

/// Errors returned by `GameEngine`. Every one of them is raised before the
/// state is touched, so a failed call leaves the table exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("table is full ({max_players} seats)")]
    GameFull { max_players: usize },

    #[error("player {0} is already seated")]
    DuplicatePlayer(PlayerId),

    #[error("game has already started")]
    GameAlreadyStarted,

    #[error("players can only leave while the table is waiting")]
    GameActive,

    #[error("need at least 2 players with chips, have {0}")]
    NotEnoughPlayers(usize),

    #[error("game has not been started yet")]
    GameNotStarted,

    #[error("player {0} is not at this table")]
    PlayerNotFound(PlayerId),

    #[error("it is not {player}'s turn")]
    NotYourTurn { player: PlayerId, expected: Option<PlayerId> },

    #[error("invalid action: {0}")]
    InvalidAction(#[from] IllegalAction),

    #[error("no betting round is running")]
    NoActiveHand,

    #[error("a hand is still being played")]
    HandInProgress,

    #[error("rebuy not allowed: {0}")]
    RebuyNotAllowed(&'static str),

    #[error("game has ended")]
    GameEnded,

    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

/// Why a betting action was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IllegalAction {
    #[error("cannot check facing a bet of {to_call}")]
    CannotCheck { to_call: Chips },

    #[error("nothing to call")]
    NothingToCall,

    #[error("raise needs an amount")]
    MissingAmount,

    #[error("raise to {amount} does not exceed the current bet {current_bet}")]
    RaiseNotAboveBet { amount: Chips, current_bet: Chips },

    #[error("raise to {amount} is below the minimum of {minimum}")]
    RaiseTooSmall { amount: Chips, minimum: Chips },

    #[error("no opponent is left to call a raise")]
    NoOpponentCanAct,

    #[error("betting was not reopened by the last all-in; call or fold")]
    BettingNotReopened,
}

impl EngineError {
    /// Stable error code for the transport and its clients.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::GameFull { .. } => "GameFullError",
            EngineError::DuplicatePlayer(_) => "DuplicatePlayerError",
            EngineError::GameAlreadyStarted => "GameAlreadyStartedError",
            EngineError::GameActive => "GameActiveError",
            EngineError::NotEnoughPlayers(_) => "NotEnoughPlayersError",
            EngineError::GameNotStarted => "GameNotStartedError",
            EngineError::PlayerNotFound(_) => "PlayerNotFoundError",
            EngineError::NotYourTurn { .. } => "NotYourTurnError",
            EngineError::InvalidAction(_) => "InvalidActionError",
            EngineError::NoActiveHand => "NoActiveHandError",
            EngineError::HandInProgress => "HandInProgressError",
            EngineError::RebuyNotAllowed(_) => "RebuyNotAllowedError",
            EngineError::GameEnded => "GameEndedError",
            EngineError::InvalidSettings(_) => "InvalidSettingsError",
        }
    }
}
