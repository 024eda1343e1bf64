//! Poker engine: betting rounds, street transitions, side pots, showdown.
//!
//! Top-level object: `GameEngine`
//! Main operations:
//!   - `add_player` / `remove_player` – seat management while waiting
//!   - `start_game` / `next_hand` – deal a new hand
//!   - `process_player_action` – apply a player's decision
//!   - `end_game` – close the table

pub mod actions;
pub mod betting;
pub mod errors;
pub mod game_loop;
pub mod hand_history;
pub mod positions;
pub mod side_pots;
pub mod table_manager;
pub mod validation;

pub use actions::{ActionType, PlayerAction};
pub use betting::BettingRound;
pub use errors::{EngineError, IllegalAction};
pub use game_loop::GameEngine;
pub use hand_history::{GameAction, HandEndReason, HandResult, PotAward, ShowdownHand, WinnerShare};
pub use positions::{position_label, PositionLabel};
pub use side_pots::{compute_side_pots, Contribution, SidePot};
pub use table_manager::{RegistryError, SharedTable, TableRegistry};
pub use validation::{validate_action, ValidatedAction};

/// Shuffling source for the deck. Production uses `infra::SystemRng`; tests
/// plug in seeded or scripted sources.
pub trait RandomSource {
    fn shuffle<T>(&mut self, slice: &mut [T]);
}
