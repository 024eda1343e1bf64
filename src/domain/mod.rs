//! Poker domain model: cards, chips, deck, players, table settings and state.

pub mod card;
pub mod chips;
pub mod deck;
pub mod hand;
pub mod player;
pub mod settings;
pub mod table;

/// Player id as issued by the account service; unique within a table.
pub type PlayerId = String;
pub type TableId = u64;
/// Seat index, equal to the player's index in `GameState::players`.
pub type SeatIndex = usize;

pub use card::*;
pub use chips::*;
pub use deck::*;
pub use hand::*;
pub use player::*;
pub use settings::*;
pub use table::*;
