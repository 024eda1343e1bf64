use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::chips::Chips;
use crate::domain::hand::Phase;
use crate::domain::player::Player;
use crate::domain::settings::{GameSettings, Variant};
use crate::domain::{PlayerId, SeatIndex, TableId};
use crate::engine::hand_history::{GameAction, HandResult};

/// Authoritative state of one table.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameState {
    pub id: TableId,
    /// Short join code the transport hands out to players.
    pub code: String,
    pub variant: Variant,
    pub phase: Phase,

    /// Seated players; index == seat.
    pub players: Vec<Player>,

    /// Board cards: 0, 3, 4 or 5.
    pub community_cards: Vec<Card>,

    /// Every chip committed this hand and not yet awarded, current street included.
    pub pot: Chips,

    /// Bet level to match on the current street.
    pub current_bet: Chips,

    /// Smallest legal raise increment on the current street.
    pub min_raise: Chips,

    pub dealer_position: Option<SeatIndex>,
    pub small_blind_position: Option<SeatIndex>,
    pub big_blind_position: Option<SeatIndex>,

    /// Seat whose turn it is; `None` when nobody is to act.
    pub active_player_index: Option<SeatIndex>,

    /// Hands started at this table, 1-based once the first hand is dealt.
    pub hand_number: u64,

    pub settings: GameSettings,

    /// Append-only action log across all hands at this table.
    pub history: Vec<GameAction>,

    pub last_hand_result: Option<HandResult>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub hand_started_at: Option<DateTime<Utc>>,
    /// Set once the table is closed by `end_game`.
    pub ended_at: Option<DateTime<Utc>>,
}

impl GameState {
    pub fn new(id: TableId, code: String, settings: GameSettings) -> Self {
        let now = Utc::now();
        Self {
            id,
            code,
            variant: settings.variant,
            phase: Phase::Waiting,
            players: Vec::new(),
            community_cards: Vec::new(),
            pot: Chips::ZERO,
            current_bet: Chips::ZERO,
            min_raise: settings.big_blind,
            dealer_position: None,
            small_blind_position: None,
            big_blind_position: None,
            active_player_index: None,
            hand_number: 0,
            settings,
            history: Vec::new(),
            last_hand_result: None,
            created_at: now,
            updated_at: now,
            hand_started_at: None,
            ended_at: None,
        }
    }

    pub fn seated_count(&self) -> usize {
        self.players.len()
    }

    pub fn seat_of(&self, player_id: &str) -> Option<SeatIndex> {
        self.players.iter().position(|p| p.id == player_id)
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    /// The player whose turn it is.
    pub fn active_player(&self) -> Option<&Player> {
        self.active_player_index.and_then(|i| self.players.get(i))
    }

    pub fn active_player_id(&self) -> Option<&PlayerId> {
        self.active_player().map(|p| &p.id)
    }

    /// Chips on the table: pot plus every stack. Constant for the lifetime of
    /// a hand.
    pub fn total_chips(&self) -> Chips {
        self.pot + self.players.iter().map(|p| p.stack).sum::<Chips>()
    }

    /// A hand is running (cards dealt, not yet settled).
    pub fn hand_in_progress(&self) -> bool {
        self.phase.is_betting() || self.phase == Phase::Showdown
    }

    pub fn is_ended(&self) -> bool {
        self.ended_at.is_some()
    }

    /// Actions of the hand currently running or, between hands, of the last
    /// one.
    pub fn current_hand_actions(&self) -> impl Iterator<Item = &GameAction> {
        let hand = self.hand_number;
        self.history.iter().filter(move |a| a.hand_number == hand)
    }
}
