use serde::Serialize;

use crate::domain::chips::Chips;
use crate::domain::hand::Phase;
use crate::domain::settings::Variant;
use crate::domain::table::GameState;
use crate::domain::{PlayerId, SeatIndex, TableId};
use crate::engine::PositionLabel;

/// One lobby row.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct TableSummaryDto {
    pub code: String,
    pub table_id: TableId,
    pub variant: Variant,
    pub phase: Phase,
    pub seated: usize,
    pub max_players: usize,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub hand_number: u64,
}

impl TableSummaryDto {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            code: state.code.clone(),
            table_id: state.id,
            variant: state.variant,
            phase: state.phase,
            seated: state.seated_count(),
            max_players: state.settings.max_players,
            small_blind: state.settings.small_blind,
            big_blind: state.settings.big_blind,
            hand_number: state.hand_number,
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PositionDto {
    pub player_id: PlayerId,
    pub seat: SeatIndex,
    pub label: PositionLabel,
}
