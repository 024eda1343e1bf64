use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::table::GameState;
use crate::domain::PlayerId;
use crate::engine::hand_history::HandResult;
use crate::engine::table_manager::lock_table;
use crate::engine::{ActionType, GameEngine, TableRegistry};
use crate::infra::SystemRng;

use super::dto::{PositionDto, TableSummaryDto};
use super::errors::ApiError;

/// Read-only requests.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Query {
    /// Lobby listing.
    ListTables,

    /// Full, unredacted state. Server-side use only.
    GetState { code: String },

    /// State as one player may see it.
    GetStateForPlayer { code: String, player_id: PlayerId },

    GetLastHandResult { code: String },

    GetPositions { code: String },

    /// What the player to act may do.
    GetLegalActions { code: String },
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum QueryResponse {
    Tables(Vec<TableSummaryDto>),
    State(Box<GameState>),
    HandResult(Option<Box<HandResult>>),
    Positions(Vec<PositionDto>),
    LegalActions {
        player_id: Option<PlayerId>,
        actions: Vec<ActionType>,
        min_raise_to: Option<Chips>,
    },
}

pub fn answer(registry: &TableRegistry, query: Query) -> Result<QueryResponse, ApiError> {
    match query {
        Query::ListTables => list_tables(registry),
        Query::GetState { code } => with_engine(registry, &code, |engine| {
            QueryResponse::State(Box::new(engine.get_state().clone()))
        }),
        Query::GetStateForPlayer { code, player_id } => with_engine(registry, &code, |engine| {
            QueryResponse::State(Box::new(engine.get_state_for_player(&player_id)))
        }),
        Query::GetLastHandResult { code } => with_engine(registry, &code, |engine| {
            QueryResponse::HandResult(engine.get_state().last_hand_result.clone().map(Box::new))
        }),
        Query::GetPositions { code } => with_engine(registry, &code, |engine| {
            let state = engine.get_state();
            QueryResponse::Positions(
                engine
                    .position_labels()
                    .into_iter()
                    .filter_map(|(player_id, label)| {
                        let seat = state.seat_of(&player_id)?;
                        Some(PositionDto {
                            player_id,
                            seat,
                            label,
                        })
                    })
                    .collect(),
            )
        }),
        Query::GetLegalActions { code } => with_engine(registry, &code, |engine| {
            QueryResponse::LegalActions {
                player_id: engine.get_state().active_player_id().cloned(),
                actions: engine.legal_actions(),
                min_raise_to: engine.min_raise_to(),
            }
        }),
    }
}

fn with_engine(
    registry: &TableRegistry,
    code: &str,
    f: impl FnOnce(&GameEngine<SystemRng>) -> QueryResponse,
) -> Result<QueryResponse, ApiError> {
    let table = registry.get(code)?;
    let engine = lock_table(&table, code)?;
    Ok(f(&engine))
}

fn list_tables(registry: &TableRegistry) -> Result<QueryResponse, ApiError> {
    let mut tables = Vec::new();
    for code in registry.codes() {
        // Tables closed since the listing started are skipped.
        if let Ok(table) = registry.get(&code) {
            tables.push(TableSummaryDto::from_state(
                lock_table(&table, &code)?.get_state(),
            ));
        }
    }
    tables.sort_by_key(|t| t.table_id);
    Ok(QueryResponse::Tables(tables))
}
