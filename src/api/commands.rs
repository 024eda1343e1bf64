use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::hand::Phase;
use crate::domain::settings::GameSettings;
use crate::domain::{PlayerId, TableId};
use crate::engine::hand_history::HandResult;
use crate::engine::table_manager::lock_table;
use crate::engine::{ActionType, EngineError, GameEngine, RandomSource, TableRegistry};

use super::errors::ApiError;

/// Top-level command, as received from the transport.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Open a new table.
    CreateTable {
        #[serde(default)]
        settings: GameSettings,
    },

    /// Close a table (voiding any hand in progress) and drop it.
    CloseTable { code: String },

    /// Operation on an existing table.
    Table { code: String, command: TableCommand },
}

/// Commands addressed to one table.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TableCommand {
    AddPlayer {
        player_id: PlayerId,
        name: String,
    },
    RemovePlayer {
        player_id: PlayerId,
    },
    StartGame {
        requester_id: PlayerId,
    },
    PlayerAction {
        player_id: PlayerId,
        action: ActionType,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        amount: Option<Chips>,
    },
    NextHand {
        requester_id: PlayerId,
    },
    Rebuy {
        player_id: PlayerId,
        amount: Chips,
    },
    EndGame,
}

/// What the transport should broadcast after a command succeeded.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandResponse {
    TableCreated {
        code: String,
        table_id: TableId,
    },
    TableClosed {
        code: String,
    },
    /// Table state changed; clients should refresh their view.
    Updated {
        phase: Phase,
        hand_number: u64,
        active_player_id: Option<PlayerId>,
    },
    /// The command finished a hand.
    HandFinished(Box<HandResult>),
}

pub fn parse_command(json: &str) -> Result<Command, ApiError> {
    Ok(serde_json::from_str(json)?)
}

/// Run a top-level command against the registry.
pub fn execute(registry: &TableRegistry, command: Command) -> Result<CommandResponse, ApiError> {
    match command {
        Command::CreateTable { settings } => {
            let (code, table) = registry.create_table(settings)?;
            let table_id = lock_table(&table, &code)?.get_state().id;
            Ok(CommandResponse::TableCreated { code, table_id })
        }
        Command::CloseTable { code } => {
            let table = registry.get(&code)?;
            {
                let mut engine = lock_table(&table, &code)?;
                match engine.end_game() {
                    Ok(_) | Err(EngineError::GameEnded) => {}
                    Err(e) => return Err(e.into()),
                }
            }
            registry.remove(&code)?;
            Ok(CommandResponse::TableClosed { code })
        }
        Command::Table { code, command } => {
            Ok(registry.with_table(&code, |engine| execute_table_command(engine, command))?)
        }
    }
}

/// Apply one table command to an engine.
pub fn execute_table_command<R: RandomSource>(
    engine: &mut GameEngine<R>,
    command: TableCommand,
) -> Result<CommandResponse, EngineError> {
    let settled_before = settled_hand(engine);

    match command {
        TableCommand::AddPlayer { player_id, name } => engine.add_player(player_id, name),
        TableCommand::RemovePlayer { player_id } => engine.remove_player(&player_id),
        TableCommand::StartGame { requester_id } => engine.start_game(&requester_id),
        TableCommand::PlayerAction {
            player_id,
            action,
            amount,
        } => engine.process_player_action(&player_id, action, amount),
        TableCommand::NextHand { requester_id } => engine.next_hand(&requester_id),
        TableCommand::Rebuy { player_id, amount } => engine.rebuy(&player_id, amount),
        TableCommand::EndGame => engine.end_game(),
    }?;

    let state = engine.get_state();
    let settled_now = settled_hand(engine);
    if settled_now.is_some() && settled_now != settled_before {
        if let Some(result) = &state.last_hand_result {
            return Ok(CommandResponse::HandFinished(Box::new(result.clone())));
        }
    }

    Ok(CommandResponse::Updated {
        phase: state.phase,
        hand_number: state.hand_number,
        active_player_id: state.active_player_id().cloned(),
    })
}

/// Number of the hand that is currently settled and on display, if any.
fn settled_hand<R: RandomSource>(engine: &GameEngine<R>) -> Option<u64> {
    let state = engine.get_state();
    match (&state.last_hand_result, state.phase) {
        (Some(result), Phase::Finished) if result.hand_number == state.hand_number => {
            Some(result.hand_number)
        }
        _ => None,
    }
}
