//! Plays random hands on several tables at once through the command API.
//!
//! Usage: poker_table_sim [settings.json] [tables] [hands-per-table]

use std::env;
use std::fs;
use std::process::ExitCode;
use std::thread;

use log::{error, info};
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};

use poker_table::api::{execute, Command, CommandResponse, TableCommand};
use poker_table::engine::table_manager::lock_table;
use poker_table::{ActionType, Chips, GameSettings, HandResult, TableRegistry};

const DEFAULT_TABLES: usize = 4;
const DEFAULT_HANDS: usize = 200;
const PLAYERS_PER_TABLE: usize = 6;

#[derive(Debug, Default)]
struct TableStats {
    hands: usize,
    showdowns: usize,
    biggest_pot: Chips,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let settings = match args.first() {
        Some(path) => match fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|s| GameSettings::from_json_str(&s).map_err(|e| e.to_string()))
        {
            Ok(settings) => settings,
            Err(e) => {
                error!("cannot load settings from {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => GameSettings::default(),
    };
    let tables = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_TABLES);
    let hands = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_HANDS);

    let registry = TableRegistry::new();
    let mut codes = Vec::with_capacity(tables);
    for _ in 0..tables {
        match execute(&registry, Command::CreateTable { settings: settings.clone() }) {
            Ok(CommandResponse::TableCreated { code, .. }) => codes.push(code),
            Ok(other) => error!("unexpected response {other:?}"),
            Err(e) => {
                error!("cannot create table: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    let players = PLAYERS_PER_TABLE.min(settings.max_players);
    let results: Vec<(String, Result<TableStats, String>)> = thread::scope(|scope| {
        let handles: Vec<_> = codes
            .iter()
            .map(|code| {
                let registry = &registry;
                scope.spawn(move || (code.clone(), run_table(registry, code, players, hands)))
            })
            .collect();
        handles
            .into_iter()
            .filter_map(|h| h.join().ok())
            .collect()
    });

    let mut failed = false;
    for (code, result) in results {
        match result {
            Ok(stats) => info!(
                "table {code}: {} hands, {} showdowns, biggest pot {}",
                stats.hands, stats.showdowns, stats.biggest_pot
            ),
            Err(e) => {
                error!("table {code}: {e}");
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run_table(
    registry: &TableRegistry,
    code: &str,
    players: usize,
    hands: usize,
) -> Result<TableStats, String> {
    let send = |command: TableCommand| {
        execute(
            registry,
            Command::Table {
                code: code.to_string(),
                command,
            },
        )
        .map_err(|e| e.to_string())
    };

    for i in 0..players {
        send(TableCommand::AddPlayer {
            player_id: format!("p{i}"),
            name: format!("Player {i}"),
        })?;
    }

    let table = registry.get(code).map_err(|e| e.to_string())?;
    let mut total = lock_table(&table, code)
        .map_err(|e| e.to_string())?
        .get_state()
        .total_chips();

    let mut stats = TableStats::default();
    let mut response = send(TableCommand::StartGame {
        requester_id: "p0".to_string(),
    })?;

    while stats.hands < hands {
        if let CommandResponse::HandFinished(result) = &response {
            record(&mut stats, result);
            if stats.hands == hands {
                break;
            }
            total += rebuy_busted(registry, code, &send)?;
            response = send(TableCommand::NextHand {
                requester_id: "p0".to_string(),
            })?;
            continue;
        }

        let (player_id, action, amount) = {
            let engine = lock_table(&table, code).map_err(|e| e.to_string())?;
            let state = engine.get_state();
            if state.total_chips() != total {
                return Err(format!("chips leaked: {} != {}", state.total_chips(), total));
            }
            let Some(player_id) = state.active_player_id().cloned() else {
                return Err(format!("no player to act in {:?}", state.phase));
            };
            let (action, amount) = pick_action(&engine.legal_actions(), engine.min_raise_to());
            (player_id, action, amount)
        };

        response = send(TableCommand::PlayerAction {
            player_id,
            action,
            amount,
        })?;
    }

    send(TableCommand::EndGame)?;
    Ok(stats)
}

fn record(stats: &mut TableStats, result: &HandResult) {
    stats.hands += 1;
    if !result.showdown.is_empty() {
        stats.showdowns += 1;
    }
    stats.biggest_pot = stats.biggest_pot.max(result.pot);
}

/// Top up anyone who busted so the table keeps going. Returns the chips
/// added to the table.
fn rebuy_busted(
    registry: &TableRegistry,
    code: &str,
    send: &impl Fn(TableCommand) -> Result<CommandResponse, String>,
) -> Result<Chips, String> {
    let (busted, stack) = registry
        .with_table(code, |engine| {
            let state = engine.get_state();
            let busted: Vec<String> = state
                .players
                .iter()
                .filter(|p| p.stack.is_zero())
                .map(|p| p.id.clone())
                .collect();
            Ok((busted, state.settings.starting_stack))
        })
        .map_err(|e| e.to_string())?;

    let mut added = Chips::ZERO;
    for player_id in busted {
        send(TableCommand::Rebuy {
            player_id,
            amount: stack,
        })?;
        added += stack;
    }
    Ok(added)
}

/// Mostly passive play with the occasional raise or shove.
fn pick_action(legal: &[ActionType], min_raise_to: Option<Chips>) -> (ActionType, Option<Chips>) {
    let mut rng = thread_rng();
    let roll: u8 = rng.gen_range(0..100);

    let wanted = match roll {
        0..=9 => ActionType::Fold,
        10..=24 => ActionType::Raise,
        25..=27 => ActionType::AllIn,
        _ => ActionType::Call,
    };

    let action = if legal.contains(&wanted) {
        wanted
    } else if legal.contains(&ActionType::Check) {
        ActionType::Check
    } else if legal.contains(&ActionType::Call) {
        ActionType::Call
    } else {
        legal.choose(&mut rng).copied().unwrap_or(ActionType::Fold)
    };

    let amount = match action {
        ActionType::Raise => min_raise_to.map(|min| Chips(min.0 + rng.gen_range(0..=min.0))),
        _ => None,
    };
    (action, amount)
}
