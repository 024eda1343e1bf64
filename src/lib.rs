//! Multiplayer Texas Hold'em table engine.
//!
//! `engine::GameEngine` owns one table and applies every transition to its
//! `domain::GameState`; `engine::TableRegistry` keeps many tables behind
//! per-table locks; `api` is the command/query surface a transport drives.

pub mod api;
pub mod domain;
pub mod engine;
pub mod eval;
pub mod infra;

pub use domain::{Chips, GameSettings, GameState, Phase, Player, PlayerId};
pub use engine::{ActionType, EngineError, GameEngine, HandResult, TableRegistry};
