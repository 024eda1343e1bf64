//! Transport-facing API of the table engine.
//!
//! - commands (commands.rs): everything that changes a table;
//! - queries (queries.rs): read-only views;
//! - DTOs (dto.rs): compact shapes for lobbies and clients;
//! - errors (errors.rs): what the client gets back on failure.

pub mod commands;
pub mod dto;
pub mod errors;
pub mod queries;

pub use commands::*;
pub use dto::*;
pub use errors::*;
pub use queries::*;
