//! Infrastructure around the engine: id generation and RNG implementations.

pub mod ids;
pub mod rng;

pub use ids::*;
pub use rng::*;
