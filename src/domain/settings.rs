use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::chips::Chips;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 10;

/// Game variant. Only hold'em has an evaluator; the others are recognised so
/// that a configuration naming them fails loudly instead of misparsing.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    #[default]
    TexasHoldem,
    Omaha,
    OmahaHiLo,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::TexasHoldem => write!(f, "texas-holdem"),
            Variant::Omaha => write!(f, "omaha"),
            Variant::OmahaHiLo => write!(f, "omaha-hi-lo"),
        }
    }
}

/// Ante kind.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AnteType {
    /// No ante.
    #[default]
    None,
    /// Every dealt player posts the ante.
    Ante,
    /// Big Blind Ante: the big blind posts a single ante for the whole table.
    BbAnte,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AnteConfig {
    #[serde(rename = "type", default)]
    pub kind: AnteType,
    #[serde(default)]
    pub amount: Chips,
}

/// Buy-in bounds. Advisory only.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StackRange {
    pub min: Chips,
    pub max: Chips,
}

impl StackRange {
    pub fn contains(&self, amount: Chips) -> bool {
        amount >= self.min && amount <= self.max
    }
}

/// Time bank for the external turn timer. Carried in the settings so the
/// transport can read it; the engine never enforces time.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeBankConfig {
    pub initial_seconds: u32,
    #[serde(default)]
    pub increment_per_hand_seconds: u32,
    pub max_seconds: u32,
}

/// Table configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GameSettings {
    pub variant: Variant,
    pub small_blind: Chips,
    pub big_blind: Chips,
    /// Stack every newly seated player receives.
    pub starting_stack: Chips,
    /// Seat limit, 2..=10.
    pub max_players: usize,
    pub stack_range: Option<StackRange>,
    pub turn_timer_seconds: Option<u32>,
    pub time_bank: Option<TimeBankConfig>,
    pub ante: AnteConfig,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            variant: Variant::TexasHoldem,
            small_blind: Chips(10),
            big_blind: Chips(20),
            starting_stack: Chips(1_000),
            max_players: MAX_PLAYERS,
            stack_range: None,
            turn_timer_seconds: None,
            time_bank: None,
            ante: AnteConfig::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("variant {0} has no hand evaluator")]
    UnsupportedVariant(Variant),

    #[error("max_players must be between 2 and 10, got {0}")]
    MaxPlayersOutOfRange(usize),

    #[error("blinds must satisfy 0 < small_blind ({small}) <= big_blind ({big})")]
    InvalidBlinds { small: Chips, big: Chips },

    #[error("starting_stack must be positive")]
    ZeroStartingStack,

    #[error("starting_stack {stack} for {max_players} players overflows the chip count")]
    StartingStackTooLarge { stack: Chips, max_players: usize },

    #[error("stack_range min ({min}) exceeds max ({max})")]
    InvalidStackRange { min: Chips, max: Chips },

    #[error("ante of type {0:?} needs a positive amount")]
    ZeroAnte(AnteType),

    #[error("settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl GameSettings {
    /// Settings with the given blinds and stack, everything else default.
    pub fn with_blinds(small_blind: u64, big_blind: u64, starting_stack: u64) -> Self {
        Self {
            small_blind: Chips(small_blind),
            big_blind: Chips(big_blind),
            starting_stack: Chips(starting_stack),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON settings document. Missing keys fall back to
    /// `GameSettings::default()`.
    pub fn from_json_str(s: &str) -> Result<Self, SettingsError> {
        let settings: GameSettings = serde_json::from_str(s)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.variant != Variant::TexasHoldem {
            return Err(SettingsError::UnsupportedVariant(self.variant));
        }
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.max_players) {
            return Err(SettingsError::MaxPlayersOutOfRange(self.max_players));
        }
        if self.small_blind.is_zero() || self.big_blind < self.small_blind {
            return Err(SettingsError::InvalidBlinds {
                small: self.small_blind,
                big: self.big_blind,
            });
        }
        if self.starting_stack.is_zero() {
            return Err(SettingsError::ZeroStartingStack);
        }
        if self
            .starting_stack
            .0
            .checked_mul(self.max_players as u64)
            .is_none()
        {
            return Err(SettingsError::StartingStackTooLarge {
                stack: self.starting_stack,
                max_players: self.max_players,
            });
        }
        if let Some(range) = self.stack_range {
            if range.min > range.max {
                return Err(SettingsError::InvalidStackRange {
                    min: range.min,
                    max: range.max,
                });
            }
        }
        if self.ante.kind != AnteType::None && self.ante.amount.is_zero() {
            return Err(SettingsError::ZeroAnte(self.ante.kind));
        }
        Ok(())
    }
}
