use serde::{Deserialize, Serialize};

/// Phase of the table.
///
/// `Waiting` only exists before the first hand; between hands the table sits
/// in `Finished` until the next hand is triggered.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Waiting,
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
    Finished,
}

impl Phase {
    /// Is this a street on which players act?
    pub fn is_betting(self) -> bool {
        matches!(self, Phase::PreFlop | Phase::Flop | Phase::Turn | Phase::River)
    }

    /// The street after this one; the river is followed by the showdown.
    pub fn next_street(self) -> Option<Phase> {
        match self {
            Phase::PreFlop => Some(Phase::Flop),
            Phase::Flop => Some(Phase::Turn),
            Phase::Turn => Some(Phase::River),
            Phase::River => Some(Phase::Showdown),
            Phase::Waiting | Phase::Showdown | Phase::Finished => None,
        }
    }

    /// How many community cards are revealed when entering this phase.
    pub fn cards_dealt_on_entry(self) -> usize {
        match self {
            Phase::Flop => 3,
            Phase::Turn | Phase::River => 1,
            _ => 0,
        }
    }
}

/// Totally ordered hand strength. Bigger is better, equal means a split.
/// Built by `eval`; see `eval::hand_rank` for the bit layout.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandRank(pub u32);
