use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Chip amount. A `u64` newtype so chip counts don't mix with seat indices
/// or counters.
///
/// Arithmetic is strict: the engine caps every commitment at the player's
/// stack, so an underflow here means the bookkeeping itself is broken and the
/// operation panics instead of silently clamping.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct Chips(pub u64);

impl Chips {
    pub const ZERO: Chips = Chips(0);

    pub fn new(amount: u64) -> Self {
        Chips(amount)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Difference clamped at zero, for "how much is still owed" questions.
    pub fn saturating_sub(self, other: Chips) -> Chips {
        Chips(self.0.saturating_sub(other.0))
    }

    pub fn checked_sub(self, other: Chips) -> Option<Chips> {
        self.0.checked_sub(other.0).map(Chips)
    }
}

impl Add for Chips {
    type Output = Chips;

    fn add(self, rhs: Chips) -> Self::Output {
        match self.0.checked_add(rhs.0) {
            Some(v) => Chips(v),
            None => panic!("chip overflow: {} + {}", self.0, rhs.0),
        }
    }
}

impl AddAssign for Chips {
    fn add_assign(&mut self, rhs: Chips) {
        *self = *self + rhs;
    }
}

impl Sub for Chips {
    type Output = Chips;

    fn sub(self, rhs: Chips) -> Self::Output {
        match self.checked_sub(rhs) {
            Some(v) => v,
            None => panic!("chip underflow: {} - {}", self.0, rhs.0),
        }
    }
}

impl SubAssign for Chips {
    fn sub_assign(&mut self, rhs: Chips) {
        *self = *self - rhs;
    }
}

impl Sum for Chips {
    fn sum<I: Iterator<Item = Chips>>(iter: I) -> Self {
        iter.fold(Chips::ZERO, |acc, c| acc + c)
    }
}

impl<'a> Sum<&'a Chips> for Chips {
    fn sum<I: Iterator<Item = &'a Chips>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Chips {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
