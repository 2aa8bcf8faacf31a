use std::fmt;

use rand::Rng;

/// Trades are always all-in or all-out, so actions carry no amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Buy,
    Hold,
    Sell,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Buy, Action::Hold, Action::Sell];

    pub fn size() -> usize {
        Self::ALL.len()
    }

    /// Discrete action space index: 0 is hold, 1 is buy, 2 is sell
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Action::Hold),
            1 => Some(Action::Buy),
            2 => Some(Action::Sell),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Action::Hold => 0,
            Action::Buy => 1,
            Action::Sell => 2,
        }
    }

    /// Signed direction of the trade
    pub fn value(self) -> i8 {
        match self {
            Action::Buy => 1,
            Action::Hold => 0,
            Action::Sell => -1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::Buy => "BUY",
            Action::Hold => "HOLD",
            Action::Sell => "SELL",
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::size())]
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
