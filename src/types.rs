use serde::{Deserialize, Serialize};

/// A list of values, where the last index is the most recent
pub type Data = Vec<f64>;

/// OHLCV values for one step of the dataset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    pub fn new(open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// False when any field is missing (NaN) or infinite, or when open or close
    /// is not a positive price to trade at
    pub fn is_complete(&self) -> bool {
        [self.open, self.high, self.low, self.close, self.volume]
            .iter()
            .all(|value| value.is_finite())
            && self.open > 0.
            && self.close > 0.
    }
}

/// Account state after one step's action was processed.
///
/// `crypto_bought` and `crypto_sold` only cover that step's trade.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub balance: f64,
    pub net_worth: f64,
    pub crypto_bought: f64,
    pub crypto_sold: f64,
    pub crypto_held: f64,
}
