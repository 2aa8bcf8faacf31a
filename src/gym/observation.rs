use std::collections::VecDeque;

use crate::{
    constants::env::FEATURES_PER_STEP,
    types::{PortfolioSnapshot, PriceBar},
};

/// Fixed capacity FIFO. Pushing onto a full window evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    capacity: usize,
    items: VecDeque<T>,
}

impl<T: Copy> RollingWindow<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, item: T) {
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }

    /// Oldest first
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().copied().collect()
    }
}

/// The last `W` bars paired by position with the last `W` portfolio snapshots, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub market_history: Vec<PriceBar>,
    pub orders_history: Vec<PortfolioSnapshot>,
}

impl Observation {
    pub fn new(
        market_history: &RollingWindow<PriceBar>,
        orders_history: &RollingWindow<PortfolioSnapshot>,
    ) -> Self {
        Self {
            market_history: market_history.to_vec(),
            orders_history: orders_history.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.market_history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.market_history.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PriceBar, &PortfolioSnapshot)> {
        self.market_history.iter().zip(self.orders_history.iter())
    }

    pub fn latest_order(&self) -> Option<&PortfolioSnapshot> {
        self.orders_history.last()
    }

    /// One row per step: open, high, low, close, volume, balance, net_worth, crypto_bought, crypto_sold, crypto_held
    pub fn features(&self) -> Vec<[f64; FEATURES_PER_STEP]> {
        self.iter()
            .map(|(bar, order)| {
                [
                    bar.open,
                    bar.high,
                    bar.low,
                    bar.close,
                    bar.volume,
                    order.balance,
                    order.net_worth,
                    order.crypto_bought,
                    order.crypto_sold,
                    order.crypto_held,
                ]
            })
            .collect()
    }
}
