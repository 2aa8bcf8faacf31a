use crate::{gym::Action, types::PortfolioSnapshot};

/// Cash and crypto ledger for a single asset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Portfolio {
    pub balance: f64,
    pub net_worth: f64,
    pub prev_net_worth: f64,
    pub crypto_held: f64,
    pub crypto_bought: f64,
    pub crypto_sold: f64,
}

impl Portfolio {
    pub fn new(initial_balance: f64) -> Self {
        Self {
            balance: initial_balance,
            net_worth: initial_balance,
            prev_net_worth: initial_balance,
            crypto_held: 0.,
            crypto_bought: 0.,
            crypto_sold: 0.,
        }
    }

    /// Forget the previous step's trade
    pub fn begin_step(&mut self) {
        self.crypto_bought = 0.;
        self.crypto_sold = 0.;
    }

    /// Buy with 100% of the balance or sell 100% of holdings at `price`.
    /// Infeasible trades fall through as a hold.
    pub fn apply(&mut self, action: Action, price: f64) {
        match action {
            Action::Hold => {}
            Action::Buy if self.balance > 0. => {
                self.crypto_bought = self.balance / price;
                // balance - bought * price is off by a few ulps either way
                self.balance = 0.;
                self.crypto_held += self.crypto_bought;
            }
            Action::Sell if self.crypto_held > 0. => {
                self.crypto_sold = self.crypto_held;
                self.balance += self.crypto_sold * price;
                self.crypto_held = 0.;
            }
            Action::Buy | Action::Sell => {}
        }
    }

    pub fn revalue(&mut self, price: f64) {
        self.prev_net_worth = self.net_worth;
        self.net_worth = self.balance + self.crypto_held * price;
    }

    pub fn snapshot(&self) -> PortfolioSnapshot {
        PortfolioSnapshot {
            balance: self.balance,
            net_worth: self.net_worth,
            crypto_bought: self.crypto_bought,
            crypto_sold: self.crypto_sold,
            crypto_held: self.crypto_held,
        }
    }
}
