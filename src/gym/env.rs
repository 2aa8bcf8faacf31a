use std::sync::Arc;

use colored::Colorize;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

use crate::{
    constants::env::{FEATURES_PER_STEP, INITIAL_BALANCE, LOOKBACK_WINDOW_SIZE, NET_WORTH_FLOOR},
    error::EnvError,
    gym::{Action, Observation, Portfolio, RollingWindow},
    types::{PortfolioSnapshot, PriceBar},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvConfig {
    pub initial_balance: f64,
    pub lookback_window_size: usize,
    /// Seeds start step and execution price draws. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            initial_balance: INITIAL_BALANCE,
            lookback_window_size: LOOKBACK_WINDOW_SIZE,
            seed: None,
        }
    }
}

/// Result of a single `step`
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub observation: Observation,
    pub reward: f64,
    /// Net worth fell to half the initial balance. Reaching the episode end is not reported here.
    pub done: bool,
    pub execution_price: f64,
}

/// Single asset trading environment over historical bars
#[derive(Debug)]
pub struct TradingEnv {
    bars: Arc<[PriceBar]>,
    total_steps: usize,
    initial_balance: f64,
    lookback_window_size: usize,
    portfolio: Portfolio,
    current_step: usize,
    start_step: usize,
    end_step: usize,
    market_history: RollingWindow<PriceBar>,
    orders_history: RollingWindow<PortfolioSnapshot>,
    rng: StdRng,
}

impl TradingEnv {
    /// Incomplete bars, including those without a positive open and close, are dropped and the rest reindexed from 0.
    /// The environment starts out in an evaluation episode.
    pub fn new(bars: impl Into<Arc<[PriceBar]>>, config: EnvConfig) -> Result<Self, EnvError> {
        let bars: Arc<[PriceBar]> = bars.into();
        let bars = if bars.iter().all(PriceBar::is_complete) {
            bars
        } else {
            bars.iter().copied().filter(PriceBar::is_complete).collect()
        };

        let initial_balance = config.initial_balance;
        if !(initial_balance.is_finite() && initial_balance > 0.) {
            return Err(EnvError::InvalidInitialBalance(initial_balance));
        }

        let lookback = config.lookback_window_size;
        if lookback == 0 {
            return Err(EnvError::InvalidLookbackWindow);
        }
        if bars.len() <= lookback {
            return Err(EnvError::InsufficientData {
                bars: bars.len(),
                lookback,
            });
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let total_steps = bars.len() - 1;

        let mut env = Self {
            bars,
            total_steps,
            initial_balance: config.initial_balance,
            lookback_window_size: lookback,
            portfolio: Portfolio::new(config.initial_balance),
            current_step: lookback,
            start_step: lookback,
            end_step: total_steps,
            market_history: RollingWindow::new(lookback),
            orders_history: RollingWindow::new(lookback),
            rng,
        };
        env.start_episode(lookback, total_steps);

        Ok(env)
    }

    /// `episode_length > 0` starts a training episode at a random step.
    /// `0` walks the whole dataset once from the first full window.
    pub fn reset(&mut self, episode_length: usize) -> Result<Observation, EnvError> {
        let lookback = self.lookback_window_size;

        let (start_step, end_step) = if episode_length > 0 {
            let latest_start = self
                .total_steps
                .checked_sub(episode_length)
                .filter(|latest_start| *latest_start >= lookback)
                .ok_or(EnvError::InvalidEpisodeConfiguration {
                    episode_length,
                    total_steps: self.total_steps,
                    lookback,
                })?;

            let start_step = self.rng.gen_range(lookback..=latest_start);
            (start_step, start_step + episode_length)
        } else {
            (lookback, self.total_steps)
        };

        self.start_episode(start_step, end_step);
        debug!(start_step, end_step, "environment reset");

        Ok(self.observation())
    }

    pub fn step(&mut self, action: Action) -> Result<Step, EnvError> {
        if self.current_step >= self.end_step {
            return Err(EnvError::OutOfRangeStep {
                step: self.current_step,
                end_step: self.end_step,
            });
        }

        self.portfolio.begin_step();
        self.current_step += 1;

        let bar = self.bars[self.current_step];
        let execution_price = self.execution_price(&bar);

        self.portfolio.apply(action, execution_price);
        self.portfolio.revalue(execution_price);

        self.orders_history.push(self.portfolio.snapshot());
        self.market_history.push(bar);

        let reward = self.portfolio.net_worth - self.portfolio.prev_net_worth;
        let done = self.portfolio.net_worth <= self.initial_balance * NET_WORTH_FLOOR;

        Ok(Step {
            observation: self.observation(),
            reward,
            done,
            execution_price,
        })
    }

    pub fn render(&self) {
        let net_worth = self.portfolio.net_worth.to_string();
        let net_worth = if self.portfolio.net_worth >= self.initial_balance {
            net_worth.green()
        } else {
            net_worth.red()
        };

        println!("Step: {}, Net Worth: {}", self.current_step, net_worth);
    }

    pub fn status_line(&self) -> String {
        format!(
            "Step: {}, Net Worth: {}",
            self.current_step, self.portfolio.net_worth
        )
    }

    /// The driver's stop condition besides `done`
    pub fn is_episode_end(&self) -> bool {
        self.current_step == self.end_step
    }

    pub fn observation(&self) -> Observation {
        Observation::new(&self.market_history, &self.orders_history)
    }

    pub fn portfolio(&self) -> PortfolioSnapshot {
        self.portfolio.snapshot()
    }

    pub fn state_size(&self) -> (usize, usize) {
        (self.lookback_window_size, FEATURES_PER_STEP)
    }

    pub fn bars(&self) -> &Arc<[PriceBar]> {
        &self.bars
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn start_step(&self) -> usize {
        self.start_step
    }

    pub fn end_step(&self) -> usize {
        self.end_step
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn initial_balance(&self) -> f64 {
        self.initial_balance
    }

    pub fn lookback_window_size(&self) -> usize {
        self.lookback_window_size
    }

    pub fn balance(&self) -> f64 {
        self.portfolio.balance
    }

    pub fn net_worth(&self) -> f64 {
        self.portfolio.net_worth
    }

    pub fn prev_net_worth(&self) -> f64 {
        self.portfolio.prev_net_worth
    }

    pub fn crypto_held(&self) -> f64 {
        self.portfolio.crypto_held
    }

    pub fn crypto_bought(&self) -> f64 {
        self.portfolio.crypto_bought
    }

    pub fn crypto_sold(&self) -> f64 {
        self.portfolio.crypto_sold
    }

    fn start_episode(&mut self, start_step: usize, end_step: usize) {
        self.portfolio = Portfolio::new(self.initial_balance);
        self.start_step = start_step;
        self.end_step = end_step;
        self.current_step = start_step;

        self.market_history.clear();
        self.orders_history.clear();

        let initial = self.portfolio.snapshot();
        let first = self.current_step + 1 - self.lookback_window_size;
        for step in first..=self.current_step {
            self.orders_history.push(initial);
            self.market_history.push(self.bars[step]);
        }
    }

    /// Somewhere between the bar's open and close
    fn execution_price(&mut self, bar: &PriceBar) -> f64 {
        let low = bar.open.min(bar.close);
        let high = bar.open.max(bar.close);

        if low == high {
            low
        } else {
            self.rng.gen_range(low..=high)
        }
    }
}
