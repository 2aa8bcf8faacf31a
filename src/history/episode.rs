use std::path::Path;

use crate::{
    charts::general::{assets_chart, simple_chart},
    gym::{Step, TradingEnv},
    types::Data,
    utils::create_folder_if_not_exists,
};

/// `(step, price, quantity)`
pub type Fill = (usize, f64, f64);

#[derive(Debug, Default, Clone)]
pub struct EpisodeHistory {
    pub net_worth: Data,
    pub balance: Data,
    pub rewards: Data,
    pub buys: Vec<Fill>,
    pub sells: Vec<Fill>,
    /// The net worth floor was breached before the episode end
    pub terminated: bool,
}

impl EpisodeHistory {
    pub fn record(&mut self, env: &TradingEnv, step: &Step) {
        self.net_worth.push(env.net_worth());
        self.balance.push(env.balance());
        self.rewards.push(step.reward);

        if env.crypto_bought() > 0. {
            self.buys
                .push((env.current_step(), step.execution_price, env.crypto_bought()));
        }
        if env.crypto_sold() > 0. {
            self.sells
                .push((env.current_step(), step.execution_price, env.crypto_sold()));
        }

        self.terminated |= step.done;
    }

    pub fn steps(&self) -> usize {
        self.rewards.len()
    }

    pub fn final_net_worth(&self) -> Option<f64> {
        self.net_worth.last().copied()
    }

    pub fn total_reward(&self) -> f64 {
        self.rewards.iter().sum()
    }

    pub fn chart(&self, dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if self.net_worth.is_empty() {
            return Ok(());
        }

        create_folder_if_not_exists(dir)?;
        assets_chart(dir, &self.net_worth, &self.balance)?;
        simple_chart(dir, "rewards", &self.rewards)?;

        Ok(())
    }
}
