use std::path::Path;

use crate::{
    charts::general::simple_chart, history::episode::EpisodeHistory, types::Data,
    utils::create_folder_if_not_exists,
};

/// Results across episodes of one run
#[derive(Default, Debug, Clone)]
pub struct MetaHistory {
    pub final_net_worth: Data,
    pub total_reward: Data,
    pub terminated: usize,
}

impl MetaHistory {
    pub fn record(&mut self, history: &EpisodeHistory) {
        if let Some(net_worth) = history.final_net_worth() {
            self.final_net_worth.push(net_worth);
        }
        self.total_reward.push(history.total_reward());
        if history.terminated {
            self.terminated += 1;
        }
    }

    pub fn episodes(&self) -> usize {
        self.total_reward.len()
    }

    pub fn average_net_worth(&self) -> f64 {
        if self.final_net_worth.is_empty() {
            return 0.;
        }
        self.final_net_worth.iter().sum::<f64>() / self.final_net_worth.len() as f64
    }

    pub fn chart(&self, dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if self.final_net_worth.is_empty() {
            return Ok(());
        }

        create_folder_if_not_exists(dir)?;
        simple_chart(dir, "final_net_worth", &self.final_net_worth)?;
        simple_chart(dir, "total_reward", &self.total_reward)?;

        Ok(())
    }
}
