use rand::{rngs::StdRng, SeedableRng};

use crate::gym::{Action, Observation};

pub mod random_games;

pub use random_games::{random_games, run_episode, RandomGames};

/// Chooses the next action from the latest observation
pub trait Policy {
    fn act(&mut self, observation: &Observation) -> Action;
}

/// Uniform over every action, ignoring the observation
#[derive(Debug)]
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self { rng }
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Policy for RandomPolicy {
    fn act(&mut self, _observation: &Observation) -> Action {
        Action::random(&mut self.rng)
    }
}
