use tracing::info;

use crate::{
    agent::{Policy, RandomPolicy},
    error::EnvError,
    gym::TradingEnv,
    history::{EpisodeHistory, MetaHistory},
};

#[derive(Debug, Default)]
pub struct RandomGames {
    pub episodes: Vec<EpisodeHistory>,
    pub meta_history: MetaHistory,
}

impl RandomGames {
    pub fn average_net_worth(&self) -> f64 {
        self.meta_history.average_net_worth()
    }
}

/// Play one episode until the net worth floor is breached or the episode end is reached
pub fn run_episode<P: Policy + ?Sized>(
    env: &mut TradingEnv,
    policy: &mut P,
    episode_length: usize,
    render: bool,
) -> Result<EpisodeHistory, EnvError> {
    let mut observation = env.reset(episode_length)?;
    let mut history = EpisodeHistory::default();

    while !env.is_episode_end() {
        let action = policy.act(&observation);
        let step = env.step(action)?;

        if render {
            env.render();
        }

        history.record(env, &step);
        if step.done {
            break;
        }

        observation = step.observation;
    }

    Ok(history)
}

pub fn random_games(
    env: &mut TradingEnv,
    train_episodes: usize,
    training_batch_size: usize,
    seed: Option<u64>,
    render: bool,
) -> Result<RandomGames, EnvError> {
    let mut policy = RandomPolicy::new(seed);
    let mut games = RandomGames::default();

    for episode in 0..train_episodes {
        let history = run_episode(env, &mut policy, training_batch_size, render)?;

        info!(
            episode,
            steps = history.steps(),
            net_worth = env.net_worth(),
            terminated = history.terminated,
            "episode finished"
        );

        games.meta_history.record(&history);
        games.episodes.push(history);
    }

    info!(
        episodes = train_episodes,
        average_net_worth = games.average_net_worth(),
        "random games finished"
    );

    Ok(games)
}
