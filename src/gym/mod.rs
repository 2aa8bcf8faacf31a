mod action;
mod env;
#[cfg(test)]
mod env_tests;
mod observation;
mod portfolio;

pub use action::Action;
pub use env::{EnvConfig, Step, TradingEnv};
pub use observation::{Observation, RollingWindow};
pub use portfolio::Portfolio;
