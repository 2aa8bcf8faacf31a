pub mod agent;
pub mod charts;
pub mod constants;
pub mod data;
pub mod error;
pub mod gym;
pub mod history;
pub mod logging;
pub mod types;
pub mod utils;

pub use error::{DataError, EnvError};
pub use gym::{Action, EnvConfig, Observation, Step, TradingEnv};
pub use types::{PortfolioSnapshot, PriceBar};
