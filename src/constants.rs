pub mod env {
    pub const INITIAL_BALANCE: f64 = 1000.;
    pub const LOOKBACK_WINDOW_SIZE: usize = 50;
    /// Values per observation row: 5 market fields + 5 portfolio fields
    pub const FEATURES_PER_STEP: usize = 10;
    /// An episode is over once net worth falls to this fraction of the initial balance
    pub const NET_WORTH_FLOOR: f64 = 0.5;
}

pub mod files {
    pub const LOG_PATH: &str = "logs";
    pub const LOG_FILE_PREFIX: &str = "app";
    pub const CHARTS_PATH: &str = "charts";
}

pub mod training {
    pub const LOOKBACK_WINDOW_SIZE: usize = 10;
    pub const TRAIN_EPISODES: usize = 10;
    pub const TRAINING_BATCH_SIZE: usize = 500;
    /// 30 days of hourly bars
    pub const TEST_BARS: usize = 720;
}

pub mod logging {
    pub const LEVEL: &str = "debug";
    pub const MAX_LOG_FILES: usize = 100;
}
