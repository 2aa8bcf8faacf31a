use thiserror::Error;

/// Errors raised by the market environment
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvError {
    #[error("invalid episode configuration: episode length {episode_length} leaves no start step in [{lookback}, {total_steps} - {episode_length}]")]
    InvalidEpisodeConfiguration {
        episode_length: usize,
        total_steps: usize,
        lookback: usize,
    },

    #[error("step out of range: current step {step} has reached the episode end {end_step}, call reset first")]
    OutOfRangeStep { step: usize, end_step: usize },

    #[error("initial balance must be a positive amount, got {0}")]
    InvalidInitialBalance(f64),

    #[error("lookback window size must be at least 1")]
    InvalidLookbackWindow,

    #[error("insufficient data: {bars} usable bars cannot fill a lookback window of {lookback} and take a step")]
    InsufficientData { bars: usize, lookback: usize },
}

/// Errors raised while loading historical bars
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid date {value:?} in row {row}")]
    InvalidDate { row: usize, value: String },

    #[error("no complete rows in dataset")]
    Empty,
}
