pub mod historical;

pub use historical::{load_csv, read_csv, split_train_test};
