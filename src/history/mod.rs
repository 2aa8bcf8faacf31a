pub mod episode;
pub mod meta;

pub use episode::{EpisodeHistory, Fill};
pub use meta::MetaHistory;
