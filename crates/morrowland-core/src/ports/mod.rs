pub mod leaderboard_source;
pub mod notifier;

pub use leaderboard_source::{LeaderboardSource, SourceError};
pub use notifier::Notifier;
