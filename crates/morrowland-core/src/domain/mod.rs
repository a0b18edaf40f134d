pub mod artist;
pub mod ids;
pub mod leaderboard;
pub mod rating;
pub mod review;

pub use artist::ArtistSummary;
pub use ids::ArtistId;
pub use leaderboard::{
  Badge, GenreOption, LeaderboardSnapshot, LeaderboardTab, RankedEntry, SortOrder, TabParseError, TrendPoint,
};
pub use rating::{Stars, round2};
pub use review::{Review, ReviewPoint};
