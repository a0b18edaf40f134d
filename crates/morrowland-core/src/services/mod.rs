pub mod leaderboard_service;
pub mod rating_aggregator;

pub use leaderboard_service::LeaderboardService;
pub use rating_aggregator::{
  AggregationRequest, RatingAggregator, ReviewIndex, TREND_WINDOW, build_review_index, derive_genre_list,
  parse_min_reviews,
};
