use morrowland_config::{CONFIG_BACKEND, ConfigBackend, ConfigError};
use morrowland_core::domain::{LeaderboardTab, SortOrder};
use morrowland_core::services::{AggregationRequest, RatingAggregator, TREND_WINDOW};
use serde::{Deserialize, Serialize};

/// `[leaderboard]` section: the view state the app starts with.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LeaderboardConfig {
  #[serde(default)]
  pub default_min_reviews: u32,

  #[serde(default)]
  pub default_tab: LeaderboardTab,

  /// Highest rating first.
  #[serde(default = "default_descending")]
  pub descending: bool,

  /// How many points of review history each trend line keeps.
  #[serde(default = "default_trend_window")]
  pub trend_window: usize,
}

fn default_descending() -> bool {
  true
}

fn default_trend_window() -> usize {
  TREND_WINDOW
}

impl Default for LeaderboardConfig {
  fn default() -> Self {
    LeaderboardConfig {
      default_min_reviews: 0,
      default_tab: LeaderboardTab::default(),
      descending: default_descending(),
      trend_window: default_trend_window(),
    }
  }
}

impl LeaderboardConfig {
  pub fn load() -> Result<Self, ConfigError> {
    let cfg = CONFIG_BACKEND.load_section_with_default("leaderboard")?;
    CONFIG_BACKEND.save_section("leaderboard", &cfg)?;
    Ok(cfg)
  }
}

impl From<&LeaderboardConfig> for AggregationRequest {
  fn from(cfg: &LeaderboardConfig) -> Self {
    AggregationRequest::default()
      .with_min_reviews(cfg.default_min_reviews)
      .with_tab(cfg.default_tab)
      .with_sort(SortOrder::from_descending(cfg.descending))
  }
}

impl From<&LeaderboardConfig> for RatingAggregator {
  fn from(cfg: &LeaderboardConfig) -> Self {
    RatingAggregator::new(cfg.trend_window)
  }
}
