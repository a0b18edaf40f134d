use morrowland_config::{CONFIG_BACKEND, ConfigBackend, ConfigError};
use serde::{Deserialize, Serialize};

/// Sección `[odata]` de morrowland.toml.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ODataConfig {
  /// Raíz del servicio OData V4 (sin entidad al final).
  #[serde(default = "default_service_url")]
  pub service_url: String,

  /// Entidad con las filas agregadas por artista.
  #[serde(default = "default_leaderboard_entity")]
  pub leaderboard_entity: String,

  #[serde(default = "default_reviews_entity")]
  pub reviews_entity: String,

  /// Tope `$top` para el leaderboard.
  #[serde(default = "default_artists_top")]
  pub artists_top: u32,

  /// Tope `$top` para las reviews.
  #[serde(default = "default_reviews_top")]
  pub reviews_top: u32,

  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_service_url() -> String {
  "http://localhost:4004/odata/v4/festival".into()
}

fn default_leaderboard_entity() -> String {
  "Leaderboard".into()
}

fn default_reviews_entity() -> String {
  "Reviews".into()
}

fn default_artists_top() -> u32 {
  1000
}

fn default_reviews_top() -> u32 {
  5000
}

fn default_timeout_secs() -> u64 {
  30
}

impl Default for ODataConfig {
  fn default() -> Self {
    ODataConfig {
      service_url: default_service_url(),
      leaderboard_entity: default_leaderboard_entity(),
      reviews_entity: default_reviews_entity(),
      artists_top: default_artists_top(),
      reviews_top: default_reviews_top(),
      timeout_secs: default_timeout_secs(),
    }
  }
}

impl ODataConfig {
  pub fn load() -> Result<Self, ConfigError> {
    let cfg = CONFIG_BACKEND.load_section_with_default("odata")?;
    CONFIG_BACKEND.save_section("odata", &cfg)?;
    Ok(cfg)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn partial_section_fills_defaults() {
    let cfg: ODataConfig = toml::from_str("service_url = \"http://festival.test/odata\"\nreviews_top = 200\n").unwrap();

    assert_eq!(cfg.service_url, "http://festival.test/odata");
    assert_eq!(cfg.reviews_top, 200);
    assert_eq!(cfg.artists_top, 1000);
    assert_eq!(cfg.leaderboard_entity, "Leaderboard");
  }
}
