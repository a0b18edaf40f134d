use async_trait::async_trait;
use tracing::warn;

use morrowland_core::domain::{ArtistSummary, Review};
use morrowland_core::ports::{LeaderboardSource, SourceError};

use crate::client::{ODataClient, ODataError, QueryOptions};
use crate::config::ODataConfig;
use crate::records::{LeaderboardRow, ReviewRow};

/// Implementación de `LeaderboardSource` sobre un servicio OData V4.
pub struct ODataLeaderboardSource {
  client: ODataClient,
  config: ODataConfig,
}

impl ODataLeaderboardSource {
  pub fn new(config: ODataConfig) -> Result<Self, ODataError> {
    let client = ODataClient::new(&config)?;
    Ok(Self { client, config })
  }
}

#[async_trait]
impl LeaderboardSource for ODataLeaderboardSource {
  async fn fetch_leaderboard(&self) -> Result<Vec<ArtistSummary>, SourceError> {
    let options = QueryOptions { top: Some(self.config.artists_top), orderby: Some("avgRating desc"), select: None };

    let rows: Vec<LeaderboardRow> =
      self.client.fetch_collection(&self.config.leaderboard_entity, &options).await.map_err(map_odata_error)?;

    Ok(keep_valid(rows, LeaderboardRow::into_summary, &self.config.leaderboard_entity))
  }

  async fn fetch_reviews(&self) -> Result<Vec<Review>, SourceError> {
    let options =
      QueryOptions { top: Some(self.config.reviews_top), orderby: None, select: Some("artist_ID,rating,reviewDate") };

    let rows: Vec<ReviewRow> =
      self.client.fetch_collection(&self.config.reviews_entity, &options).await.map_err(map_odata_error)?;

    Ok(keep_valid(rows, ReviewRow::into_review, &self.config.reviews_entity))
  }
}

/// Convierte filas a dominio descartando (y avisando) las que no tienen id.
fn keep_valid<R, T>(rows: Vec<R>, convert: impl Fn(R) -> Option<T>, entity: &str) -> Vec<T> {
  let total = rows.len();
  let valid: Vec<T> = rows.into_iter().filter_map(convert).collect();

  let dropped = total - valid.len();
  if dropped > 0 {
    warn!(entity, dropped, "rows without an artist id were skipped");
  }

  valid
}

fn map_odata_error(err: ODataError) -> SourceError {
  match err {
    ODataError::Http(e) => SourceError::Transport(e.to_string()),
    e @ (ODataError::Status { .. } | ODataError::Decode { .. }) => SourceError::Response(e.to_string()),
    ODataError::Config(e) => SourceError::Internal(e),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rows_without_id_are_skipped() {
    let rows: Vec<LeaderboardRow> = serde_json::from_str(
      r#"[{"ID": "a1", "name": "Nova", "avgRating": 4.5, "reviewCount": 10}, {"name": "nobody"}]"#,
    )
    .unwrap();

    let kept = keep_valid(rows, LeaderboardRow::into_summary, "Leaderboard");

    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].name, "Nova");
  }

  #[test]
  fn error_mapping() {
    let status = map_odata_error(ODataError::Status { status: 503, url: "http://x/Reviews".into() });
    assert!(matches!(status, SourceError::Response(_)));

    let config = map_odata_error(ODataError::Config("bad url".into()));
    assert!(matches!(config, SourceError::Internal(m) if m == "bad url"));
  }
}
