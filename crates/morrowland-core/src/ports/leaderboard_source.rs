use async_trait::async_trait;

use crate::domain::{ArtistSummary, Review};

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
  /// Red, timeout, DNS...
  #[error("transport error: {0}")]
  Transport(String),

  /// El servicio respondió, pero con un estado o cuerpo inservible.
  #[error("bad response: {0}")]
  Response(String),

  #[error("internal error: {0}")]
  Internal(String),
}

/// Port de lectura de datos del leaderboard.
///
/// El adapter es responsable de convertir la respuesta (tipado laxo) en
/// registros estrictos antes de entregarlos: el núcleo no vuelve a sanear
/// campos numéricos.
#[async_trait]
pub trait LeaderboardSource: Send + Sync {
  /// Filas del leaderboard. El orden (avgRating desc) es sólo una pista.
  async fn fetch_leaderboard(&self) -> Result<Vec<ArtistSummary>, SourceError>;

  /// Reviews sin orden garantizado.
  async fn fetch_reviews(&self) -> Result<Vec<Review>, SourceError>;
}
