use crate::domain::ids::ArtistId;
use serde::{Deserialize, Serialize};

/// Review individual de un artista.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
  pub artist_id: ArtistId,

  /// Valoración (1..=5 en la práctica). No se valida aquí.
  pub rating: f64,

  /// Fecha ISO `YYYY-MM-DD`; sólo se usa para ordenar.
  pub review_date: Option<String>,
}

/// Entrada del índice de reviews: lo que queda de una review tras agrupar por artista.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewPoint {
  pub rating: f64,
  pub review_date: Option<String>,
}

impl From<&Review> for ReviewPoint {
  fn from(review: &Review) -> Self {
    ReviewPoint { rating: review.rating, review_date: review.review_date.clone() }
  }
}
