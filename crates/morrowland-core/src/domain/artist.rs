use crate::domain::ids::ArtistId;
use serde::{Deserialize, Serialize};

/// Fila del leaderboard tal como la entrega la capa de datos.
///
/// La media y el número de reviews vienen precalculados por el servicio;
/// el núcleo sólo los lee. Los campos numéricos ya llegan saneados
/// (ausente o no numérico → 0) desde el adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistSummary {
  /// Identificador único del artista.
  pub id: ArtistId,

  pub name: String,

  pub genre: String,

  pub country: String,

  /// Media de valoraciones calculada por el servicio.
  pub avg_rating: f64,

  /// Número de reviews calculado por el servicio.
  pub review_count: u32,
}

impl ArtistSummary {
  /// `true` si `needle` (ya en minúsculas) aparece en nombre, género o país.
  pub fn matches_query(&self, needle: &str) -> bool {
    if needle.is_empty() {
      return true;
    }

    [&self.name, &self.genre, &self.country].iter().any(|field| field.to_lowercase().contains(needle))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn nova() -> ArtistSummary {
    ArtistSummary {
      id: "a1".into(),
      name: "Nova".into(),
      genre: "Techno".into(),
      country: "BE".into(),
      avg_rating: 4.5,
      review_count: 10,
    }
  }

  #[test]
  fn query_matches_any_text_field() {
    let artist = nova();
    assert!(artist.matches_query(""));
    assert!(artist.matches_query("nov"));
    assert!(artist.matches_query("techno"));
    assert!(artist.matches_query("be"));
    assert!(!artist.matches_query("house"));
  }
}
