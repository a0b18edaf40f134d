//! Filas tal como llegan del servicio y su saneado a registros del dominio.
//!
//! Los campos numéricos pueden venir como número, como cadena
//! (`IEEE754Compatible=true` en OData) o directamente ausentes. Cualquier
//! cosa que no sea un número utilizable se convierte en 0.

use morrowland_core::domain::{ArtistId, ArtistSummary, Review};
use serde::Deserialize;
use serde_json::Value;

/// Envoltorio de colección OData V4: `{ "@odata.context": ..., "value": [...] }`.
#[derive(Debug, Deserialize)]
pub struct ODataCollection<T> {
  pub value: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardRow {
  #[serde(rename = "ID", alias = "id", default)]
  pub id: Value,
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub genre: Option<String>,
  #[serde(default)]
  pub country: Option<String>,
  #[serde(rename = "avgRating", alias = "avg_rating", default)]
  pub avg_rating: Value,
  #[serde(rename = "reviewCount", alias = "review_count", default)]
  pub review_count: Value,
}

impl LeaderboardRow {
  /// `None` si la fila no trae identificador.
  pub fn into_summary(self) -> Option<ArtistSummary> {
    let id = coerce_id(&self.id)?;

    Some(ArtistSummary {
      id,
      name: self.name.unwrap_or_default(),
      genre: self.genre.unwrap_or_default(),
      country: self.country.unwrap_or_default(),
      avg_rating: coerce_f64(&self.avg_rating),
      review_count: coerce_u32(&self.review_count),
    })
  }
}

#[derive(Debug, Deserialize)]
pub struct ReviewRow {
  #[serde(rename = "artist_ID", alias = "artistId", alias = "artist_id", default)]
  pub artist_id: Value,
  #[serde(default)]
  pub rating: Value,
  #[serde(rename = "reviewDate", alias = "review_date", default)]
  pub review_date: Option<String>,
}

impl ReviewRow {
  /// `None` si la review no apunta a ningún artista.
  pub fn into_review(self) -> Option<Review> {
    let artist_id = coerce_id(&self.artist_id)?;

    Some(Review {
      artist_id,
      rating: coerce_f64(&self.rating),
      review_date: self.review_date.filter(|d| !d.trim().is_empty()),
    })
  }
}

pub fn coerce_f64(value: &Value) -> f64 {
  let parsed = match value {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse::<f64>().ok(),
    _ => None,
  };

  parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

pub fn coerce_u32(value: &Value) -> u32 {
  let v = coerce_f64(value);
  if v <= 0.0 { 0 } else { v.min(u32::MAX as f64) as u32 }
}

fn coerce_id(value: &Value) -> Option<ArtistId> {
  match value {
    Value::String(s) if !s.trim().is_empty() => Some(ArtistId::new(s.trim())),
    Value::Number(n) => Some(ArtistId::new(n.to_string())),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn numbers_strings_and_garbage() {
    assert_eq!(coerce_f64(&json!(4.5)), 4.5);
    assert_eq!(coerce_f64(&json!("4.25")), 4.25);
    assert_eq!(coerce_f64(&json!(null)), 0.0);
    assert_eq!(coerce_f64(&json!("n/a")), 0.0);
    assert_eq!(coerce_f64(&json!({"x": 1})), 0.0);

    assert_eq!(coerce_u32(&json!(12)), 12);
    assert_eq!(coerce_u32(&json!("7")), 7);
    assert_eq!(coerce_u32(&json!(-3)), 0);
    assert_eq!(coerce_u32(&json!(true)), 0);
  }

  #[test]
  fn cap_style_leaderboard_row() {
    let body = json!({
      "@odata.context": "$metadata#Leaderboard",
      "value": [
        { "ID": "7f0c", "name": "Nova", "genre": "Techno", "country": "BE", "avgRating": "4.5", "reviewCount": 10 },
        { "ID": "8a11", "name": "Lumen", "genre": null, "avgRating": null },
        { "name": "Orphan", "avgRating": 5 }
      ]
    });

    let collection: ODataCollection<LeaderboardRow> = serde_json::from_value(body).unwrap();
    let rows: Vec<ArtistSummary> = collection.value.into_iter().filter_map(LeaderboardRow::into_summary).collect();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id.as_str(), "7f0c");
    assert_eq!(rows[0].avg_rating, 4.5);
    assert_eq!(rows[0].review_count, 10);
    assert_eq!(rows[1].genre, "");
    assert_eq!(rows[1].avg_rating, 0.0);
    assert_eq!(rows[1].review_count, 0);
  }

  #[test]
  fn review_rows_accept_both_namings() {
    let body = json!({
      "value": [
        { "artist_ID": "7f0c", "rating": 4, "reviewDate": "2024-01-01" },
        { "artistId": "8a11", "rating": "x", "reviewDate": "" },
        { "rating": 5 }
      ]
    });

    let collection: ODataCollection<ReviewRow> = serde_json::from_value(body).unwrap();
    let reviews: Vec<Review> = collection.value.into_iter().filter_map(ReviewRow::into_review).collect();

    assert_eq!(reviews.len(), 2);
    assert_eq!(reviews[0].rating, 4.0);
    assert_eq!(reviews[0].review_date.as_deref(), Some("2024-01-01"));
    assert_eq!(reviews[1].artist_id.as_str(), "8a11");
    assert_eq!(reviews[1].rating, 0.0);
    assert_eq!(reviews[1].review_date, None);
  }
}
