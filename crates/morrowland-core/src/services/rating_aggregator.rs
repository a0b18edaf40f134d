//! Agregación de reviews y ranking del leaderboard.
//!
//! Todo lo de este módulo es puro: el resultado depende sólo de los
//! argumentos. El estado de la UI (búsqueda, umbral, género, pestaña,
//! dirección) viaja en un [`AggregationRequest`] inmutable.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::{
  ArtistId, ArtistSummary, Badge, GenreOption, LeaderboardSnapshot, LeaderboardTab, RankedEntry, Review,
  ReviewPoint, SortOrder, TrendPoint, round2,
};

/// Número máximo de puntos de historia en una serie de tendencia.
pub const TREND_WINDOW: usize = 5;

/// Reviews agrupadas por artista, en orden cronológico.
pub type ReviewIndex = HashMap<ArtistId, Vec<ReviewPoint>>;

/// Parámetros de una pasada de agregación.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationRequest {
  pub query: String,
  pub min_reviews: u32,
  pub sort: SortOrder,
  pub tab: LeaderboardTab,
  /// Vacío = todavía no se eligió género.
  pub selected_genre: String,
}

impl AggregationRequest {
  pub fn with_query(mut self, query: &str) -> Self {
    self.query = query.trim().to_string();
    self
  }

  pub fn with_min_reviews(mut self, min_reviews: u32) -> Self {
    self.min_reviews = min_reviews;
    self
  }

  pub fn with_sort(mut self, sort: SortOrder) -> Self {
    self.sort = sort;
    self
  }

  pub fn with_tab(mut self, tab: LeaderboardTab) -> Self {
    self.tab = tab;
    self
  }

  pub fn with_genre(mut self, genre: &str) -> Self {
    self.selected_genre = genre.to_string();
    self
  }

  fn needle(&self) -> String {
    self.query.trim().to_lowercase()
  }
}

/// Interpreta el campo "mínimo de reviews" tal como lo teclea el usuario.
///
/// Se queda con el entero inicial ("3.5" → 3, "5 reviews" → 5). Vacío, sin
/// dígitos al principio o no positivo → 0 (sin umbral).
pub fn parse_min_reviews(input: Option<&str>) -> u32 {
  let Some(text) = input else {
    return 0;
  };

  let text = text.trim();
  let (negative, unsigned) = match text.as_bytes().first() {
    Some(b'-') => (true, &text[1..]),
    Some(b'+') => (false, &text[1..]),
    _ => (false, text),
  };
  let digits = unsigned.find(|c: char| !c.is_ascii_digit()).map_or(unsigned, |end| &unsigned[..end]);

  if negative || digits.is_empty() {
    return 0;
  }

  // sólo dígitos: el parse únicamente falla por desbordamiento
  digits.parse::<u64>().map_or(u32::MAX, |n| n.min(u32::MAX as u64) as u32)
}

/// Agrupa las reviews por artista y las ordena por fecha ascendente.
///
/// La comparación es lexicográfica sobre el texto ISO; las fechas ausentes
/// cuentan como cadena vacía. El sort es estable, así que empates y
/// ausentes conservan el orden de entrada.
pub fn build_review_index(reviews: &[Review]) -> ReviewIndex {
  let mut index: ReviewIndex = HashMap::new();

  for review in reviews {
    index.entry(review.artist_id.clone()).or_default().push(ReviewPoint::from(review));
  }

  for points in index.values_mut() {
    points.sort_by(|a, b| date_key(a).cmp(date_key(b)));
  }

  index
}

fn date_key(point: &ReviewPoint) -> &str {
  point.review_date.as_deref().unwrap_or("")
}

/// Géneros distintos y no vacíos, en orden ascendente.
pub fn derive_genre_list(artists: &[ArtistSummary]) -> Vec<String> {
  artists
    .iter()
    .map(|a| a.genre.as_str())
    .filter(|g| !g.is_empty())
    .collect::<BTreeSet<_>>()
    .into_iter()
    .map(str::to_string)
    .collect()
}

/// Motor de ranking. Sólo guarda la ventana de tendencia.
#[derive(Debug, Clone, Copy)]
pub struct RatingAggregator {
  trend_window: usize,
}

impl Default for RatingAggregator {
  fn default() -> Self {
    Self::new(TREND_WINDOW)
  }
}

impl RatingAggregator {
  pub fn new(trend_window: usize) -> Self {
    Self { trend_window: trend_window.max(1) }
  }

  pub fn trend_window(&self) -> usize {
    self.trend_window
  }

  /// Serie de medias acumuladas de un artista (como mínimo 2 puntos).
  pub fn trend_series(&self, artist_id: &ArtistId, fallback_avg: f64, index: &ReviewIndex) -> Vec<TrendPoint> {
    let history = index.get(artist_id).map(Vec::as_slice).unwrap_or_default();

    if history.is_empty() {
      return flat_line(fallback_avg);
    }

    let mut sum = 0.0;
    let mut points: Vec<TrendPoint> = history
      .iter()
      .enumerate()
      .map(|(i, point)| {
        sum += point.rating;
        TrendPoint { x: (i + 1) as u32, y: round2(sum / (i + 1) as f64) }
      })
      .collect();

    if points.len() > self.trend_window {
      points = points.split_off(points.len() - self.trend_window);
    }

    // un solo punto no se puede dibujar como línea
    if let [only] = points.as_slice() {
      return flat_line(only.y);
    }

    points
  }

  /// Filtra, ordena y numera una vista.
  ///
  /// `genre_scope` vacío = vista general; si no, igualdad exacta de género.
  pub fn filter_and_rank(
    &self,
    artists: &[ArtistSummary],
    index: &ReviewIndex,
    request: &AggregationRequest,
    genre_scope: &str,
  ) -> Vec<RankedEntry> {
    let needle = request.needle();

    let mut selected: Vec<&ArtistSummary> = artists
      .iter()
      .filter(|a| a.matches_query(&needle))
      .filter(|a| a.review_count >= request.min_reviews)
      .filter(|a| genre_scope.is_empty() || a.genre == genre_scope)
      .collect();

    // sort_by es estable: los empates conservan el orden de entrada
    match request.sort {
      SortOrder::Descending => selected.sort_by(|a, b| b.avg_rating.total_cmp(&a.avg_rating)),
      SortOrder::Ascending => selected.sort_by(|a, b| a.avg_rating.total_cmp(&b.avg_rating)),
    }

    selected
      .into_iter()
      .enumerate()
      .map(|(i, artist)| {
        let rank = i + 1;
        RankedEntry {
          artist: artist.clone(),
          rank,
          badge: Badge::for_rank(rank),
          trend_points: self.trend_series(&artist.id, artist.avg_rating, index),
        }
      })
      .collect()
  }

  /// Pasada completa: vista general, vista por género y selector de géneros.
  ///
  /// Si no hay género elegido se toma el primero alfabéticamente; el
  /// snapshot devuelve el género efectivo en `selected_genre`.
  pub fn aggregate(
    &self,
    artists: &[ArtistSummary],
    index: &ReviewIndex,
    request: &AggregationRequest,
  ) -> LeaderboardSnapshot {
    let genres = derive_genre_list(artists);

    let selected_genre = match genres.first() {
      Some(first) if request.selected_genre.is_empty() => first.clone(),
      _ => request.selected_genre.clone(),
    };

    let genre = if selected_genre.is_empty() {
      Vec::new()
    } else {
      self.filter_and_rank(artists, index, request, &selected_genre)
    };

    LeaderboardSnapshot {
      overall: self.filter_and_rank(artists, index, request, ""),
      genre,
      genre_options: genres.iter().map(|g| GenreOption::new(g)).collect(),
      selected_genre,
      tab: request.tab,
      sort: request.sort,
    }
  }
}

fn flat_line(y: f64) -> Vec<TrendPoint> {
  vec![TrendPoint { x: 1, y }, TrendPoint { x: 2, y }]
}
