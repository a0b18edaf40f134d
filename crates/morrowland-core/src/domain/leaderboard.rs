use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::artist::ArtistSummary;

/// Distintivo decorativo del podio.
///
/// Depende únicamente del `rank` dentro de la vista actual; nunca es una
/// propiedad del artista.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Badge {
  Gold,
  Silver,
  Bronze,
  None,
}

impl Badge {
  pub fn for_rank(rank: usize) -> Self {
    match rank {
      1 => Badge::Gold,
      2 => Badge::Silver,
      3 => Badge::Bronze,
      _ => Badge::None,
    }
  }

  pub fn marker(&self) -> &'static str {
    match self {
      Badge::Gold => "🥇",
      Badge::Silver => "🥈",
      Badge::Bronze => "🥉",
      Badge::None => "",
    }
  }
}

impl fmt::Display for Badge {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.marker())
  }
}

/// Punto de la serie de tendencia: `x` es el índice (1-based) y `y` la media acumulada.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
  pub x: u32,
  pub y: f64,
}

/// Fila del leaderboard lista para pintar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
  #[serde(flatten)]
  pub artist: ArtistSummary,
  pub rank: usize,
  pub badge: Badge,
  pub trend_points: Vec<TrendPoint>,
}

/// Pestaña activa de la vista.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaderboardTab {
  #[default]
  Overall,
  Genre,
}

impl fmt::Display for LeaderboardTab {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      LeaderboardTab::Overall => f.write_str("overall"),
      LeaderboardTab::Genre => f.write_str("genre"),
    }
  }
}

/// Error producido cuando una cadena no puede convertirse en [`LeaderboardTab`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid tab: {input}")]
pub struct TabParseError {
  pub input: String,
}

impl FromStr for LeaderboardTab {
  type Err = TabParseError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "overall" => Ok(LeaderboardTab::Overall),
      "genre" => Ok(LeaderboardTab::Genre),
      _ => Err(TabParseError { input: s.to_string() }),
    }
  }
}

/// Dirección de ordenación por `avg_rating`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
  #[default]
  Descending,
  Ascending,
}

impl SortOrder {
  pub fn from_descending(descending: bool) -> Self {
    if descending { SortOrder::Descending } else { SortOrder::Ascending }
  }

  pub fn is_descending(&self) -> bool {
    matches!(self, SortOrder::Descending)
  }

  pub fn toggled(&self) -> Self {
    match self {
      SortOrder::Descending => SortOrder::Ascending,
      SortOrder::Ascending => SortOrder::Descending,
    }
  }
}

/// Opción del selector de géneros.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreOption {
  pub key: String,
  pub label: String,
}

impl GenreOption {
  pub fn new(genre: &str) -> Self {
    GenreOption { key: genre.to_string(), label: genre.to_string() }
  }
}

/// Todo lo que la capa de presentación necesita tras una recomputación.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardSnapshot {
  pub overall: Vec<RankedEntry>,
  pub genre: Vec<RankedEntry>,
  pub genre_options: Vec<GenreOption>,
  pub selected_genre: String,
  pub tab: LeaderboardTab,
  pub sort: SortOrder,
}

impl LeaderboardSnapshot {
  /// Vista correspondiente a la pestaña activa.
  pub fn active(&self) -> &[RankedEntry] {
    match self.tab {
      LeaderboardTab::Overall => &self.overall,
      LeaderboardTab::Genre => &self.genre,
    }
  }
}
