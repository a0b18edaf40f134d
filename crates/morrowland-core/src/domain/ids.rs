use serde::{Deserialize, Serialize};
use std::fmt;

/// Identificador opaco de un artista.
///
/// El servicio OData lo expone como UUID (`Artists(<uuid>)`), pero el núcleo
/// no depende de ese formato: sólo lo usa para unir leaderboard y reviews.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtistId(String);

impl ArtistId {
  pub fn new(id: impl Into<String>) -> Self {
    ArtistId(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl From<&str> for ArtistId {
  fn from(s: &str) -> Self {
    ArtistId(s.to_owned())
  }
}

impl From<String> for ArtistId {
  fn from(s: String) -> Self {
    ArtistId(s)
  }
}

impl fmt::Display for ArtistId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}
