// crates/morrowland-core/src/errors.rs
use thiserror::Error;

/// Error genérico del núcleo del leaderboard.
///
/// Las capas superiores (CLI, etc.) deberían mapear este error
/// a mensajes de usuario o logs.
#[derive(Debug, Error)]
pub enum CoreError {
  /// Falló alguna de las dos lecturas del par (artistas / reviews).
  #[error("source error: {0}")]
  Source(String),

  /// Un refresh más reciente empezó mientras este estaba en vuelo.
  #[error("refresh #{generation} superseded by #{latest}")]
  Superseded { generation: u64, latest: u64 },
}
