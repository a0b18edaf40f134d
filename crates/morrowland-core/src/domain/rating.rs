use std::fmt;

/// Redondea a 2 decimales (formato de los puntos de tendencia).
pub fn round2(value: f64) -> f64 {
  (value * 100.0).round() / 100.0
}

/// Representación en estrellas de una media en la escala `[0.0, 5.0]`.
///
/// Valores fuera de rango (o `NaN`) se recortan; nunca falla al formatear.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stars(pub f64);

impl Stars {
  const MAX: usize = 5;

  fn full(&self) -> usize {
    if self.0.is_nan() {
      return 0;
    }
    // `floor` en vez de `round`: 4.9 → ★★★★☆, sólo 5.0 llega a ★★★★★.
    self.0.clamp(0.0, Self::MAX as f64).floor() as usize
  }
}

impl fmt::Display for Stars {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let full_stars = self.full();
    let empty_stars = Self::MAX - full_stars;

    for _ in 0..full_stars {
      write!(f, "★")?;
    }
    for _ in 0..empty_stars {
      write!(f, "☆")?;
    }

    Ok(())
  }
}
