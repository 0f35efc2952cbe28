//! Angular placement of states and clusters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Angular placement relative to the parent's axis.
///
/// A `Centered` element sits on the axis with no angular offset.
/// An `Angle` is measured in degrees and always normalized to `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Position {
    /// On the parent's axis.
    Centered,
    /// On the rim, at the given angle in degrees.
    Angle(f64),
}

impl Position {
    /// Create a rim position, normalizing the angle to `[0, 360)`.
    pub fn angle(degrees: f64) -> Self {
        Self::Angle(normalize_degrees(degrees))
    }

    /// Whether this is the centered placement.
    pub fn is_centered(&self) -> bool {
        matches!(self, Self::Centered)
    }

    /// Angle in degrees, if on the rim.
    pub fn degrees(&self) -> Option<f64> {
        match self {
            Self::Centered => None,
            Self::Angle(deg) => Some(*deg),
        }
    }

    /// Unit direction vector `(x, y)`, if on the rim.
    pub fn unit_vector(&self) -> Option<(f64, f64)> {
        self.degrees().map(|deg| {
            let rad = deg.to_radians();
            (rad.cos(), rad.sin())
        })
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::Centered
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Centered => write!(f, "centered"),
            Self::Angle(deg) => write!(f, "{deg:.2}°"),
        }
    }
}

/// Normalize an angle in degrees to `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let r = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Angle of a direction vector in degrees, normalized to `[0, 360)`.
pub fn vector_to_degrees(x: f64, y: f64) -> f64 {
    normalize_degrees(y.atan2(x).to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(450.0), 90.0);
        assert!(normalize_degrees(-1e-18) < 360.0);
    }

    #[test]
    fn test_vector_to_degrees() {
        assert!((vector_to_degrees(1.0, 0.0) - 0.0).abs() < 1e-9);
        assert!((vector_to_degrees(0.0, 1.0) - 90.0).abs() < 1e-9);
        assert!((vector_to_degrees(-1.0, 0.0) - 180.0).abs() < 1e-9);
        assert!((vector_to_degrees(0.0, -1.0) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_centered_has_no_vector() {
        assert!(Position::Centered.unit_vector().is_none());
        assert!(Position::Centered.is_centered());

        let (x, y) = Position::angle(90.0).unit_vector().unwrap();
        assert!(x.abs() < 1e-9);
        assert!((y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_angle_constructor_normalizes() {
        assert_eq!(Position::angle(-120.0), Position::Angle(240.0));
        assert_eq!(Position::angle(720.0).degrees(), Some(0.0));
    }
}
