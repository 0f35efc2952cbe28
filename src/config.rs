//! Layout configuration.
//!
//! ## Float Normalization for Deterministic Hashing
//!
//! Floats are quantized to integers before hashing so that `params_hash` is
//! stable across platforms and serializer settings. The quantization factor
//! is 1e6 (multiply by 1,000,000 and round to i64).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::canonical::fingerprint_hex;
use crate::DEFAULT_CONFIG_VERSION;

/// Quantization factor for float normalization.
const FLOAT_QUANTIZATION_FACTOR: f64 = 1_000_000.0;

/// Traversal policy used by the ranker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RankStyle {
    /// Follow transitions forward only.
    Iterative,
    /// Follow transitions in both directions.
    Cyclic,
}

impl RankStyle {
    /// Parse rank style from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "iterative" => Some(Self::Iterative),
            "cyclic" => Some(Self::Cyclic),
            _ => None,
        }
    }
}

impl Default for RankStyle {
    fn default() -> Self {
        Self::Iterative
    }
}

impl fmt::Display for RankStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iterative => write!(f, "iterative"),
            Self::Cyclic => write!(f, "cyclic"),
        }
    }
}

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Invalid config parameter '{name}': {value}")]
pub struct ConfigError {
    /// Offending field.
    pub name: &'static str,
    /// Offending value.
    pub value: f64,
}

/// Parameters of the layout pipeline.
///
/// ## Parameters
///
/// - `rank_style`: traversal policy of the ranker
/// - `state_radius`: radius of the disc a single state occupies
/// - `fill_ratio`: share of a cluster's top disc that its states may cover
/// - `direction_threshold`: minimum summed-vector length for a state to
///   take a rim angle (below it the state is centered)
/// - `volume_tolerance`: relative volume gap for a descendant to count as
///   uniquely largest or smallest
/// - `rim_gap`: clearance between a centered descendant and the rim ones
/// - `cone_height`: height of a cluster segment, used for frustum volumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Config version identifier.
    pub version: String,
    /// Ranking traversal policy.
    pub rank_style: RankStyle,
    /// Radius of one state disc.
    pub state_radius: f64,
    /// Maximum share of a top disc covered by states (0-1].
    pub fill_ratio: f64,
    /// Vector length below which a state is centered.
    pub direction_threshold: f64,
    /// Relative volume difference that makes a descendant unique.
    pub volume_tolerance: f64,
    /// Clearance added around a centered descendant.
    pub rim_gap: f64,
    /// Height of one rank segment.
    pub cone_height: f64,
}

impl LayoutConfig {
    /// Create a config with custom parameters.
    ///
    /// Ratios are clamped to their meaningful ranges.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        rank_style: RankStyle,
        state_radius: f64,
        fill_ratio: f64,
        direction_threshold: f64,
        volume_tolerance: f64,
        rim_gap: f64,
        cone_height: f64,
    ) -> Self {
        Self {
            version: DEFAULT_CONFIG_VERSION.to_string(),
            rank_style,
            state_radius,
            fill_ratio: fill_ratio.clamp(f64::EPSILON, 1.0),
            direction_threshold: direction_threshold.max(0.0),
            volume_tolerance: volume_tolerance.clamp(0.0, 1.0),
            rim_gap: rim_gap.max(0.0),
            cone_height,
        }
    }

    /// Same parameters with a different rank style.
    pub fn with_rank_style(mut self, rank_style: RankStyle) -> Self {
        self.rank_style = rank_style;
        self
    }

    /// Top radius of a cluster holding `state_count` states.
    ///
    /// With the defaults this is `sqrt(0.04 * state_count)`.
    pub fn top_radius(&self, state_count: usize) -> f64 {
        (state_count as f64 * self.state_radius * self.state_radius / self.fill_ratio).sqrt()
    }

    /// Reject values that would make the geometry meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("state_radius", self.state_radius),
            ("fill_ratio", self.fill_ratio),
            ("cone_height", self.cone_height),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError { name, value });
            }
        }

        let non_negative = [
            ("direction_threshold", self.direction_threshold),
            ("volume_tolerance", self.volume_tolerance),
            ("rim_gap", self.rim_gap),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError { name, value });
            }
        }

        if self.fill_ratio > 1.0 {
            return Err(ConfigError { name: "fill_ratio", value: self.fill_ratio });
        }
        Ok(())
    }

    /// Get the config ID.
    pub fn config_id(&self) -> &str {
        &self.version
    }

    /// Compute a hash of the parameters.
    ///
    /// Uses quantized float representation so identical settings hash
    /// identically regardless of float formatting.
    pub fn params_hash(&self) -> String {
        fingerprint_hex(&self.to_quantized())
    }

    fn to_quantized(&self) -> QuantizedConfig {
        QuantizedConfig {
            version: self.version.clone(),
            rank_style: self.rank_style,
            state_radius: quantize_float(self.state_radius),
            fill_ratio: quantize_float(self.fill_ratio),
            direction_threshold: quantize_float(self.direction_threshold),
            volume_tolerance: quantize_float(self.volume_tolerance),
            rim_gap: quantize_float(self.rim_gap),
            cone_height: quantize_float(self.cone_height),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_CONFIG_VERSION.to_string(),
            rank_style: RankStyle::Iterative,
            state_radius: 0.1,
            fill_ratio: 0.25,
            direction_threshold: 0.80,
            volume_tolerance: 0.01,
            rim_gap: 0.01,
            cone_height: 1.0,
        }
    }
}

/// Quantize a float to an i64 for deterministic hashing.
pub(crate) fn quantize_float(value: f64) -> i64 {
    (value * FLOAT_QUANTIZATION_FACTOR).round() as i64
}

/// Quantized parameters for deterministic hashing.
#[derive(Debug, Clone, Serialize)]
struct QuantizedConfig {
    version: String,
    rank_style: RankStyle,
    state_radius: i64,
    fill_ratio: i64,
    direction_threshold: i64,
    volume_tolerance: i64,
    rim_gap: i64,
    cone_height: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_top_radius() {
        let config = LayoutConfig::default();
        assert!((config.top_radius(1) - 0.2).abs() < 1e-12);
        assert!((config.top_radius(4) - 0.4).abs() < 1e-12);
        assert!((config.top_radius(25) - (0.04f64 * 25.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_params_hash_determinism() {
        let config1 = LayoutConfig::default();
        let config2 = LayoutConfig::default();

        assert_eq!(config1.params_hash(), config2.params_hash());
    }

    #[test]
    fn test_params_hash_changes() {
        let config1 = LayoutConfig::default();
        let config2 = LayoutConfig::default().with_rank_style(RankStyle::Cyclic);
        let mut config3 = LayoutConfig::default();
        config3.direction_threshold = 0.5;

        assert_ne!(config1.params_hash(), config2.params_hash());
        assert_ne!(config1.params_hash(), config3.params_hash());
    }

    #[test]
    fn test_validate() {
        assert!(LayoutConfig::default().validate().is_ok());

        let mut bad = LayoutConfig::default();
        bad.state_radius = 0.0;
        assert_eq!(bad.validate().unwrap_err().name, "state_radius");

        let mut bad = LayoutConfig::default();
        bad.rim_gap = f64::NAN;
        assert_eq!(bad.validate().unwrap_err().name, "rim_gap");
    }

    #[test]
    fn test_new_clamps_ratios() {
        let config = LayoutConfig::new(RankStyle::Cyclic, 0.1, 3.0, -1.0, 2.0, 0.01, 1.0);
        assert_eq!(config.fill_ratio, 1.0);
        assert_eq!(config.direction_threshold, 0.0);
        assert_eq!(config.volume_tolerance, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rank_style_parse() {
        assert_eq!(RankStyle::from_str("Cyclic"), Some(RankStyle::Cyclic));
        assert_eq!(RankStyle::from_str("iterative"), Some(RankStyle::Iterative));
        assert_eq!(RankStyle::from_str("spiral"), None);
        assert_eq!(RankStyle::Cyclic.to_string(), "cyclic");
    }
}
