use crate::error::{SegmentError, SegmentResult};
use crate::unwrap::DEFAULT_DISCONT;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters of the square-wave segmenter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquareConfig {
    /// Samples strictly above this voltage belong to an excursion.
    pub threshold: f64,
}

impl Default for SquareConfig {
    fn default() -> Self {
        Self { threshold: 0.09 }
    }
}

impl SquareConfig {
    pub fn validate(&self) -> SegmentResult<()> {
        if !self.threshold.is_finite() {
            return Err(SegmentError::InvalidConfig(format!(
                "square threshold must be finite, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Parameters of the triangle-wave segmenter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriangleConfig {
    /// Voltage below which a half cycle ends (ramp bottom).
    pub lower_threshold: f64,
    /// Voltage above which a half cycle ends (ramp top).
    pub upper_threshold: f64,
    /// Full width of the band around the midpoint voltage.
    pub midpoint_window_width: f64,
    /// Minimum consecutive in-band samples for a genuine midpoint crossing.
    pub midpoint_window_min_len: usize,
}

impl Default for TriangleConfig {
    fn default() -> Self {
        Self {
            lower_threshold: 0.1,
            upper_threshold: 9.9,
            midpoint_window_width: 1.0,
            midpoint_window_min_len: 3,
        }
    }
}

impl TriangleConfig {
    pub fn validate(&self) -> SegmentResult<()> {
        if !(self.lower_threshold.is_finite() && self.upper_threshold.is_finite()) {
            return Err(SegmentError::InvalidConfig(
                "triangle thresholds must be finite".into(),
            ));
        }
        if self.lower_threshold > self.upper_threshold {
            return Err(SegmentError::InvalidConfig(format!(
                "lower_threshold {} exceeds upper_threshold {}",
                self.lower_threshold, self.upper_threshold
            )));
        }
        if !(self.midpoint_window_width.is_finite() && self.midpoint_window_width > 0.0) {
            return Err(SegmentError::InvalidConfig(format!(
                "midpoint_window_width must be positive, got {}",
                self.midpoint_window_width
            )));
        }
        Ok(())
    }

    /// Replace the thresholds with ones placed `fraction` of the voltage range
    /// inside the trace extrema, see [`crate::analysis::auto_thresholds`].
    pub fn with_auto_thresholds(mut self, volt: &[f64], fraction: f64) -> Self {
        if let Some((lower, upper)) = crate::analysis::auto_thresholds(volt, fraction) {
            self.lower_threshold = lower;
            self.upper_threshold = upper;
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnwrapConfig {
    /// Wrap-around jump magnitude of the sensor.
    pub discont: f64,
}

impl Default for UnwrapConfig {
    fn default() -> Self {
        Self {
            discont: DEFAULT_DISCONT,
        }
    }
}

impl UnwrapConfig {
    pub fn validate(&self) -> SegmentResult<()> {
        if !(self.discont.is_finite() && self.discont > 0.0) {
            return Err(SegmentError::InvalidConfig(format!(
                "discont must be positive, got {}",
                self.discont
            )));
        }
        Ok(())
    }
}

/// File-level configuration. Every section is optional.
///
/// ```toml
/// [square]
/// threshold = 0.5
///
/// [triangle]
/// lower_threshold = 0.2
/// upper_threshold = 9.8
///
/// [unwrap]
/// discont = 10.0
/// ```
///
/// An `[unwrap]` section turns unwrapping on before segmentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub square: SquareConfig,
    pub triangle: TriangleConfig,
    pub unwrap: Option<UnwrapConfig>,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(text).context("parsing segmentation config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    pub fn validate(&self) -> SegmentResult<()> {
        self.square.validate()?;
        self.triangle.validate()?;
        if let Some(unwrap) = &self.unwrap {
            unwrap.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_historic_values() {
        let cfg = Config::default();
        assert_eq!(cfg.square.threshold, 0.09);
        assert_eq!(cfg.triangle.lower_threshold, 0.1);
        assert_eq!(cfg.triangle.upper_threshold, 9.9);
        assert_eq!(cfg.triangle.midpoint_window_width, 1.0);
        assert_eq!(cfg.triangle.midpoint_window_min_len, 3);
        assert!(cfg.unwrap.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = Config::from_toml_str(
            r#"
            [triangle]
            upper_threshold = 4.5

            [unwrap]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.triangle.upper_threshold, 4.5);
        assert_eq!(cfg.triangle.lower_threshold, 0.1);
        assert_eq!(cfg.square, SquareConfig::default());
        assert_eq!(cfg.unwrap.map(|u| u.discont), Some(10.0));
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let err = Config::from_toml_str(
            r#"
            [triangle]
            lower_threshold = 5.0
            upper_threshold = 1.0
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("lower_threshold"));
    }

    #[test]
    fn rejects_zero_discont() {
        let cfg = UnwrapConfig { discont: 0.0 };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[square]\nthreshold = 0.5").unwrap();
        let cfg = Config::load(file.path()).unwrap();
        assert_eq!(cfg.square.threshold, 0.5);
    }
}
