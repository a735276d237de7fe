use serde::Deserialize;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "grassfield_config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{field} must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: f64,
    },
}

/// Parameters that determine a full rebuild of the field
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FieldConfig {
    pub width: f32,
    pub height: f32,
    pub blade_count: u32,
    pub wind_strength: f32,
    pub rotation_enabled: bool,
}

impl FieldConfig {
    pub fn new(width: f32, height: f32, blade_count: u32, wind_strength: f32) -> Self {
        Self {
            width,
            height,
            blade_count,
            wind_strength,
            rotation_enabled: false,
        }
    }

    #[cfg(test)]
    pub fn with_rotation(mut self, enabled: bool) -> Self {
        self.rotation_enabled = enabled;
        self
    }

    /// Boundary check; the generators themselves do not guard their input
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "width",
                expected: "a positive number",
                value: self.width as f64,
            });
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "height",
                expected: "a positive number",
                value: self.height as f64,
            });
        }
        if self.blade_count == 0 {
            return Err(ConfigError::OutOfRange {
                field: "blade_count",
                expected: "at least 1",
                value: 0.0,
            });
        }
        if !(0.0..=1.0).contains(&self.wind_strength) {
            return Err(ConfigError::OutOfRange {
                field: "wind_strength",
                expected: "within [0, 1]",
                value: self.wind_strength as f64,
            });
        }
        Ok(())
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
            blade_count: 589_945,
            wind_strength: 0.5,
            rotation_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnimationConfig {
    pub tick_interval_ms: u64,
    /// Fixed placement seed; random per run when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl AnimationConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            seed: None,
        }
    }
}

/// Slider ranges offered by the control surface
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControlLimits {
    pub min_size: f32,
    pub max_size: f32,
    pub min_blades: u32,
    pub max_blades: u32,
}

impl ControlLimits {
    pub fn size_range(&self) -> RangeInclusive<f32> {
        self.min_size..=self.max_size
    }

    pub fn blade_range(&self) -> RangeInclusive<u32> {
        self.min_blades..=self.max_blades
    }

    /// Ranges must be finite, non-empty and leave room for at least one blade
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_size.is_finite() && self.min_size > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "min_size",
                expected: "a positive number",
                value: self.min_size as f64,
            });
        }
        if !(self.max_size.is_finite() && self.max_size >= self.min_size) {
            return Err(ConfigError::OutOfRange {
                field: "max_size",
                expected: "a finite number not below min_size",
                value: self.max_size as f64,
            });
        }
        if self.min_blades == 0 {
            return Err(ConfigError::OutOfRange {
                field: "min_blades",
                expected: "at least 1",
                value: 0.0,
            });
        }
        if self.max_blades < self.min_blades {
            return Err(ConfigError::OutOfRange {
                field: "max_blades",
                expected: "not below min_blades",
                value: self.max_blades as f64,
            });
        }
        Ok(())
    }

    /// Pull every field of `config` into the allowed ranges.
    ///
    /// Expects limits that passed [`ControlLimits::validate`].
    pub fn clamp(&self, config: FieldConfig) -> FieldConfig {
        FieldConfig {
            width: config.width.clamp(self.min_size, self.max_size),
            height: config.height.clamp(self.min_size, self.max_size),
            blade_count: config.blade_count.clamp(self.min_blades, self.max_blades),
            wind_strength: config.wind_strength.clamp(0.0, 1.0),
            rotation_enabled: config.rotation_enabled,
        }
    }
}

impl Default for ControlLimits {
    fn default() -> Self {
        Self {
            min_size: 1.0,
            max_size: 100.0,
            min_blades: 1,
            max_blades: 1_000_000,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GrassGenConfig {
    #[serde(default)]
    pub field: FieldConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub controls: ControlLimits,
}

impl GrassGenConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: GrassGenConfig = toml::from_str(content)?;
        config.controls.validate()?;
        config.field.validate()?;
        Ok(config)
    }

    /// Load `path`, falling back to defaults when it is missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from_file(path) {
            Ok(config) => {
                log::info!("Loaded grass config from {}", path.display());
                config
            }
            Err(err) => {
                log::warn!("Using default grass config: {err}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults_match_control_panel() {
        let config = GrassGenConfig::default();

        assert_eq!(config.field.width, 100.0);
        assert_eq!(config.field.height, 100.0);
        assert_eq!(config.field.blade_count, 589_945);
        assert_eq!(config.field.wind_strength, 0.5);
        assert!(config.field.rotation_enabled);
        assert_eq!(config.animation.tick_interval(), Duration::from_millis(100));
        assert!(config.field.validate().is_ok());
    }

    #[test]
    fn test_parse_toml() {
        let config = GrassGenConfig::from_toml(
            r#"
            [field]
            width = 10.0
            height = 20.0
            blade_count = 5
            wind_strength = 0.25
            rotation_enabled = false

            [animation]
            tick_interval_ms = 50
            seed = 42
            "#,
        )
        .unwrap();

        assert_eq!(config.field, FieldConfig::new(10.0, 20.0, 5, 0.25));
        assert_eq!(config.animation.seed, Some(42));
        assert_eq!(config.animation.tick_interval_ms, 50);
        assert_eq!(config.controls.max_blades, 1_000_000);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = GrassGenConfig::from_toml("").unwrap();

        assert_eq!(config.field, FieldConfig::default());
        assert_eq!(config.animation.seed, None);
    }

    #[test]
    fn test_rejects_out_of_range_field() {
        let result = GrassGenConfig::from_toml(
            r#"
            [field]
            width = 10.0
            height = 10.0
            blade_count = 5
            wind_strength = 3.0
            rotation_enabled = false
            "#,
        );

        assert!(matches!(
            result,
            Err(ConfigError::OutOfRange {
                field: "wind_strength",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(matches!(
            GrassGenConfig::from_toml("[field\nwidth = "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = GrassGenConfig::load_from_file("does/not/exist.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[rstest]
    #[case(10.0, 10.0, 10, -0.1)]
    #[case(0.0, 10.0, 10, 0.5)]
    #[case(10.0, -1.0, 10, 0.5)]
    #[case(f32::NAN, 10.0, 10, 0.5)]
    #[case(10.0, 10.0, 0, 0.5)]
    fn test_validate_rejects(
        #[case] width: f32,
        #[case] height: f32,
        #[case] blade_count: u32,
        #[case] wind: f32,
    ) {
        let config = FieldConfig::new(width, height, blade_count, wind);
        assert!(config.validate().is_err());
    }

    #[rstest]
    #[case("min_size = 100.0\nmax_size = 1.0", "max_size")]
    #[case("min_blades = 10\nmax_blades = 5", "max_blades")]
    #[case("min_size = 0.0", "min_size")]
    #[case("min_size = nan", "min_size")]
    #[case("max_size = inf", "max_size")]
    #[case("min_blades = 0", "min_blades")]
    fn test_rejects_unusable_limits(#[case] controls: &str, #[case] expected: &str) {
        let result = GrassGenConfig::from_toml(&format!("[controls]\n{controls}"));

        match result {
            Err(ConfigError::OutOfRange { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected {expected} to be rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_default_limits_are_valid() {
        assert!(ControlLimits::default().validate().is_ok());
    }

    #[test]
    fn test_limits_clamp_into_range() {
        let limits = ControlLimits::default();
        let clamped = limits.clamp(FieldConfig::new(500.0, 0.0, 0, 2.0));

        assert_eq!(clamped.width, 100.0);
        assert_eq!(clamped.height, 1.0);
        assert_eq!(clamped.blade_count, 1);
        assert_eq!(clamped.wind_strength, 1.0);
        assert!(clamped.validate().is_ok());
    }
}
