//! Doodle layer configuration.

use crate::fade::FadeTiming;
use crate::host::{DEFAULT_FRAME_INTERVAL_MS, MIN_FRAME_INTERVAL_MS};
use crate::session::Palette;
use crate::stroke::InkColor;
use crate::surface::{DrawingSurface, LineCap, LineJoin};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Default ink line width.
pub const DEFAULT_LINE_WIDTH: f64 = 1.5;
/// Default glow blur radius at full opacity.
pub const DEFAULT_GLOW_BLUR: f64 = 3.0;

/// Stroke appearance shared by live capture and redraws.
///
/// These values stay constant regardless of zoom or device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InkStyle {
    pub line_width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    /// Glow blur radius at full opacity. Scaled by opacity while fading.
    pub glow_blur: f64,
}

impl InkStyle {
    /// Load this style into the surface context for `color` at `opacity`.
    ///
    /// The glow shrinks with opacity so a fading stroke loses its halo too.
    pub fn apply(&self, surface: &mut impl DrawingSurface, color: &InkColor, opacity: f64) {
        surface.set_alpha(opacity);
        surface.set_line_width(self.line_width);
        surface.set_line_cap(self.line_cap);
        surface.set_line_join(self.line_join);
        surface.set_stroke_color(color);
        surface.set_shadow_blur(self.glow_blur * opacity);
        surface.set_shadow_color(color);
    }
}

impl Default for InkStyle {
    fn default() -> Self {
        Self {
            line_width: DEFAULT_LINE_WIDTH,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            glow_blur: DEFAULT_GLOW_BLUR,
        }
    }
}

/// Full doodle layer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoodleConfig {
    /// Pre-fade delay and fade duration.
    pub fade: FadeTiming,
    /// Ink appearance.
    pub ink: InkStyle,
    /// Selectable colors; the first is selected initially.
    pub palette: Palette,
    /// Seed for the fade-delay generator.
    pub seed: u64,
    /// Frame interval of simulated hosts, in ms.
    pub frame_interval_ms: f64,
}

impl Default for DoodleConfig {
    fn default() -> Self {
        Self {
            fade: FadeTiming::default(),
            ink: InkStyle::default(),
            palette: Palette::default(),
            seed: 0x5EED_F00D,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
        }
    }
}

impl DoodleConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the invariants serde cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        let fade = &self.fade;
        if fade.min_delay_ms >= fade.max_delay_ms {
            return Err(ConfigError::Invalid(format!(
                "fade delay range is empty: [{}, {})",
                fade.min_delay_ms, fade.max_delay_ms
            )));
        }
        if fade.duration_ms <= 0.0 || !fade.duration_ms.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "fade duration must be positive, got {}",
                fade.duration_ms
            )));
        }
        if self.ink.line_width <= 0.0 {
            return Err(ConfigError::Invalid("line width must be positive".into()));
        }
        let interval = self.frame_interval_ms;
        if interval < MIN_FRAME_INTERVAL_MS || !interval.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "frame interval must be at least {} ms, got {}",
                MIN_FRAME_INTERVAL_MS, interval
            )));
        }
        if self.palette.is_empty() {
            return Err(ConfigError::Invalid("palette needs at least one color".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DoodleConfig::default();
        assert_eq!(config.fade.min_delay_ms, 7000);
        assert_eq!(config.fade.max_delay_ms, 9000);
        assert_eq!(config.fade.duration_ms, 1500.0);
        assert_eq!(config.ink.line_width, 1.5);
        assert_eq!(config.ink.glow_blur, 3.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_scales_glow() {
        use crate::surface::RecordingSurface;

        let mut surface = RecordingSurface::default();
        InkStyle::default().apply(&mut surface, &InkColor::new("#FF0000"), 0.5);
        let state = surface.state();
        assert_eq!(state.alpha, 0.5);
        assert_eq!(state.line_width, 1.5);
        assert_eq!(state.line_cap, LineCap::Round);
        assert_eq!(state.line_join, LineJoin::Round);
        assert_eq!(state.shadow_blur, 1.5);
        assert_eq!(state.shadow_color.as_str(), "#FF0000");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = DoodleConfig::from_json(r#"{ "seed": 7, "fade": { "duration_ms": 500.0 } }"#)
            .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.fade.duration_ms, 500.0);
        assert_eq!(config.fade.min_delay_ms, 7000);
        assert_eq!(config.ink, InkStyle::default());
    }

    #[test]
    fn test_round_trip() {
        let config = DoodleConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(DoodleConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_empty_delay_range() {
        let result = DoodleConfig::from_json(
            r#"{ "fade": { "min_delay_ms": 9000, "max_delay_ms": 9000 } }"#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_zero_frame_interval() {
        let result = DoodleConfig::from_json(r#"{ "frame_interval_ms": 0.0 }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_sub_millisecond_frame_interval() {
        for interval in ["1e-300", "0.5", "-15.0"] {
            let json = format!(r#"{{ "frame_interval_ms": {interval} }}"#);
            let result = DoodleConfig::from_json(&json);
            assert!(matches!(result, Err(ConfigError::Invalid(_))), "{interval}");
        }
        assert!(DoodleConfig::from_json(r#"{ "frame_interval_ms": 1.0 }"#).is_ok());
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(DoodleConfig::from_json("{"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = DoodleConfig::load("/nonexistent/fadeink.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
