use crate::error::SkyError;
use crate::sky::surface::TextAlign;
use serde::{Deserialize, Serialize};

/// Tunables for the sky renderer. Defaults reproduce the stock look.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyConfig {
    pub star_count: usize,
    /// Half-open `[min, max)` range for star radii in pixels.
    pub star_radius: [f64; 2],
    /// Half-open `[min, max)` range for base brightness.
    pub star_brightness: [f64; 2],
    /// Radians of twinkle phase per millisecond of wall clock.
    pub twinkle_rate: f64,
    /// Radians of twinkle phase per pixel of horizontal position.
    pub twinkle_phase: f64,
    /// Opacity of the black wash painted over the previous frame.
    pub fade_alpha: f64,
    /// Planet rotation per rendered frame, in radians.
    pub rotation_step: f64,
    /// Fixed ring tilt applied on top of the planet rotation, in radians.
    pub ring_tilt: f64,
    pub watermark: WatermarkConfig,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            star_count: 250,
            star_radius: [0.5, 2.3],
            star_brightness: [0.6, 1.0],
            twinkle_rate: 0.002,
            twinkle_phase: 0.01,
            fade_alpha: 0.07,
            // ~(2 * PI) / (75 s * 60 fps)
            rotation_step: 0.00023,
            ring_tilt: 0.436,
            watermark: WatermarkConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkConfig {
    pub text: String,
    /// Font size as a fraction of viewport width.
    pub font_scale: f64,
    pub font_family: String,
    /// RGBA, alpha in `[0, 1]`.
    pub color: [f64; 4],
    pub align: TextAlign,
    /// Anchor as a fraction of viewport width; `align` is relative to it.
    pub x_ratio: f64,
    /// Baseline height as a fraction of viewport height.
    pub y_ratio: f64,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            text: "M".to_string(),
            font_scale: 0.18,
            font_family: "Georgia".to_string(),
            color: [180.0, 140.0, 255.0, 0.07],
            align: TextAlign::Center,
            x_ratio: 0.5,
            y_ratio: 0.28,
        }
    }
}

impl SkyConfig {
    pub fn from_json(json: &str) -> Result<Self, SkyError> {
        let config: SkyConfig = serde_json::from_str(json).map_err(SkyError::ConfigParse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SkyError> {
        check_range("star_radius", self.star_radius)?;
        check_range("star_brightness", self.star_brightness)?;
        if self.star_radius[0] < 0.0 {
            return Err(SkyError::InvalidConfig(
                "star_radius must not be negative".to_string(),
            ));
        }

        let scalars = [
            ("twinkle_rate", self.twinkle_rate),
            ("twinkle_phase", self.twinkle_phase),
            ("rotation_step", self.rotation_step),
            ("ring_tilt", self.ring_tilt),
            ("watermark.font_scale", self.watermark.font_scale),
            ("watermark.x_ratio", self.watermark.x_ratio),
            ("watermark.y_ratio", self.watermark.y_ratio),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(SkyError::InvalidConfig(format!("{name} must be finite")));
            }
        }
        if self.rotation_step < 0.0 {
            return Err(SkyError::InvalidConfig(
                "rotation_step must not be negative".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.fade_alpha) {
            return Err(SkyError::InvalidConfig(format!(
                "fade_alpha {} outside [0, 1]",
                self.fade_alpha
            )));
        }
        if !(0.0..=1.0).contains(&self.watermark.color[3]) {
            return Err(SkyError::InvalidConfig(
                "watermark alpha outside [0, 1]".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_range(name: &str, [min, max]: [f64; 2]) -> Result<(), SkyError> {
    if !min.is_finite() || !max.is_finite() {
        return Err(SkyError::InvalidConfig(format!("{name} must be finite")));
    }
    // gen_range panics on an empty range
    if min >= max {
        return Err(SkyError::InvalidConfig(format!(
            "{name} range [{min}, {max}) is empty"
        )));
    }
    Ok(())
}
