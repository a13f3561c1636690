use crate::error::{AnimsvgError, AnimsvgResult};

/// Immutable configuration for one synthesis pass.
///
/// Every settings change recomputes the animated document from scratch from
/// the normalized input; nothing is patched incrementally.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationSettings {
    /// Animation duration in seconds (> 0).
    pub duration: f64,
    /// Start delay in seconds (>= 0).
    pub delay: f64,
    /// Stroke width in px (> 0), stroke family only.
    pub stroke_width: f64,
    /// Stroke paint as a CSS color value.
    pub stroke_color: String,
    pub linecap: Linecap,
    pub style: StaggerStyle,
    pub kind: AnimationKind,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            duration: 2.0,
            delay: 0.0,
            stroke_width: 2.0,
            stroke_color: "#3b82f6".to_string(),
            linecap: Linecap::Round,
            style: StaggerStyle::Simultaneous,
            kind: AnimationKind::Stroke,
        }
    }
}

impl AnimationSettings {
    pub fn validate(&self) -> AnimsvgResult<()> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(AnimsvgError::animation("duration must be > 0 seconds"));
        }
        if !self.delay.is_finite() || self.delay < 0.0 {
            return Err(AnimsvgError::animation("delay must be >= 0 seconds"));
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(AnimsvgError::animation("stroke width must be > 0"));
        }
        if self.stroke_color.trim().is_empty() {
            return Err(AnimsvgError::animation("stroke color must be non-empty"));
        }
        Ok(())
    }

    /// One full playback cycle: active window plus a one-second tail. Drives
    /// the stylesheet renderer's auto-restart timer and preview replay.
    pub fn cycle_seconds(&self) -> f64 {
        self.duration + self.delay + 1.0
    }
}

/// The eight animation families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    Stroke,
    Typewriter,
    Fade,
    Scale,
    Slide,
    Bounce,
    Rotate,
    Spread,
}

/// Governs whether/how start times spread across elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StaggerStyle {
    Simultaneous,
    Sequential,
    /// Stroke family only: all paths collapse into one combined path.
    Continuous,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Linecap {
    Round,
    Butt,
    Square,
}

impl Linecap {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Round => "round",
            Self::Butt => "butt",
            Self::Square => "square",
        }
    }

    /// Round caps pair with round joins; everything else gets miter.
    pub fn linejoin(self) -> &'static str {
        match self {
            Self::Round => "round",
            Self::Butt | Self::Square => "miter",
        }
    }
}

/// Background theme for rasterized frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn background_rgba(self) -> [u8; 4] {
        match self {
            Self::Light => [255, 255, 255, 255],
            Self::Dark => [31, 41, 55, 255], // #1f2937
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_validate() {
        assert!(AnimationSettings::default().validate().is_ok());
    }

    #[test]
    fn validation_catches_bad_values() {
        let mut s = AnimationSettings::default();
        s.duration = 0.0;
        assert!(s.validate().is_err());

        let mut s = AnimationSettings::default();
        s.delay = -0.5;
        assert!(s.validate().is_err());

        let mut s = AnimationSettings::default();
        s.stroke_width = f64::NAN;
        assert!(s.validate().is_err());

        let mut s = AnimationSettings::default();
        s.stroke_color = "  ".to_string();
        assert!(s.validate().is_err());
    }

    #[test]
    fn settings_roundtrip_json() {
        let s = AnimationSettings {
            kind: AnimationKind::Spread,
            style: StaggerStyle::Sequential,
            ..AnimationSettings::default()
        };
        let json = serde_json::to_string(&s).unwrap();
        let back: AnimationSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn linecap_join_mapping() {
        assert_eq!(Linecap::Round.linejoin(), "round");
        assert_eq!(Linecap::Butt.linejoin(), "miter");
        assert_eq!(Linecap::Square.linejoin(), "miter");
    }
}
