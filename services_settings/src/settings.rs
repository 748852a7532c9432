//! The settings snapshot

use serde::{Deserialize, Serialize};

/// How the two emulated screens are arranged on the host window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenLayout {
    /// Both screens, stacked
    Default,
    /// One screen fills the window
    SingleScreen,
    /// One screen large, the other small beside it
    LargeScreen,
}

/// Internal-resolution scale, restricted to a fixed discrete set.
///
/// `Auto` means "match the host window" and maps to factor 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionFactor {
    Auto,
    Scale1x,
    Scale1_5x,
    Scale2x,
    Scale2_5x,
    Scale3x,
    Scale4x,
    Scale5x,
    Scale6x,
    Scale7x,
    Scale8x,
}

impl ResolutionFactor {
    const SCALES: [(ResolutionFactor, f32); 10] = [
        (Self::Scale1x, 1.0),
        (Self::Scale1_5x, 1.5),
        (Self::Scale2x, 2.0),
        (Self::Scale2_5x, 2.5),
        (Self::Scale3x, 3.0),
        (Self::Scale4x, 4.0),
        (Self::Scale5x, 5.0),
        (Self::Scale6x, 6.0),
        (Self::Scale7x, 7.0),
        (Self::Scale8x, 8.0),
    ];

    /// The numeric scale factor; 0 for Auto
    pub fn to_factor(self) -> f32 {
        match self {
            Self::Auto => 0.0,
            other => Self::SCALES
                .iter()
                .find(|(member, _)| *member == other)
                .map(|(_, factor)| *factor)
                .unwrap_or(0.0),
        }
    }

    /// Maps a float back into the discrete set.
    ///
    /// Non-positive factors mean Auto; anything else clamps to the
    /// nearest member, ties resolving to the smaller scale.
    pub fn from_factor(factor: f32) -> Self {
        if factor <= 0.0 {
            return Self::Auto;
        }
        let mut best = Self::Scale1x;
        let mut best_distance = f32::INFINITY;
        for (member, scale) in Self::SCALES {
            let distance = (factor - scale).abs();
            if distance < best_distance {
                best = member;
                best_distance = distance;
            }
        }
        best
    }
}

/// A read-only snapshot of the configuration surface the core consumes.
///
/// The UI owns the values and edits its own copy; the core only ever
/// reads a snapshot and watches for the apply notification. Field
/// defaults match a fresh installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Audio output sink, "auto" picks the best available
    pub sink_id: String,
    /// Audio output device within the sink, "auto" picks the default
    pub audio_device_id: String,
    pub use_audio_stretching: bool,
    pub use_vsync: bool,
    pub use_frame_limit: bool,
    pub use_hardware_renderer: bool,
    pub use_shader_jit: bool,
    pub use_scaled_resolution: bool,
    pub screen_layout: ScreenLayout,
    pub resolution_factor: ResolutionFactor,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sink_id: "auto".to_string(),
            audio_device_id: "auto".to_string(),
            use_audio_stretching: true,
            use_vsync: false,
            use_frame_limit: true,
            use_hardware_renderer: true,
            use_shader_jit: true,
            use_scaled_resolution: false,
            screen_layout: ScreenLayout::Default,
            resolution_factor: ResolutionFactor::Auto,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.sink_id, "auto");
        assert_eq!(settings.audio_device_id, "auto");
        assert!(settings.use_audio_stretching);
        assert!(!settings.use_vsync);
        assert_eq!(settings.screen_layout, ScreenLayout::Default);
        assert_eq!(settings.resolution_factor, ResolutionFactor::Auto);
    }

    #[test]
    fn test_factor_set_closed_under_round_trip() {
        let members = [
            ResolutionFactor::Auto,
            ResolutionFactor::Scale1x,
            ResolutionFactor::Scale1_5x,
            ResolutionFactor::Scale2x,
            ResolutionFactor::Scale2_5x,
            ResolutionFactor::Scale3x,
            ResolutionFactor::Scale4x,
            ResolutionFactor::Scale5x,
            ResolutionFactor::Scale6x,
            ResolutionFactor::Scale7x,
            ResolutionFactor::Scale8x,
        ];
        for member in members {
            assert_eq!(ResolutionFactor::from_factor(member.to_factor()), member);
        }
    }

    #[test]
    fn test_from_factor_clamps_to_nearest_member() {
        assert_eq!(
            ResolutionFactor::from_factor(1.6),
            ResolutionFactor::Scale1_5x
        );
        assert_eq!(
            ResolutionFactor::from_factor(2.4),
            ResolutionFactor::Scale2_5x
        );
        assert_eq!(ResolutionFactor::from_factor(100.0), ResolutionFactor::Scale8x);
        assert_eq!(ResolutionFactor::from_factor(0.25), ResolutionFactor::Scale1x);
    }

    #[test]
    fn test_from_factor_non_positive_means_auto() {
        assert_eq!(ResolutionFactor::from_factor(0.0), ResolutionFactor::Auto);
        assert_eq!(ResolutionFactor::from_factor(-2.0), ResolutionFactor::Auto);
    }

    #[test]
    fn test_auto_factor_is_zero() {
        assert_eq!(ResolutionFactor::Auto.to_factor(), 0.0);
        assert_eq!(ResolutionFactor::Scale2_5x.to_factor(), 2.5);
    }
}
