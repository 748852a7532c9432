//! Snapshot persistence

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::settings::Settings;

/// Errors from loading or saving a settings snapshot
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("Settings file is malformed: {0}")]
    Format(#[from] serde_json::Error),
}

/// Loads a snapshot from disk; a missing file yields the defaults.
///
/// A file that exists but does not parse is an error, not a silent
/// reset, so a typo in a hand-edited file cannot wipe a configuration.
pub fn load_or_default(path: &Path) -> Result<Settings, SettingsError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(serde_json::from_str(&contents)?),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Settings::default()),
        Err(err) => Err(err.into()),
    }
}

/// Writes a snapshot to disk as pretty-printed JSON
pub fn save(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    let contents = serde_json::to_string_pretty(settings)?;
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{ResolutionFactor, ScreenLayout};

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_or_default(&dir.path().join("nonexistent.json")).unwrap();
        assert_eq!(loaded, Settings::default());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let settings = Settings {
            sink_id: "sdl2".to_string(),
            use_vsync: true,
            screen_layout: ScreenLayout::LargeScreen,
            resolution_factor: ResolutionFactor::Scale2_5x,
            ..Settings::default()
        };
        save(&path, &settings).unwrap();

        let loaded = load_or_default(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"use_vsync": true}"#).unwrap();

        let loaded = load_or_default(&path).unwrap();
        assert!(loaded.use_vsync);
        assert_eq!(loaded.sink_id, "auto");
        assert_eq!(loaded.resolution_factor, ResolutionFactor::Auto);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json at all").unwrap();

        assert!(matches!(
            load_or_default(&path),
            Err(SettingsError::Format(_))
        ));
    }
}
