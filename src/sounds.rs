use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::error::ConfigError;

/// file extensions the player understands
const SOUND_EXTENSIONS: [&str; 2] = ["wav", "mp3"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sound {
    pub name: String,
    pub path: PathBuf,
}

impl fmt::Display for Sound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.path.display())
    }
}

/// the alarm melodies found in the sounds directory, sorted by name
#[derive(Debug, Clone)]
pub struct SoundLibrary {
    dir: PathBuf,
    sounds: Vec<Sound>,
}

impl SoundLibrary {
    /// lists the `.wav` and `.mp3` files of `dir`, a missing directory is an empty library
    ///
    /// # Errors
    /// if the directory exists but can't be read
    pub fn scan(dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let dir = dir.into();
        if !dir.exists() {
            log::debug!("sounds directory {} does not exist", dir.display());
            return Ok(Self {
                dir,
                sounds: vec![],
            });
        }
        let entries = std::fs::read_dir(&dir).map_err(|e| ConfigError::io(&dir, e))?;
        let mut sounds: Vec<Sound> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_sound_file(path))
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?.to_string();
                Some(Sound { name, path })
            })
            .collect();
        sounds.sort_by_key(|sound| sound.name.to_lowercase());
        Ok(Self { dir, sounds })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn sounds(&self) -> &[Sound] {
        &self.sounds
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Sound> {
        self.sounds.iter().find(|sound| sound.name == name)
    }

    /// path to play for `name`, falls back to where the file would be
    /// so the player can report it missing
    #[must_use]
    pub fn resolve(&self, name: &str) -> PathBuf {
        self.find(name)
            .map_or_else(|| self.dir.join(name), |sound| sound.path.clone())
    }
}

fn is_sound_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SOUND_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_lists_sounds_sorted_by_name() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["rain.mp3", "Beep.WAV", "alarm.wav", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        std::fs::create_dir(dir.path().join("more.wav")).unwrap();

        let library = SoundLibrary::scan(dir.path()).unwrap();
        let names: Vec<&str> = library.sounds().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["alarm.wav", "Beep.WAV", "rain.mp3"]);
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let library = SoundLibrary::scan(dir.path().join("nope")).unwrap();
        assert!(library.sounds().is_empty());
    }

    #[test]
    fn resolve_falls_back_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("alarm.wav"), b"").unwrap();
        let library = SoundLibrary::scan(dir.path()).unwrap();
        assert_eq!(library.resolve("alarm.wav"), dir.path().join("alarm.wav"));
        assert_eq!(library.resolve("gone.mp3"), dir.path().join("gone.mp3"));
        assert!(library.find("gone.mp3").is_none());
    }
}
