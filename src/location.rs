//! Last requested path
//!
//! The playground remembers where the user was: the path of the last completed
//! request is written to a small file and used as the starting path next time.

use color_eyre::Result;
use std::fs;
use std::path::{Path, PathBuf};

const LOCATION_FILE: &str = "location";

#[derive(Debug, Clone)]
pub struct Location {
    file: PathBuf,
}

impl Location {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            file: dir.join(LOCATION_FILE),
        }
    }

    /// The stored path, if there is a usable one
    pub fn read(&self) -> Option<String> {
        let contents = fs::read_to_string(&self.file).ok()?;
        let path = contents.trim().trim_start_matches('#');
        path.starts_with('/').then(|| path.to_string())
    }

    pub fn write(&self, path: &str) -> Result<()> {
        fs::write(&self.file, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        assert_eq!(Location::in_dir(dir.path()).read(), None);
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let location = Location::in_dir(dir.path());

        location.write("/api/program/1/environments").unwrap();
        assert_eq!(
            location.read().as_deref(),
            Some("/api/program/1/environments")
        );
    }

    #[test]
    fn test_fragment_style_and_garbage() {
        let dir = tempdir().unwrap();
        let location = Location::in_dir(dir.path());

        fs::write(&location.file, "#/api/programs\n").unwrap();
        assert_eq!(location.read().as_deref(), Some("/api/programs"));

        fs::write(&location.file, "not a path").unwrap();
        assert_eq!(location.read(), None);
    }
}
