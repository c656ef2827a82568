//! Path utilities for the data directory.
//!
//! Everything the application writes lives under one data directory: the JSON
//! photo repository (`photos.json`) and the OTLP trace export
//! (`locationstream-otlp.json`).

use std::path::{Path, PathBuf};

const APP_DIR: &str = "locationstream";
const PHOTOS_FILE: &str = "photos.json";
const TRACE_FILE: &str = "locationstream-otlp.json";

/// Returns the default data directory.
///
/// Resolves to the platform data directory (for example
/// `~/.local/share/locationstream` on Linux). Falls back to
/// `./.locationstream` when the platform reports none.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from(".").join(format!(".{APP_DIR}")),
        |dir| dir.join(APP_DIR),
    )
}

/// Location of the photo repository inside `data_dir`.
#[must_use]
pub fn photos_file(data_dir: &Path) -> PathBuf {
    data_dir.join(PHOTOS_FILE)
}

/// Location of the trace export inside `data_dir`.
#[must_use]
pub fn trace_file(data_dir: &Path) -> PathBuf {
    data_dir.join(TRACE_FILE)
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, and every path when no home directory is
/// known, are returned unchanged.
///
/// ```
/// use locationstream::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let Some(home) = dirs::home_dir() else {
        return PathBuf::from(path);
    };

    if path == "~" {
        home
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_ends_with_app_name() {
        let dir = get_data_dir();
        assert!(dir.ends_with("locationstream") || dir.ends_with(".locationstream"));
    }

    #[test]
    fn files_live_in_data_dir() {
        let dir = Path::new("/tmp/ls");
        assert_eq!(photos_file(dir), PathBuf::from("/tmp/ls/photos.json"));
        assert_eq!(trace_file(dir), PathBuf::from("/tmp/ls/locationstream-otlp.json"));
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/photos"), home.join("photos"));
            assert_eq!(expand_tilde("~"), home);
        }
        assert_eq!(expand_tilde("relative/dir"), PathBuf::from("relative/dir"));
    }
}
