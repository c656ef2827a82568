//! Size-rotating line writer for the trace file.
//!
//! Before each write the current file size is checked; once it exceeds the
//! limit the file is renamed to `<name>.json.<unix_millis>` and a fresh file is
//! started. Only the newest backups are kept.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe appending writer with rotation.
///
/// The file is opened lazily on first write, so construction never fails.
pub struct FileWriter {
    file_path: PathBuf,
    max_file_size: u64,
    max_backups: usize,
    file: Mutex<Option<File>>,
}

impl FileWriter {
    pub const fn new(file_path: PathBuf) -> Self {
        Self::with_limits(file_path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    pub const fn with_limits(file_path: PathBuf, max_file_size: u64, max_backups: usize) -> Self {
        Self {
            file_path,
            max_file_size,
            max_backups,
            file: Mutex::new(None),
        }
    }

    /// Appends `line` plus a newline and flushes.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if rotating, opening or writing the file fails.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);

        if self.needs_rotation() {
            *file = None;
            self.rotate()?;
        }

        // A handle that failed a write is dropped and reopened next time.
        let mut handle = match file.take() {
            Some(handle) => handle,
            None => OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)?,
        };

        writeln!(handle, "{line}")?;
        handle.flush()?;
        *file = Some(handle);
        Ok(())
    }

    fn needs_rotation(&self) -> bool {
        fs::metadata(&self.file_path).is_ok_and(|metadata| metadata.len() > self.max_file_size)
    }

    fn rotate(&self) -> io::Result<()> {
        let stamp = chrono::Utc::now().timestamp_millis();
        let backup_path = self.file_path.with_extension(format!("json.{stamp}"));
        fs::rename(&self.file_path, backup_path)?;
        self.remove_old_backups()
    }

    fn remove_old_backups(&self) -> io::Result<()> {
        let parent = self.file_path.parent().unwrap_or_else(|| Path::new("."));
        let Some(prefix) = self
            .file_path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| format!("{name}."))
        else {
            return Ok(());
        };

        let mut backups: Vec<PathBuf> = fs::read_dir(parent)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(&prefix))
            })
            .collect();

        // Backup names end in a millisecond timestamp, newest sorts last.
        backups.sort();
        let excess = backups.len().saturating_sub(self.max_backups);
        for old in backups.iter().take(excess) {
            let _ = fs::remove_file(old);
        }

        Ok(())
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("file_path", &self.file_path)
            .field("max_file_size", &self.max_file_size)
            .field("max_backups", &self.max_backups)
            .finish_non_exhaustive()
    }
}
