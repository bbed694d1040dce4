//! Logging setup: one fmt layer writing the same records to stdout and to a
//! size-rotated log file.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use tracing_subscriber::{
    fmt::writer::MakeWriterExt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
    Registry,
};

use crate::config::LogConfig;

/// Append-only log file that rotates once it reaches `max_bytes`.
///
/// Rotation shifts `bot.log.1` to `bot.log.2` and so on, drops the oldest
/// file beyond `backups`, then moves the active file to `bot.log.1`.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    backups: usize,
    file: File,
    written: u64,
}

impl RotatingFile {
    /// Open (or create) the active log file in append mode
    pub fn open(path: impl AsRef<Path>, max_bytes: u64, backups: usize) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = Self::open_active(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            path,
            max_bytes,
            backups,
            file,
            written,
        })
    }

    fn open_active(path: &Path) -> io::Result<File> {
        OpenOptions::new().create(true).append(true).open(path)
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        if self.backups == 0 {
            let file = File::create(&self.path)?;
            self.file = file;
            self.written = 0;
            return Ok(());
        }

        let oldest = self.backup_path(self.backups);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.backups).rev() {
            let from = self.backup_path(index);
            if from.exists() {
                fs::rename(&from, self.backup_path(index + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1))?;

        let opened = Self::open_active(&self.path);
        self.replace_active(opened)
    }

    /// Swap in the freshly opened active file. On failure the rotated file is
    /// moved back so the current handle keeps writing to `path`.
    fn replace_active(&mut self, opened: io::Result<File>) -> io::Result<()> {
        match opened {
            Ok(file) => {
                self.file = file;
                self.written = 0;
                Ok(())
            }
            Err(e) => {
                fs::rename(self.backup_path(1), &self.path)?;
                Err(e)
            }
        }
    }
}

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.max_bytes > 0 && self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Initialize the global tracing subscriber.
///
/// Level comes from `RUST_LOG` (default `info`). Load `.env` before calling
/// this or `RUST_LOG` from the file is ignored.
pub fn init_tracing(config: &LogConfig) -> Result<()> {
    let file = RotatingFile::open(&config.file_path, config.max_bytes, config.backups)?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let writer = io::stdout.and(Mutex::new(file));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    Registry::default()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_appends_below_limit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bot.log");

        let mut file = RotatingFile::open(&path, 1024, 3).unwrap();
        file.write_all(b"first line\n").unwrap();
        file.write_all(b"second line\n").unwrap();
        file.flush().unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first line\nsecond line\n");
        assert!(!dir.path().join("bot.log.1").exists());
    }

    #[test]
    fn test_rotates_when_full() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bot.log");

        let mut file = RotatingFile::open(&path, 10, 3).unwrap();
        file.write_all(b"aaaaaaaa\n").unwrap();
        file.write_all(b"bbbbbbbb\n").unwrap();
        file.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "bbbbbbbb\n");
        assert_eq!(
            fs::read_to_string(dir.path().join("bot.log.1")).unwrap(),
            "aaaaaaaa\n"
        );
    }

    #[test]
    fn test_keeps_only_configured_backups() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bot.log");

        let mut file = RotatingFile::open(&path, 4, 2).unwrap();
        for line in ["one\n", "two\n", "tri\n", "for\n"] {
            file.write_all(line.as_bytes()).unwrap();
        }
        file.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "for\n");
        assert_eq!(fs::read_to_string(dir.path().join("bot.log.1")).unwrap(), "tri\n");
        assert_eq!(fs::read_to_string(dir.path().join("bot.log.2")).unwrap(), "two\n");
        assert!(!dir.path().join("bot.log.3").exists());
    }

    #[test]
    fn test_failed_reopen_keeps_writing_to_active_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bot.log");

        let mut file = RotatingFile::open(&path, 1024, 2).unwrap();
        file.write_all(b"before\n").unwrap();

        fs::rename(&path, dir.path().join("bot.log.1")).unwrap();
        let err = file
            .replace_active(Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);

        file.write_all(b"after\n").unwrap();
        file.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "before\nafter\n");
        assert!(!dir.path().join("bot.log.1").exists());
    }

    #[test]
    fn test_writes_after_rotation_leave_backup_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bot.log");

        let mut file = RotatingFile::open(&path, 10, 1).unwrap();
        file.write_all(b"aaaaaaaa\n").unwrap();
        file.write_all(b"bb\n").unwrap();
        file.write_all(b"cc\n").unwrap();
        file.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "bb\ncc\n");
        assert_eq!(
            fs::read_to_string(dir.path().join("bot.log.1")).unwrap(),
            "aaaaaaaa\n"
        );
    }

    #[test]
    fn test_reopen_counts_existing_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bot.log");
        fs::write(&path, "previous run\n").unwrap();

        let mut file = RotatingFile::open(&path, 16, 1).unwrap();
        file.write_all(b"new run\n").unwrap();
        file.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new run\n");
        assert_eq!(
            fs::read_to_string(dir.path().join("bot.log.1")).unwrap(),
            "previous run\n"
        );
    }
}
