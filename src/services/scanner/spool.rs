use std::{
    collections::BTreeSet,
    fs, io,
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use crate::{
    config::ScannerConfig,
    error::{AppError, Result},
    services::scanner::{FrameBuffer, FrameGuard, FrameSource},
};

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Consumes image files dropped into a directory, oldest name first.
///
/// When the directory is empty it waits `idle` and yields an empty frame, the
/// same as a camera pointed at nothing. An entry that cannot be read is
/// dropped the same way; if it cannot be removed either, it is skipped from
/// then on. Only a spool directory that cannot be listed is a capture failure.
#[derive(Debug)]
pub struct SpoolDirSource {
    dir: PathBuf,
    idle: Duration,
    buffer: FrameBuffer,
    skipped: BTreeSet<PathBuf>,
}

impl SpoolDirSource {
    pub fn new(config: &ScannerConfig) -> Result<Self> {
        fs::create_dir_all(&config.spool_dir)?;
        Ok(Self {
            dir: config.spool_dir.clone(),
            idle: config.idle,
            buffer: FrameBuffer::new(),
            skipped: BTreeSet::new(),
        })
    }

    fn next_file(&self) -> Result<Option<PathBuf>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            AppError::CaptureFailed(format!("{}: {e}", self.dir.display()))
        })?;

        let mut candidates: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_ok_and(|kind| !kind.is_dir()))
            .map(|entry| entry.path())
            .filter(|path| is_image(path) && !self.skipped.contains(path))
            .collect();
        candidates.sort();
        Ok(candidates.into_iter().next())
    }

    fn take(&mut self, path: &Path) -> io::Result<Vec<u8>> {
        let bytes = fs::read(path);
        if let Err(error) = fs::remove_file(path) {
            tracing::warn!(
                error = %error,
                path = %path.display(),
                "Could not remove spooled frame, skipping it"
            );
            self.skipped.insert(path.to_path_buf());
        }
        bytes
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

impl FrameSource for SpoolDirSource {
    fn capture(&mut self) -> Result<Option<FrameGuard<'_>>> {
        let Some(path) = self.next_file()? else {
            thread::sleep(self.idle);
            return Ok(Some(self.buffer.guard()));
        };

        let loaded = match self.take(&path) {
            Ok(bytes) => self.buffer.load_image(&bytes),
            Err(error) => Err(error.into()),
        };

        if let Err(error) = loaded {
            tracing::warn!(error = %error, path = %path.display(), "Discarding unreadable frame");
            self.buffer.clear();
        }

        Ok(Some(self.buffer.guard()))
    }
}
