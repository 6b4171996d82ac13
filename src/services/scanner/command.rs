use std::process::Command;

use crate::{
    config::ScannerConfig,
    error::{AppError, Result},
    services::scanner::{FrameBuffer, FrameGuard, FrameSource},
};

/// Runs a still-capture command per frame and decodes the image on its stdout,
/// e.g. `libcamera-still -n -t 1 -e png -o -`.
#[derive(Debug)]
pub struct CommandSource {
    command: String,
    buffer: FrameBuffer,
}

impl CommandSource {
    pub fn new(config: &ScannerConfig) -> Result<Self> {
        let command = config.capture_command.clone().ok_or_else(|| {
            AppError::InvalidConfig("SCANNER_CAPTURE_COMMAND is required".into())
        })?;

        Ok(Self {
            command,
            buffer: FrameBuffer::new(),
        })
    }
}

impl FrameSource for CommandSource {
    fn capture(&mut self) -> Result<Option<FrameGuard<'_>>> {
        let output = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .output()
            .map_err(|e| AppError::CaptureFailed(format!("{}: {e}", self.command)))?;

        if !output.status.success() {
            return Err(AppError::CaptureFailed(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        if let Err(error) = self.buffer.load_image(&output.stdout) {
            tracing::warn!(error = %error, "Capture command produced no readable image");
            self.buffer.clear();
        }

        Ok(Some(self.buffer.guard()))
    }
}
