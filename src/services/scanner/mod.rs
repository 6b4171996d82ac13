use std::ops::Deref;

use crate::error::{AppError, Result};

pub mod command;
pub mod spool;

pub use command::CommandSource;
pub use spool::SpoolDirSource;

/// Reusable 8-bit grayscale frame storage owned by a frame source.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    luma: Vec<u8>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes an encoded image (PNG, JPEG) into the buffer.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<()> {
        let image = image::load_from_memory(bytes)?.into_luma8();
        self.width = image.width();
        self.height = image.height();
        self.luma.clear();
        self.luma.extend_from_slice(image.as_raw());
        Ok(())
    }

    pub fn fill(&mut self, width: u32, height: u32, luma: &[u8]) -> Result<()> {
        if luma.len() != (width as usize) * (height as usize) {
            return Err(AppError::CaptureFailed(format!(
                "frame of {width}x{height} needs {} bytes, got {}",
                (width as usize) * (height as usize),
                luma.len()
            )));
        }
        self.width = width;
        self.height = height;
        self.luma.clear();
        self.luma.extend_from_slice(luma);
        Ok(())
    }

    /// Drops the frame contents but keeps the allocation for the next capture.
    pub fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
        self.luma.clear();
    }

    pub fn guard(&mut self) -> FrameGuard<'_> {
        FrameGuard { buffer: self }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn luma(&self) -> &[u8] {
        &self.luma
    }

    pub fn is_empty(&self) -> bool {
        self.luma.is_empty()
    }
}

/// Borrowed view of the current frame; the buffer is cleared when it drops,
/// so a frame can never outlive the iteration that captured it.
#[derive(Debug)]
pub struct FrameGuard<'a> {
    buffer: &'a mut FrameBuffer,
}

impl Deref for FrameGuard<'_> {
    type Target = FrameBuffer;

    fn deref(&self) -> &FrameBuffer {
        &*self.buffer
    }
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        self.buffer.clear();
    }
}

/// Blocking camera-like source. `Ok(None)` means the source is exhausted.
pub trait FrameSource {
    fn capture(&mut self) -> Result<Option<FrameGuard<'_>>>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn capture(&mut self) -> Result<Option<FrameGuard<'_>>> {
        (**self).capture()
    }
}

pub trait QrDecoder {
    fn decode(&mut self, frame: &FrameBuffer) -> Result<Option<String>>;
}

impl<D: QrDecoder + ?Sized> QrDecoder for Box<D> {
    fn decode(&mut self, frame: &FrameBuffer) -> Result<Option<String>> {
        (**self).decode(frame)
    }
}

/// Finds QR grids with `rqrr` and returns the first one that decodes.
#[derive(Debug, Default)]
pub struct RqrrDecoder;

impl QrDecoder for RqrrDecoder {
    fn decode(&mut self, frame: &FrameBuffer) -> Result<Option<String>> {
        if frame.is_empty() {
            return Ok(None);
        }

        let width = frame.width() as usize;
        let luma = frame.luma();
        let mut prepared =
            rqrr::PreparedImage::prepare_from_greyscale(width, frame.height() as usize, |x, y| {
                luma[y * width + x]
            });

        for grid in prepared.detect_grids() {
            match grid.decode() {
                Ok((_, content)) => return Ok(Some(content)),
                Err(error) => tracing::debug!(error = ?error, "Skipping undecodable QR grid"),
            }
        }

        Ok(None)
    }
}
