use std::{fs, path::PathBuf};

use chrono::Utc;

use crate::{
    error::Result,
    services::{
        bitmap::{packing, preview::encode_png},
        printer::{Justify, Printer},
    },
};

/// Printer stand-in for bench setups: text goes to the log, bitmaps to PNG files.
#[derive(Debug)]
pub struct PreviewPrinter {
    dir: PathBuf,
    line: String,
    sequence: u32,
    written: Vec<PathBuf>,
}

impl PreviewPrinter {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            line: String::new(),
            sequence: 0,
            written: Vec::new(),
        })
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn flush_line(&mut self) {
        if !self.line.is_empty() {
            tracing::info!(target: "receipt", line = %self.line);
            self.line.clear();
        }
    }
}

impl Printer for PreviewPrinter {
    fn print(&mut self, text: &str) -> Result<()> {
        for c in text.chars() {
            if c == '\n' {
                self.flush_line();
            } else {
                self.line.push(c);
            }
        }
        Ok(())
    }

    fn feed(&mut self, lines: u8) -> Result<()> {
        self.flush_line();
        tracing::debug!(target: "receipt", lines, "feed");
        Ok(())
    }

    fn justify(&mut self, justify: Justify) -> Result<()> {
        tracing::trace!(target: "receipt", ?justify, "justify");
        Ok(())
    }

    fn set_bold(&mut self, on: bool) -> Result<()> {
        tracing::trace!(target: "receipt", on, "bold");
        Ok(())
    }

    fn set_underline(&mut self, on: bool) -> Result<()> {
        tracing::trace!(target: "receipt", on, "underline");
        Ok(())
    }

    fn set_double_height(&mut self, on: bool) -> Result<()> {
        tracing::trace!(target: "receipt", on, "double height");
        Ok(())
    }

    fn set_double_width(&mut self, on: bool) -> Result<()> {
        tracing::trace!(target: "receipt", on, "double width");
        Ok(())
    }

    fn print_bitmap(&mut self, width: u32, height: u32, data: &[u8]) -> Result<()> {
        self.flush_line();

        let ink = packing::unpack(data, width as usize, height as usize)?;
        let png = encode_png(&ink, width, height)?;

        self.sequence += 1;
        let name = format!(
            "{}-{:04}.png",
            Utc::now().format("%Y%m%dT%H%M%S"),
            self.sequence
        );
        let path = self.dir.join(name);
        fs::write(&path, png)?;

        tracing::info!(target: "receipt", path = %path.display(), width, height, "bitmap");
        self.written.push(path);
        Ok(())
    }
}
