use std::{
    fs::{File, OpenOptions},
    io::Write,
    thread,
    time::Duration,
};

use crate::{
    config::PrinterConfig,
    error::{AppError, Result},
    services::printer::{Justify, Printer},
};

const ESC: u8 = 27;
const DC2: u8 = 18;

const BOLD_MASK: u8 = 1 << 3;
const DOUBLE_HEIGHT_MASK: u8 = 1 << 4;
const DOUBLE_WIDTH_MASK: u8 = 1 << 5;

const MAX_ROW_BYTES: usize = 48;
const MAX_CHUNK_ROWS: usize = 255;
const CHAR_HEIGHT_DOTS: u32 = 24;

/// Delays that keep the printer's small input buffer from overflowing.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    pub byte: Duration,
    pub dot_print: Duration,
    pub dot_feed: Duration,
}

impl Pacing {
    pub fn for_baud_rate(baud_rate: u32) -> Self {
        let baud = u64::from(baud_rate.max(1));
        Self {
            // 11 bits per byte on the wire: start, 8 data, 2 stop.
            byte: Duration::from_micros((11 * 1_000_000 + baud / 2) / baud),
            dot_print: Duration::from_millis(30),
            dot_feed: Duration::from_micros(2100),
        }
    }

    pub fn none() -> Self {
        Self {
            byte: Duration::ZERO,
            dot_print: Duration::ZERO,
            dot_feed: Duration::ZERO,
        }
    }
}

/// ESC/POS receipt printer on any byte sink, usually the serial device.
#[derive(Debug)]
pub struct ThermalPrinter<W: Write> {
    out: W,
    print_mode: u8,
    pacing: Pacing,
    line_at_a_time: bool,
    heat_time: u8,
}

impl ThermalPrinter<File> {
    /// Opens the already-configured serial device for writing.
    pub fn open(config: &PrinterConfig) -> Result<Self> {
        let device = OpenOptions::new().write(true).open(&config.device)?;
        Ok(Self::new(
            device,
            Pacing::for_baud_rate(config.baud_rate),
            config.line_at_a_time,
            config.heat_time,
        ))
    }
}

impl<W: Write> ThermalPrinter<W> {
    pub fn new(out: W, pacing: Pacing, line_at_a_time: bool, heat_time: u8) -> Self {
        Self {
            out,
            print_mode: 0,
            pacing,
            line_at_a_time,
            heat_time,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.out.write_all(bytes)?;
        self.pause(self.pacing.byte * bytes.len() as u32);
        Ok(())
    }

    fn pause(&mut self, duration: Duration) {
        if !duration.is_zero() {
            if let Err(error) = self.out.flush() {
                tracing::warn!(error = %error, "Printer flush failed");
            }
            thread::sleep(duration);
        }
    }

    fn set_mode_bit(&mut self, mask: u8, on: bool) -> Result<()> {
        if on {
            self.print_mode |= mask;
        } else {
            self.print_mode &= !mask;
        }
        self.write(&[ESC, b'!', self.print_mode])
    }
}

impl<W: Write> Printer for ThermalPrinter<W> {
    fn initialize(&mut self) -> Result<()> {
        self.write(&[0xff])?;
        self.pause(Duration::from_millis(50));
        self.write(&[ESC, b'@'])?;
        // Heating dots, heating time, heating interval.
        self.write(&[ESC, b'7', 11, self.heat_time, 40])?;
        // Print density 10, break time 2.
        self.write(&[DC2, b'#', (2 << 5) | 10])?;
        self.print_mode = 0;
        Ok(())
    }

    fn print(&mut self, text: &str) -> Result<()> {
        let bytes: Vec<u8> = text
            .chars()
            .filter(|c| *c != '\r')
            .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
            .collect();
        self.write(&bytes)
    }

    fn feed(&mut self, lines: u8) -> Result<()> {
        self.write(&[ESC, b'd', lines])?;
        self.pause(self.pacing.dot_feed * CHAR_HEIGHT_DOTS * u32::from(lines));
        Ok(())
    }

    fn justify(&mut self, justify: Justify) -> Result<()> {
        let position = match justify {
            Justify::Left => 0,
            Justify::Center => 1,
            Justify::Right => 2,
        };
        self.write(&[ESC, b'a', position])
    }

    fn set_bold(&mut self, on: bool) -> Result<()> {
        self.set_mode_bit(BOLD_MASK, on)
    }

    fn set_underline(&mut self, on: bool) -> Result<()> {
        self.write(&[ESC, b'-', u8::from(on)])
    }

    fn set_double_height(&mut self, on: bool) -> Result<()> {
        self.set_mode_bit(DOUBLE_HEIGHT_MASK, on)
    }

    fn set_double_width(&mut self, on: bool) -> Result<()> {
        self.set_mode_bit(DOUBLE_WIDTH_MASK, on)
    }

    fn print_bitmap(&mut self, width: u32, height: u32, data: &[u8]) -> Result<()> {
        let height = height as usize;
        let row_bytes = (width as usize).div_ceil(8);
        let clipped = row_bytes.min(MAX_ROW_BYTES);

        let expected = row_bytes * height;
        if data.len() < expected {
            return Err(AppError::BitmapTooShort {
                expected,
                actual: data.len(),
            });
        }

        let max_chunk = if self.line_at_a_time { 1 } else { MAX_CHUNK_ROWS };
        let mut index = 0usize;
        let mut row_start = 0usize;

        while row_start < height {
            let chunk = (height - row_start).min(max_chunk);
            self.write(&[DC2, b'*', chunk as u8, clipped as u8])?;

            for _ in 0..chunk {
                self.write(&data[index..index + clipped])?;
                index += row_bytes;
            }

            self.pause(self.pacing.dot_print * chunk as u32);
            row_start += chunk;
        }

        Ok(())
    }
}
