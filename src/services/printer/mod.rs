use crate::error::Result;

pub mod preview;
pub mod thermal;

pub use preview::PreviewPrinter;
pub use thermal::{Pacing, ThermalPrinter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    Left,
    Center,
    Right,
}

/// Primitive operations of a receipt printer.
pub trait Printer {
    fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    fn print(&mut self, text: &str) -> Result<()>;

    fn println(&mut self, text: &str) -> Result<()> {
        self.print(text)?;
        self.print("\n")
    }

    fn feed(&mut self, lines: u8) -> Result<()>;

    fn justify(&mut self, justify: Justify) -> Result<()>;

    fn set_bold(&mut self, on: bool) -> Result<()>;

    fn set_underline(&mut self, on: bool) -> Result<()>;

    fn set_double_height(&mut self, on: bool) -> Result<()>;

    fn set_double_width(&mut self, on: bool) -> Result<()>;

    /// Prints `data` as packed rows, `width` x `height` dots.
    fn print_bitmap(&mut self, width: u32, height: u32, data: &[u8]) -> Result<()>;
}

impl<P: Printer + ?Sized> Printer for Box<P> {
    fn initialize(&mut self) -> Result<()> {
        (**self).initialize()
    }

    fn print(&mut self, text: &str) -> Result<()> {
        (**self).print(text)
    }

    fn println(&mut self, text: &str) -> Result<()> {
        (**self).println(text)
    }

    fn feed(&mut self, lines: u8) -> Result<()> {
        (**self).feed(lines)
    }

    fn justify(&mut self, justify: Justify) -> Result<()> {
        (**self).justify(justify)
    }

    fn set_bold(&mut self, on: bool) -> Result<()> {
        (**self).set_bold(on)
    }

    fn set_underline(&mut self, on: bool) -> Result<()> {
        (**self).set_underline(on)
    }

    fn set_double_height(&mut self, on: bool) -> Result<()> {
        (**self).set_double_height(on)
    }

    fn set_double_width(&mut self, on: bool) -> Result<()> {
        (**self).set_double_width(on)
    }

    fn print_bitmap(&mut self, width: u32, height: u32, data: &[u8]) -> Result<()> {
        (**self).print_bitmap(width, height, data)
    }
}
