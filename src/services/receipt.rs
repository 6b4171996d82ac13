use crate::{
    error::{AppError, Result},
    services::{
        bitmap::BitmapEncoder,
        catalog::Reading,
        printer::{Justify, Printer},
        token::{Token, TokenPair},
    },
};

pub const THANKS_LINE: &str = "Thanks for using our services. Here are two more codes:";
pub const SEED_LINE: &str = "seeding";
pub const TRAILING_FEED: u8 = 5;

/// One ordered piece of a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<'a> {
    Fortune(&'a Reading),
    Line(String),
    Feed(u8),
    /// Both tokens as QR codes, each followed by `gap` blank lines.
    Codes { pair: &'a TokenPair, gap: u8 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Receipt<'a> {
    steps: Vec<Step<'a>>,
}

impl<'a> Receipt<'a> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn then(mut self, step: Step<'a>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps(&self) -> &[Step<'a>] {
        &self.steps
    }

    /// Fortune body, then the thank-you trailer with the next two codes.
    pub fn dispense(reading: &'a Reading, pair: &'a TokenPair) -> Self {
        Self::new()
            .then(Step::Fortune(reading))
            .then(Step::Feed(1))
            .then(Step::Line(THANKS_LINE.to_string()))
            .then(Step::Feed(3))
            .then(Step::Codes { pair, gap: 4 })
            .then(Step::Feed(TRAILING_FEED))
    }

    pub fn seed(pair: &'a TokenPair) -> Self {
        Self::new()
            .then(Step::Line(SEED_LINE.to_string()))
            .then(Step::Codes { pair, gap: 5 })
    }

    pub fn diagnostics<'t>(
        active: impl IntoIterator<Item = &'t Token>,
        used: impl IntoIterator<Item = &'t Token>,
    ) -> Self {
        Self::new()
            .then(Step::Line(token_list("active_tokens", active)))
            .then(Step::Line(String::new()))
            .then(Step::Line(token_list("used_tokens", used)))
            .then(Step::Feed(TRAILING_FEED))
    }

    pub fn error(error: &AppError) -> Self {
        Self::new().then(Step::Line(error.receipt_line()))
    }
}

fn token_list<'t>(label: &str, tokens: impl IntoIterator<Item = &'t Token>) -> String {
    let quoted: Vec<String> = tokens.into_iter().map(|t| format!("'{t}'")).collect();
    format!("{label}: [{}]", quoted.join(", "))
}

/// Prints receipts, turning token steps into QR bitmaps on the way.
#[derive(Debug, Clone)]
pub struct Renderer {
    encoder: BitmapEncoder,
    token_url_prefix: String,
}

impl Renderer {
    pub fn new(encoder: BitmapEncoder, token_url_prefix: impl Into<String>) -> Self {
        Self {
            encoder,
            token_url_prefix: token_url_prefix.into(),
        }
    }

    pub fn token_url(&self, token: &Token) -> String {
        format!("{}{}", self.token_url_prefix, token)
    }

    pub fn print<P: Printer + ?Sized>(&self, printer: &mut P, receipt: &Receipt<'_>) -> Result<()> {
        for step in receipt.steps() {
            match step {
                Step::Fortune(reading) => print_reading(printer, reading)?,
                Step::Line(text) => printer.println(text)?,
                Step::Feed(lines) => printer.feed(*lines)?,
                Step::Codes { pair, gap } => {
                    for token in pair.iter() {
                        let bitmap = self.encoder.encode(&self.token_url(token))?;
                        printer.print_bitmap(bitmap.side, bitmap.side, &bitmap.data)?;
                        printer.feed(*gap)?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn print_reading<P: Printer + ?Sized>(printer: &mut P, reading: &Reading) -> Result<()> {
    match reading {
        Reading::Simple { text } => {
            set_double_size(printer, false)?;
            printer.justify(Justify::Left)?;
            printer.println(text.trim_end())
        }
        Reading::Titled { title, text } => {
            set_double_size(printer, true)?;
            printer.justify(Justify::Center)?;
            printer.println(title.trim_end())?;

            set_double_size(printer, false)?;
            printer.justify(Justify::Left)?;
            printer.println(text.trim_end())
        }
        Reading::Tarot {
            title,
            keywords,
            light,
            shadow,
        } => {
            set_double_size(printer, true)?;
            printer.justify(Justify::Center)?;
            printer.print(title.trim_end())?;
            printer.feed(2)?;

            set_double_size(printer, false)?;
            printer.set_bold(true)?;
            printer.justify(Justify::Right)?;
            for keyword in keywords {
                printer.println(keyword)?;
            }
            printer.set_bold(false)?;

            print_bullets(printer, "Light:", light)?;
            printer.feed(1)?;
            print_bullets(printer, "Shadow:", shadow)
        }
        Reading::Unrecognized { .. } => Ok(()),
    }
}

fn set_double_size<P: Printer + ?Sized>(printer: &mut P, on: bool) -> Result<()> {
    printer.set_double_height(on)?;
    printer.set_double_width(on)
}

fn print_bullets<P: Printer + ?Sized>(
    printer: &mut P,
    heading: &str,
    lines: &[String],
) -> Result<()> {
    printer.set_underline(true)?;
    printer.justify(Justify::Center)?;
    printer.println(heading)?;
    printer.set_underline(false)?;

    printer.justify(Justify::Left)?;
    for line in lines {
        printer.println(&format!("- {line}"))?;
    }
    Ok(())
}
