#![allow(dead_code)]

use std::{
    collections::VecDeque,
    future::Future,
    io,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use fortune_kiosk::{
    config::{BitmapConfig, KioskConfig},
    dispatcher::Dispatcher,
    error::{AppError, Result},
    services::{
        bitmap::BitmapEncoder,
        catalog::{CatalogLoader, FortuneCatalog},
        printer::{Justify, Printer},
        receipt::Renderer,
        scanner::{FrameBuffer, FrameGuard, FrameSource, QrDecoder},
        token::{Token, TokenGenerator, TokenStore},
    },
};
use rand::{SeedableRng, rngs::StdRng};

pub const PREFIX: &str = "http://aftm.j51.eu/t/";
pub const FAULT: &str = "!fault";

pub const FORTUNES: &str = r#"
[[fortunes]]
type = "SIMPLE"
text = "A stranger will hold the door for you."
"#;

pub const UNRECOGNIZED_FORTUNES: &str = r#"
[[fortunes]]
type = "LIMERICK"
text = "There once was a kiosk in town"
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Init,
    Text(String),
    Feed(u8),
    Justify(Justify),
    Style(&'static str, bool),
    Bitmap { width: u32, height: u32, len: usize },
}

#[derive(Debug, Default)]
pub struct RecordingPrinter {
    pub ops: Vec<Op>,
}

impl RecordingPrinter {
    /// Printed text split into lines.
    pub fn lines(&self) -> Vec<String> {
        let text: String = self
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect();
        text.lines().map(str::to_string).collect()
    }

    pub fn bitmaps(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, Op::Bitmap { .. }))
            .count()
    }
}

impl Printer for RecordingPrinter {
    fn initialize(&mut self) -> Result<()> {
        self.ops.push(Op::Init);
        Ok(())
    }

    fn print(&mut self, text: &str) -> Result<()> {
        self.ops.push(Op::Text(text.to_string()));
        Ok(())
    }

    fn feed(&mut self, lines: u8) -> Result<()> {
        self.ops.push(Op::Feed(lines));
        Ok(())
    }

    fn justify(&mut self, justify: Justify) -> Result<()> {
        self.ops.push(Op::Justify(justify));
        Ok(())
    }

    fn set_bold(&mut self, on: bool) -> Result<()> {
        self.ops.push(Op::Style("bold", on));
        Ok(())
    }

    fn set_underline(&mut self, on: bool) -> Result<()> {
        self.ops.push(Op::Style("underline", on));
        Ok(())
    }

    fn set_double_height(&mut self, on: bool) -> Result<()> {
        self.ops.push(Op::Style("double_height", on));
        Ok(())
    }

    fn set_double_width(&mut self, on: bool) -> Result<()> {
        self.ops.push(Op::Style("double_width", on));
        Ok(())
    }

    fn print_bitmap(&mut self, width: u32, height: u32, data: &[u8]) -> Result<()> {
        self.ops.push(Op::Bitmap {
            width,
            height,
            len: data.len(),
        });
        Ok(())
    }
}

/// Frames carrying payload bytes directly; `None` is a frame with no code in it.
#[derive(Debug)]
pub struct ScriptedFrames {
    frames: VecDeque<Option<String>>,
    buffer: FrameBuffer,
    pub unreleased_captures: Arc<AtomicUsize>,
}

impl ScriptedFrames {
    pub fn new(frames: &[Option<&str>]) -> Self {
        Self {
            frames: frames.iter().map(|f| f.map(str::to_string)).collect(),
            buffer: FrameBuffer::new(),
            unreleased_captures: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl FrameSource for ScriptedFrames {
    fn capture(&mut self) -> Result<Option<FrameGuard<'_>>> {
        if !self.buffer.is_empty() {
            self.unreleased_captures.fetch_add(1, Ordering::SeqCst);
        }

        let Some(frame) = self.frames.pop_front() else {
            return Ok(None);
        };

        if let Some(payload) = frame {
            self.buffer.fill(payload.len() as u32, 1, payload.as_bytes())?;
        }
        Ok(Some(self.buffer.guard()))
    }
}

/// A camera that has gone away.
#[derive(Debug, Default)]
pub struct FailingSource;

impl FrameSource for FailingSource {
    fn capture(&mut self) -> Result<Option<FrameGuard<'_>>> {
        Err(AppError::CaptureFailed("camera unplugged".into()))
    }
}

/// Fails with an ordinary IO error a few times, then runs dry.
#[derive(Debug)]
pub struct GlitchingSource {
    glitches: usize,
}

impl GlitchingSource {
    pub fn new(glitches: usize) -> Self {
        Self { glitches }
    }
}

impl FrameSource for GlitchingSource {
    fn capture(&mut self) -> Result<Option<FrameGuard<'_>>> {
        if self.glitches == 0 {
            return Ok(None);
        }
        self.glitches -= 1;
        Err(io::Error::other("read interrupted").into())
    }
}

/// Reads the frame bytes back as the payload.
#[derive(Debug, Default)]
pub struct PayloadDecoder;

impl QrDecoder for PayloadDecoder {
    fn decode(&mut self, frame: &FrameBuffer) -> Result<Option<String>> {
        if frame.is_empty() {
            return Ok(None);
        }
        let payload = String::from_utf8_lossy(frame.luma()).into_owned();
        if payload == FAULT {
            return Err(AppError::UnexpectedPixelValue(42));
        }
        Ok(Some(payload))
    }
}

pub struct FixedLoader {
    catalog: Option<FortuneCatalog>,
    pub calls: Arc<AtomicUsize>,
}

impl FixedLoader {
    pub fn serving(catalog: Option<FortuneCatalog>) -> Self {
        Self {
            catalog,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl CatalogLoader for FixedLoader {
    fn load(&self) -> impl Future<Output = Result<FortuneCatalog>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = self
            .catalog
            .clone()
            .ok_or_else(|| AppError::CatalogParse("server offline".into()));
        async move { result }
    }
}

pub struct ScriptedTokens(VecDeque<String>);

impl ScriptedTokens {
    pub fn new(tokens: &[&str]) -> Self {
        Self(tokens.iter().map(|t| t.to_string()).collect())
    }
}

impl TokenGenerator for ScriptedTokens {
    fn generate(&mut self) -> Token {
        let next = self.0.pop_front().expect("token script exhausted");
        Token::from(next.as_str())
    }
}

pub type TestKiosk =
    Dispatcher<FixedLoader, ScriptedFrames, PayloadDecoder, RecordingPrinter, ScriptedTokens>;

pub fn settings() -> KioskConfig {
    KioskConfig {
        token_url_prefix: PREFIX.into(),
        poll_interval: Duration::ZERO,
        print_on_startup: false,
        announce_on_receipt: false,
    }
}

pub fn catalog(document: &str) -> FortuneCatalog {
    FortuneCatalog::parse(document, "test").expect("valid test catalog")
}

pub fn url(token: &str) -> String {
    format!("{PREFIX}{token}")
}

pub fn kiosk_with(
    settings: KioskConfig,
    document: &str,
    frames: &[Option<&str>],
    tokens: &[&str],
    reload: Option<FortuneCatalog>,
) -> TestKiosk {
    kiosk_from(settings, document, ScriptedFrames::new(frames), tokens, reload)
}

pub fn kiosk_from<S: FrameSource>(
    settings: KioskConfig,
    document: &str,
    source: S,
    tokens: &[&str],
    reload: Option<FortuneCatalog>,
) -> Dispatcher<FixedLoader, S, PayloadDecoder, RecordingPrinter, ScriptedTokens> {
    let renderer = Renderer::new(
        BitmapEncoder::new(&BitmapConfig {
            scale: 4,
            quiet_zone: 4,
        }),
        PREFIX,
    );

    Dispatcher::new(
        settings,
        renderer,
        catalog(document),
        FixedLoader::serving(reload),
        source,
        PayloadDecoder,
        RecordingPrinter::default(),
    )
    .with_rng(StdRng::seed_from_u64(5))
    .with_token_store(TokenStore::with_generator(ScriptedTokens::new(tokens)))
}

pub fn kiosk(frames: &[Option<&str>], tokens: &[&str]) -> TestKiosk {
    kiosk_with(settings(), FORTUNES, frames, tokens, None)
}
