use std::future::Future;

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    config::KioskConfig,
    error::{AppError, Result},
    services::{
        catalog::{CatalogLoader, FortuneCatalog, Reading},
        printer::Printer,
        receipt::{Receipt, Renderer, Step},
        scanner::{FrameSource, QrDecoder},
        token::{RandomTokens, TokenGenerator, TokenPair, TokenStore, UseOutcome},
    },
    utils::security::{mask_payload, mask_token},
};

pub mod command;
pub mod types;

pub use command::{ScanCommand, parse_qr_string};
pub use types::{Acknowledgment, Outcome};

/// The kiosk loop: one frame in, at most one receipt out.
///
/// Every fault raised while decoding, classifying or printing a scan is caught
/// at the iteration boundary and printed as an error line. Only a capture
/// failure (see [`AppError::is_capture_failure`]) ends the loop with an error.
pub struct Dispatcher<L, S, D, P, G = RandomTokens> {
    settings: KioskConfig,
    renderer: Renderer,
    catalog: FortuneCatalog,
    loader: L,
    source: S,
    decoder: D,
    printer: P,
    tokens: TokenStore<G>,
    rng: StdRng,
}

impl<L, S, D, P> Dispatcher<L, S, D, P>
where
    L: CatalogLoader,
    S: FrameSource,
    D: QrDecoder,
    P: Printer,
{
    pub fn new(
        settings: KioskConfig,
        renderer: Renderer,
        catalog: FortuneCatalog,
        loader: L,
        source: S,
        decoder: D,
        printer: P,
    ) -> Self {
        Self {
            settings,
            renderer,
            catalog,
            loader,
            source,
            decoder,
            printer,
            tokens: TokenStore::new(),
            rng: StdRng::from_os_rng(),
        }
    }
}

impl<L, S, D, P, G> Dispatcher<L, S, D, P, G>
where
    L: CatalogLoader,
    S: FrameSource,
    D: QrDecoder,
    P: Printer,
    G: TokenGenerator,
{
    pub fn with_token_store<T: TokenGenerator>(
        self,
        tokens: TokenStore<T>,
    ) -> Dispatcher<L, S, D, P, T> {
        Dispatcher {
            settings: self.settings,
            renderer: self.renderer,
            catalog: self.catalog,
            loader: self.loader,
            source: self.source,
            decoder: self.decoder,
            printer: self.printer,
            tokens,
            rng: self.rng,
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn tokens(&self) -> &TokenStore<G> {
        &self.tokens
    }

    pub fn catalog(&self) -> &FortuneCatalog {
        &self.catalog
    }

    pub fn printer(&self) -> &P {
        &self.printer
    }

    /// Wakes the printer and, if configured, prints a first fortune so the
    /// chain of codes has somewhere to start.
    pub fn bootstrap(&mut self) -> Result<Option<TokenPair>> {
        self.printer.initialize()?;

        if !self.settings.print_on_startup {
            return Ok(None);
        }
        self.dispense().map(Some)
    }

    /// Processes frames until `shutdown` resolves or the source runs dry.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let outcome = tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::info!("Dispatcher stopping");
                    return Ok(());
                }
                outcome = self.step() => outcome?,
            };

            let Some(outcome) = outcome else {
                tracing::info!("Frame source exhausted");
                return Ok(());
            };

            match outcome {
                Outcome::Idle => tracing::trace!("Nothing found"),
                other => tracing::info!(outcome = other.kind(), "Scan handled"),
            }

            if !self.settings.poll_interval.is_zero() {
                tokio::select! {
                    biased;
                    _ = &mut shutdown => {
                        tracing::info!("Dispatcher stopping");
                        return Ok(());
                    }
                    _ = tokio::time::sleep(self.settings.poll_interval) => {}
                }
            }
        }
    }

    /// One iteration. `Ok(None)` when the source is exhausted; `Err` only for a
    /// capture failure. Other errors from the source are scan faults.
    pub async fn step(&mut self) -> Result<Option<Outcome>> {
        let decoded = match self.source.capture() {
            Ok(None) => return Ok(None),
            Ok(Some(frame)) => self.decoder.decode(&frame),
            Err(error) if error.is_capture_failure() => return Err(error),
            Err(error) => Err(error),
        };

        let result = match decoded {
            Ok(None) => return Ok(Some(Outcome::Idle)),
            Ok(Some(payload)) => {
                tracing::info!(payload = %mask_payload(&payload), "Found code");
                self.handle_payload(&payload).await
            }
            Err(error) => Err(error),
        };

        match result {
            Ok(outcome) => Ok(Some(outcome)),
            Err(error) => {
                self.report_fault(&error);
                Ok(Some(Outcome::Faulted(error.to_string())))
            }
        }
    }

    pub async fn handle_payload(&mut self, payload: &str) -> Result<Outcome> {
        match ScanCommand::classify(payload, &self.settings.token_url_prefix) {
            ScanCommand::Diagnostics => {
                let receipt = Receipt::diagnostics(self.tokens.active(), self.tokens.used());
                self.renderer.print(&mut self.printer, &receipt)?;
                Ok(Outcome::Diagnostics)
            }
            ScanCommand::Reset => self.reset().await,
            ScanCommand::Seed => {
                let pair = self.tokens.issue_pair();
                self.renderer.print(&mut self.printer, &Receipt::seed(&pair))?;
                Ok(Outcome::Seeded(pair))
            }
            ScanCommand::Token(candidate) => match self.tokens.use_token(candidate) {
                UseOutcome::Success => {
                    tracing::info!(token = %mask_token(candidate), "Token accepted");
                    let issued = self.dispense()?;
                    Ok(Outcome::Dispensed { issued })
                }
                UseOutcome::AlreadyUsed => {
                    self.acknowledge(Acknowledgment::AlreadyUsed)?;
                    Ok(Outcome::Acknowledged(Acknowledgment::AlreadyUsed))
                }
                UseOutcome::NotActive => {
                    self.acknowledge(Acknowledgment::NotActive)?;
                    Ok(Outcome::Acknowledged(Acknowledgment::NotActive))
                }
            },
        }
    }

    async fn reset(&mut self) -> Result<Outcome> {
        let catalog_reloaded = match self.loader.load().await {
            Ok(catalog) => {
                self.catalog = catalog;
                true
            }
            Err(error) => {
                tracing::warn!(error = %error, "Catalog reload failed, keeping previous fortunes");
                false
            }
        };

        self.tokens.reset();
        self.acknowledge(Acknowledgment::DidReset)?;
        Ok(Outcome::Reset { catalog_reloaded })
    }

    fn dispense(&mut self) -> Result<TokenPair> {
        let reading = self.catalog.pick(&mut self.rng)?.draw(&mut self.rng);
        let pair = self.tokens.issue_pair();

        if let Reading::Unrecognized { kind } = &reading {
            self.acknowledge(Acknowledgment::UnrecognizedFortune(kind.clone()))?;
        }

        self.renderer
            .print(&mut self.printer, &Receipt::dispense(&reading, &pair))?;
        Ok(pair)
    }

    fn acknowledge(&mut self, acknowledgment: Acknowledgment) -> Result<()> {
        tracing::info!(?acknowledgment, "{}", acknowledgment.message());

        if self.settings.announce_on_receipt {
            let receipt = Receipt::new()
                .then(Step::Line(acknowledgment.message()))
                .then(Step::Feed(3));
            self.renderer.print(&mut self.printer, &receipt)?;
        }
        Ok(())
    }

    fn report_fault(&mut self, error: &AppError) {
        tracing::error!(error = %error, "Scan failed");

        if let Err(print_error) = self.renderer.print(&mut self.printer, &Receipt::error(error)) {
            tracing::error!(error = %print_error, "Could not print fault line");
        }
    }
}
