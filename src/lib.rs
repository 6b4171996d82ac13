pub mod config;
pub mod dispatcher;
pub mod error;
pub mod services;
pub mod utils;

use crate::{
    config::{Config, PrinterBackend, ScannerSource},
    dispatcher::Dispatcher,
    error::Result,
    services::{
        bitmap::BitmapEncoder,
        catalog::{FortuneCatalog, HttpCatalogLoader},
        printer::{PreviewPrinter, Printer, ThermalPrinter},
        receipt::Renderer,
        scanner::{CommandSource, FrameSource, RqrrDecoder, SpoolDirSource},
    },
};

pub type Kiosk =
    Dispatcher<HttpCatalogLoader, Box<dyn FrameSource>, RqrrDecoder, Box<dyn Printer>>;

pub fn build_printer(config: &Config) -> Result<Box<dyn Printer>> {
    Ok(match config.printer.backend {
        PrinterBackend::Serial => Box::new(ThermalPrinter::open(&config.printer)?),
        PrinterBackend::Preview => Box::new(PreviewPrinter::new(&config.printer.preview_dir)?),
    })
}

pub fn build_frame_source(config: &Config) -> Result<Box<dyn FrameSource>> {
    Ok(match config.scanner.source {
        ScannerSource::Spool => Box::new(SpoolDirSource::new(&config.scanner)?),
        ScannerSource::Command => Box::new(CommandSource::new(&config.scanner)?),
    })
}

pub fn build_kiosk(
    config: &Config,
    catalog: FortuneCatalog,
    loader: HttpCatalogLoader,
) -> Result<Kiosk> {
    let renderer = Renderer::new(
        BitmapEncoder::new(&config.bitmap),
        config.kiosk.token_url_prefix.clone(),
    );

    Ok(Dispatcher::new(
        config.kiosk.clone(),
        renderer,
        catalog,
        loader,
        build_frame_source(config)?,
        RqrrDecoder,
        build_printer(config)?,
    ))
}
