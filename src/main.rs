use fortune_kiosk::{
    build_kiosk,
    config::Config,
    error::Result,
    services::catalog::{CatalogLoader, HttpCatalogLoader},
    utils::runtime::{init_tracing, shutdown_signal},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing()?;

    let config = Config::from_env()?;
    config.validate()?;
    tracing::info!("Configuration loaded");

    let loader = HttpCatalogLoader::new(&config.catalog)?;
    let catalog = match loader.load().await {
        Ok(catalog) => catalog,
        Err(error) => {
            tracing::error!(error = %error, "Could not load fortunes, quitting");
            return Err(error);
        }
    };
    tracing::info!(fortunes = catalog.len(), "Fortunes loaded");

    let mut kiosk = build_kiosk(&config, catalog, loader)?;
    tracing::info!(
        printer = %config.printer.backend,
        scanner = ?config.scanner.source,
        "Kiosk initialized"
    );

    if let Some(pair) = kiosk.bootstrap()? {
        tracing::info!(codes = pair.iter().count(), "Printed startup fortune");
    }

    kiosk.run(shutdown_signal()).await?;
    tracing::info!("Kiosk shutdown complete");

    Ok(())
}
