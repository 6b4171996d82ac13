use tokio::signal;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::Result;

pub fn init_tracing() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,fortune_kiosk=debug,reqwest=warn,hyper=warn".into());

    Ok(tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .with_span_list(false)
                .with_file(false)
                .with_target(true)
                .with_line_number(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .try_init()?)
}

/// Resolves on Ctrl+C or SIGTERM. The kiosk loop checks it between scans.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!(error = %error, "Failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!(error = %error, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::warn!("Received Ctrl+C, shutting down kiosk");
        }
        _ = terminate => {
            tracing::warn!("Received SIGTERM, shutting down kiosk");
        }
    }
}
