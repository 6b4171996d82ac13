use std::{future::Future, path::PathBuf};

use crate::{
    config::CatalogConfig,
    error::Result,
    services::catalog::FortuneCatalog,
};

/// Something that can produce a fresh catalog on demand.
pub trait CatalogLoader {
    fn load(&self) -> impl Future<Output = Result<FortuneCatalog>> + Send;
}

/// Fetches the catalog over HTTP and keeps a local copy for offline starts.
#[derive(Debug, Clone)]
pub struct HttpCatalogLoader {
    client: reqwest::Client,
    url: String,
    cache_path: PathBuf,
}

impl HttpCatalogLoader {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
            cache_path: config.cache_path.clone(),
        })
    }

    async fn fetch(&self) -> Result<(FortuneCatalog, String)> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?;
        let raw = response.text().await?;
        let catalog = FortuneCatalog::parse(&raw, &self.url)?;
        Ok((catalog, raw))
    }

    async fn write_cache(&self, raw: &str) {
        if let Err(error) = tokio::fs::write(&self.cache_path, raw).await {
            tracing::warn!(
                error = %error,
                path = %self.cache_path.display(),
                "Could not write fortunes cache"
            );
        }
    }

    async fn read_cache(&self) -> Result<FortuneCatalog> {
        let raw = tokio::fs::read_to_string(&self.cache_path).await?;
        FortuneCatalog::parse(&raw, &self.cache_path.display().to_string())
    }
}

impl CatalogLoader for HttpCatalogLoader {
    async fn load(&self) -> Result<FortuneCatalog> {
        match self.fetch().await {
            Ok((catalog, raw)) => {
                self.write_cache(&raw).await;
                tracing::info!(url = %self.url, fortunes = catalog.len(), "Fortunes loaded");
                Ok(catalog)
            }
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    url = %self.url,
                    "Could not load fortunes from server"
                );

                match self.read_cache().await {
                    Ok(catalog) => {
                        tracing::warn!(
                            path = %self.cache_path.display(),
                            fortunes = catalog.len(),
                            "Using cached fortunes"
                        );
                        Ok(catalog)
                    }
                    Err(cache_error) => {
                        tracing::error!(error = %cache_error, "No usable fortunes cache");
                        Err(error)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::AppError;

    fn loader_with_cache(cache_path: PathBuf) -> HttpCatalogLoader {
        HttpCatalogLoader::new(&CatalogConfig {
            // Port 9 is discard; nothing answers HTTP there.
            url: "http://127.0.0.1:9/fortunes.toml".into(),
            cache_path,
            fetch_timeout: Duration::from_millis(500),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn falls_back_to_cache_when_fetch_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("fortunes.toml");
        std::fs::write(
            &cache,
            "[[fortunes]]\ntype = \"SIMPLE\"\ntext = \"cached\"\n",
        )
        .unwrap();

        let catalog = loader_with_cache(cache).load().await.unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[tokio::test]
    async fn fails_without_server_or_cache() {
        let dir = tempfile::tempdir().unwrap();
        let result = loader_with_cache(dir.path().join("missing.toml")).load().await;
        assert!(matches!(result, Err(AppError::CatalogFetch(_))));
    }
}
