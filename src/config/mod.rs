use std::{env, fmt, path::PathBuf, str::FromStr, time::Duration};

use crate::error::{AppError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub kiosk: KioskConfig,
    pub catalog: CatalogConfig,
    pub bitmap: BitmapConfig,
    pub printer: PrinterConfig,
    pub scanner: ScannerConfig,
}

#[derive(Debug, Clone)]
pub struct KioskConfig {
    pub token_url_prefix: String,
    pub poll_interval: Duration,
    pub print_on_startup: bool,
    pub announce_on_receipt: bool,
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub url: String,
    pub cache_path: PathBuf,
    pub fetch_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct BitmapConfig {
    pub scale: u32,
    pub quiet_zone: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrinterBackend {
    Serial,
    Preview,
}

impl FromStr for PrinterBackend {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "serial" => Ok(Self::Serial),
            "preview" => Ok(Self::Preview),
            other => Err(format!("unknown printer backend '{other}'")),
        }
    }
}

impl fmt::Display for PrinterBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serial => f.write_str("serial"),
            Self::Preview => f.write_str("preview"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PrinterConfig {
    pub backend: PrinterBackend,
    pub device: PathBuf,
    pub baud_rate: u32,
    pub line_at_a_time: bool,
    pub heat_time: u8,
    pub preview_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScannerSource {
    Spool,
    Command,
}

impl FromStr for ScannerSource {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "spool" => Ok(Self::Spool),
            "command" => Ok(Self::Command),
            other => Err(format!("unknown scanner source '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScannerConfig {
    pub source: ScannerSource,
    pub spool_dir: PathBuf,
    pub capture_command: Option<String>,
    pub idle: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            kiosk: KioskConfig {
                token_url_prefix: env_or_default("TOKEN_URL_PREFIX", "http://aftm.j51.eu/t/"),
                poll_interval: Duration::from_millis(env_or_parse("POLL_INTERVAL_MS", 0)?),
                print_on_startup: env_or_parse("PRINT_ON_STARTUP", true)?,
                announce_on_receipt: env_or_parse("ANNOUNCE_ON_RECEIPT", false)?,
            },
            catalog: CatalogConfig {
                url: env_or_default("FORTUNES_URL", "http://aftm-fortunes.j51.eu/fortunes.toml"),
                cache_path: env_or_default("FORTUNES_CACHE_PATH", "./fortunes.toml").into(),
                fetch_timeout: Duration::from_secs(env_or_parse(
                    "FORTUNES_FETCH_TIMEOUT_SECS",
                    10,
                )?),
            },
            bitmap: BitmapConfig {
                scale: env_or_parse("QR_SCALE", 4)?,
                quiet_zone: env_or_parse("QR_QUIET_ZONE", 4)?,
            },
            printer: PrinterConfig {
                backend: env_or_parse("PRINTER_BACKEND", PrinterBackend::Serial)?,
                device: env_or_default("PRINTER_DEVICE", "/dev/serial0").into(),
                baud_rate: env_or_parse("PRINTER_BAUD_RATE", 19200)?,
                line_at_a_time: env_or_parse("PRINTER_LINE_AT_A_TIME", true)?,
                heat_time: env_or_parse("PRINTER_HEAT_TIME", 120)?,
                preview_dir: env_or_default("PREVIEW_DIR", "./receipts").into(),
            },
            scanner: ScannerConfig {
                source: env_or_parse("SCANNER_SOURCE", ScannerSource::Spool)?,
                spool_dir: env_or_default("SCANNER_SPOOL_DIR", "./frames").into(),
                capture_command: env_optional("SCANNER_CAPTURE_COMMAND"),
                idle: Duration::from_millis(env_or_parse("SCANNER_IDLE_MS", 100)?),
            },
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.kiosk.token_url_prefix.is_empty() {
            return Err(AppError::InvalidConfig(
                "TOKEN_URL_PREFIX must not be empty".into(),
            ));
        }

        if self.catalog.url.is_empty() {
            return Err(AppError::InvalidConfig("FORTUNES_URL must not be empty".into()));
        }

        if self.bitmap.scale == 0 {
            return Err(AppError::InvalidConfig("QR_SCALE must be positive".into()));
        }

        if self.printer.baud_rate == 0 {
            return Err(AppError::InvalidConfig(
                "PRINTER_BAUD_RATE must be positive".into(),
            ));
        }

        if self.scanner.source == ScannerSource::Command && self.scanner.capture_command.is_none()
        {
            return Err(AppError::InvalidConfig(
                "SCANNER_CAPTURE_COMMAND is required when SCANNER_SOURCE=command".into(),
            ));
        }

        Ok(())
    }
}

fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_or_parse<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|_| AppError::InvalidConfig(format!("Invalid value for {key}"))),
        Err(_) => Ok(default),
    }
}

fn env_optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
