use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid config - {0}")]
    InvalidConfig(String),

    #[error("IO error - {0}")]
    IoError(#[from] std::io::Error),

    #[error("Catalog fetch error - {0}")]
    CatalogFetch(#[from] reqwest::Error),

    #[error("Catalog parse error - {0}")]
    CatalogParse(String),

    #[error("Fortune catalog is empty")]
    EmptyCatalog,

    #[error("Invalid fortune #{index} - {reason}")]
    InvalidFortune { index: usize, reason: String },

    #[error("QR encode error - {0}")]
    QrEncode(#[from] qrcode::types::QrError),

    #[error("Unexpected pixel value {0}")]
    UnexpectedPixelValue(u8),

    #[error("Raster of {0} pixels is not square")]
    NonSquareRaster(usize),

    #[error("Bitmap data too short - expected {expected} bytes, got {actual}")]
    BitmapTooShort { expected: usize, actual: usize },

    #[error("Image error - {0}")]
    ImageError(#[from] image::ImageError),

    #[error("PNG encode error - {0}")]
    PngError(#[from] png::EncodingError),

    #[error("Frame capture failed - {0}")]
    CaptureFailed(String),

    #[error("TryInitError - {0}")]
    TryInitError(#[from] tracing_subscriber::util::TryInitError),
}

impl AppError {
    /// Capture failures mean the camera is gone; everything else is scoped to one scan.
    pub fn is_capture_failure(&self) -> bool {
        matches!(self, Self::CaptureFailed(_))
    }

    /// Short line printed on the receipt when a scan fails.
    pub fn receipt_line(&self) -> String {
        match self {
            Self::CatalogFetch(_) => "Error: fortunes unavailable, please try again".to_string(),
            _ => format!("Error: {self}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_line_prefixes_description() {
        let err = AppError::UnexpectedPixelValue(128);
        assert_eq!(err.receipt_line(), "Error: Unexpected pixel value 128");
    }

    #[test]
    fn only_capture_failures_are_flagged() {
        assert!(AppError::CaptureFailed("camera unplugged".into()).is_capture_failure());
        assert!(!AppError::EmptyCatalog.is_capture_failure());
    }
}
