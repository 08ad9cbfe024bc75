use preprocess::PreprocessError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DetectorError>;

/// Why a classification produced no result.
///
/// None of these are fatal: each call is independent, and a failed model load
/// leaves the detector ready to retry on the next call.
#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("\"{}\" is not a jpeg file (detected {mime})", path.display())]
    UnsupportedFormat { path: PathBuf, mime: String },

    #[error("IO error reading \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Model load error: {0}")]
    ModelLoad(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Invalid image: {0}")]
    InvalidImage(#[from] PreprocessError),

    #[error("Inference error: {0}")]
    Inference(String),
}

impl DetectorError {
    pub(crate) fn model_load(err: anyhow::Error) -> Self {
        Self::ModelLoad(err.into())
    }

    pub(crate) fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Short stable name, used as a metric attribute
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat { .. } => "unsupported_format",
            Self::Io { .. } => "io",
            Self::ModelLoad(_) => "model_load",
            Self::InvalidImage(_) => "invalid_image",
            Self::Inference(_) => "inference",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display_formatting() {
        let err = DetectorError::UnsupportedFormat {
            path: PathBuf::from("/photos/cat.png"),
            mime: "image/png".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "\"/photos/cat.png\" is not a jpeg file (detected image/png)"
        );

        let err = DetectorError::Inference("result is empty".to_string());
        assert_eq!(err.to_string(), "Inference error: result is empty");

        let err = DetectorError::InvalidImage(PreprocessError::EmptyImage);
        assert_eq!(err.to_string(), "Invalid image: Image has zero width or height");
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err = DetectorError::Io {
            path: PathBuf::from("missing.jpg"),
            source: io::Error::new(io::ErrorKind::NotFound, "file not found"),
        };

        assert_eq!(err.to_string(), "IO error reading \"missing.jpg\": file not found");
        assert!(err.source().is_some());
        assert_eq!(err.kind(), "io");
    }

    #[test]
    fn test_model_load_wraps_anyhow() {
        let err = DetectorError::model_load(anyhow::anyhow!("no model exported for tags"));

        assert_eq!(err.kind(), "model_load");
        assert!(err.to_string().contains("no model exported for tags"));
    }
}
