use crate::backend::InferenceBackend;
use crate::config::DetectorConfig;
use crate::error::{DetectorError, Result};
use crate::labels::Labels;
use crate::metrics::DetectorMetrics;
use crate::session::{BackendLoader, ModelSession};
use common::span;
use preprocess::{ImageFormat, Normalizer};
use std::path::Path;
use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::Instant;

const JPEG_MIME: &str = "image/jpeg";

/// Classifies JPEG images into drawing, hentai, neutral, porn and sexy.
///
/// Construction is cheap; the model is loaded on the first classification
/// (or an explicit [`Detector::ensure_loaded`]) and kept until the detector
/// is dropped. A detector can be shared between threads.
pub struct Detector<B: InferenceBackend> {
    config: DetectorConfig,
    normalizer: Normalizer,
    loader: Box<BackendLoader<B>>,
    session: OnceLock<ModelSession<B>>,
    load_lock: Mutex<()>,
    metrics: DetectorMetrics,
}

impl<B: InferenceBackend + 'static> Detector<B> {
    /// Detector that loads its backend with [`InferenceBackend::load_model`]
    pub fn new(config: DetectorConfig) -> Self {
        Self::with_loader(config, B::load_model)
    }
}

impl<B: InferenceBackend> Detector<B> {
    /// Detector with a caller-supplied backend loader
    pub fn with_loader<F>(config: DetectorConfig, loader: F) -> Self
    where
        F: Fn(&Path, &[String]) -> anyhow::Result<B> + Send + Sync + 'static,
    {
        Self {
            normalizer: Normalizer::new(config.normalize),
            config,
            loader: Box::new(loader),
            session: OnceLock::new(),
            load_lock: Mutex::new(()),
            metrics: DetectorMetrics::new("nsfw_detector"),
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn is_loaded(&self) -> bool {
        self.session.get().is_some()
    }

    /// Label names read from the model directory, once loaded
    pub fn labels(&self) -> Option<&[String]> {
        self.session.get().map(ModelSession::labels)
    }

    /// Load the model if that has not happened yet.
    ///
    /// Concurrent callers wait for a single load. A failed load stores
    /// nothing, so the next call tries again.
    pub fn ensure_loaded(&self) -> Result<()> {
        self.session().map(|_| ())
    }

    fn session(&self) -> Result<&ModelSession<B>> {
        if let Some(session) = self.session.get() {
            return Ok(session);
        }

        let _guard = self.load_lock.lock().unwrap_or_else(PoisonError::into_inner);

        // Another caller may have finished loading while we waited
        if let Some(session) = self.session.get() {
            return Ok(session);
        }

        let loaded = ModelSession::load(&self.config, self.loader.as_ref());
        self.metrics.record_model_load(loaded.is_ok());
        let loaded = loaded?;

        Ok(self.session.get_or_init(|| loaded))
    }

    /// Classify a JPEG file.
    ///
    /// The media type is derived from the file name, before any bytes are read.
    pub fn classify_file(&self, path: impl AsRef<Path>) -> Result<Labels> {
        let path = path.as_ref();

        let mime = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream");

        if mime != JPEG_MIME {
            let err = DetectorError::UnsupportedFormat {
                path: path.to_path_buf(),
                mime: mime.to_string(),
            };
            self.metrics.record_failure(err.kind());
            return Err(err);
        }

        let bytes = std::fs::read(path).map_err(|source| {
            let err = DetectorError::Io {
                path: path.to_path_buf(),
                source,
            };
            self.metrics.record_failure(err.kind());
            err
        })?;

        self.classify_bytes(&bytes)
    }

    /// Classify an in-memory JPEG.
    pub fn classify_bytes(&self, bytes: &[u8]) -> Result<Labels> {
        let _s = span!("classify_image");
        let start = Instant::now();

        match self.classify(bytes) {
            Ok(labels) => {
                self.metrics.record_success(start.elapsed().as_secs_f64());
                tracing::debug!(labels = ?labels, "Image classified");
                Ok(labels)
            }
            Err(err) => {
                self.metrics.record_failure(err.kind());
                Err(err)
            }
        }
    }

    fn classify(&self, bytes: &[u8]) -> Result<Labels> {
        let session = self.session()?;

        let image = self.normalizer.normalize(bytes, ImageFormat::Jpeg).map_err(|e| {
            tracing::warn!(error = %e, "Invalid image");
            DetectorError::InvalidImage(e)
        })?;

        tracing::trace!(
            width = image.source_size.0,
            height = image.source_size.1,
            "Image normalized"
        );

        let scores = session.infer(image.tensor())?;

        // Output positions are a property of the packaged model:
        // 0 drawing, 1 hentai, 2 neutral, 3 porn, 4 sexy
        Labels::from_scores(&scores).ok_or_else(|| {
            DetectorError::inference(format!(
                "expected 5 scores in model output, got {}",
                scores.len()
            ))
        })
    }
}
