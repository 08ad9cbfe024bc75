//! Still-image content classifier.
//!
//! A [`Detector`] decodes a JPEG, normalizes it into the `[1, 224, 224, 3]`
//! tensor the packaged model expects, runs a single forward pass and maps the
//! five output scores onto [`Labels`].
//!
//! ```ignore
//! use detector::{Detector, DetectorConfig, backend::ort::OrtBackend};
//!
//! let detector: Detector<OrtBackend> = Detector::new(DetectorConfig::new("assets/nsfw"));
//! let labels = detector.classify_file("photo.jpg")?;
//! if labels.nsfw(detector::THRESHOLD_SAFE) {
//!     // keep it private
//! }
//! ```

pub mod backend;
pub mod config;
pub mod detector;
pub mod error;
pub mod labels;
pub mod metrics;
pub mod session;

pub use backend::InferenceBackend;
pub use config::DetectorConfig;
pub use detector::Detector;
pub use error::{DetectorError, Result};
pub use labels::{
    Category, LABELS_FILE, Labels, THRESHOLD_HIGH, THRESHOLD_MEDIUM, THRESHOLD_SAFE, load_labels,
    parse_labels,
};
pub use session::{BackendLoader, ModelSession};

#[cfg(feature = "ort-backend")]
pub use backend::ort::OrtBackend;

/// Detector backed by ONNX Runtime
#[cfg(feature = "ort-backend")]
pub type OrtDetector = Detector<OrtBackend>;
