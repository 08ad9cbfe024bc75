//! Image normalization for the content classifier.
//!
//! Turns encoded image bytes into the fixed `[1, H, W, 3]` float tensor the
//! classification model was exported with: decode, resize (bilinear, aspect
//! ratio not preserved), then `(value - mean) / scale` per channel value.

pub mod config;
pub mod error;
pub mod normalizer;

use ndarray::{Array, IxDyn};

pub use config::{DEFAULT_INPUT_SIZE, DEFAULT_MEAN, DEFAULT_SCALE, NormalizeConfig};
pub use error::PreprocessError;
pub use normalizer::Normalizer;

/// Encoded formats the normalizer can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Png => "png",
        }
    }
}

impl From<ImageFormat> for image::ImageFormat {
    fn from(format: ImageFormat) -> Self {
        match format {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
        }
    }
}

/// Output of a single normalization pass
#[derive(Debug)]
pub struct NormalizedImage {
    /// NHWC tensor with batch size 1
    tensor: Array<f32, IxDyn>,
    /// Width and height of the decoded source image
    pub source_size: (u32, u32),
}

impl NormalizedImage {
    pub fn tensor(&self) -> &Array<f32, IxDyn> {
        &self.tensor
    }

    pub fn into_tensor(self) -> Array<f32, IxDyn> {
        self.tensor
    }
}
