use crate::{ImageFormat, NormalizeConfig, NormalizedImage, PreprocessError};
use common::span;
use ndarray::{Array, Array3, Array4, ArrayView3, IxDyn};

/// One-shot image normalizer.
///
/// Holds only the constants of the target model, so a single instance can be
/// shared between threads. Every call allocates its own buffers.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizeConfig,
}

impl Normalizer {
    pub fn new(config: NormalizeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizeConfig {
        &self.config
    }

    pub fn input_size(&self) -> (u32, u32) {
        self.config.input_size
    }

    /// Decode `bytes` as `format` and build the model input tensor.
    pub fn normalize(
        &self,
        bytes: &[u8],
        format: ImageFormat,
    ) -> Result<NormalizedImage, PreprocessError> {
        let _s = span!("normalize_image");

        let rgb = Self::decode(bytes, format)?;
        let (width, height) = rgb.dimensions();

        self.normalize_rgb(rgb.as_raw(), width, height)
    }

    /// Build the model input tensor from packed RGB8 pixels in HWC order.
    pub fn normalize_rgb(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
    ) -> Result<NormalizedImage, PreprocessError> {
        tracing::trace!(
            width,
            height,
            pixel_bytes = pixels.len(),
            "Normalizing image dimensions"
        );

        if width == 0 || height == 0 {
            return Err(PreprocessError::EmptyImage);
        }

        if !self.config.scale.is_normal() {
            return Err(PreprocessError::InvalidScale(self.config.scale));
        }

        let expected_size = width as usize * height as usize * 3;
        if pixels.len() != expected_size {
            return Err(PreprocessError::Resize(format!(
                "Buffer size mismatch: expected {} bytes for {}x{} RGB, got {} bytes",
                expected_size,
                width,
                height,
                pixels.len()
            )));
        }

        let image = Self::cast(pixels, width, height)?;
        let resized = self.resize(image.view());
        let tensor = self.center_and_scale(resized);

        Ok(NormalizedImage {
            tensor,
            source_size: (width, height),
        })
    }

    fn decode(bytes: &[u8], format: ImageFormat) -> Result<image::RgbImage, PreprocessError> {
        let _s = span!("decode");

        let decoded = image::load_from_memory_with_format(bytes, format.into())?;

        tracing::trace!(
            format = format.as_str(),
            width = decoded.width(),
            height = decoded.height(),
            "Decoded image"
        );

        Ok(decoded.to_rgb8())
    }

    /// Widen RGB8 pixels to an `[H, W, 3]` float image
    fn cast(pixels: &[u8], width: u32, height: u32) -> Result<Array3<f32>, PreprocessError> {
        let values = pixels.iter().map(|&v| f32::from(v)).collect();
        Ok(Array3::from_shape_vec(
            (height as usize, width as usize, 3),
            values,
        )?)
    }

    /// Bilinear resize straight to the input size; aspect ratio is not kept.
    ///
    /// Output pixel `o` samples source coordinate `o * in / out` (no
    /// half-pixel offset, no antialiasing), interpolating between the two
    /// neighbouring source pixels on each axis. This is the sampling grid the
    /// packaged model was trained with.
    fn resize(&self, image: ArrayView3<f32>) -> Array4<f32> {
        let _s = span!("resize");

        let (target_width, target_height) = self.config.input_size;
        let (src_height, src_width, channels) = image.dim();

        let rows = taps(src_height, target_height as usize);
        let cols = taps(src_width, target_width as usize);

        let mut output = Array4::zeros((1, rows.len(), cols.len(), channels));

        for (y, row) in rows.iter().enumerate() {
            for (x, col) in cols.iter().enumerate() {
                for c in 0..channels {
                    let top_left = image[[row.low, col.low, c]];
                    let top_right = image[[row.low, col.high, c]];
                    let bottom_left = image[[row.high, col.low, c]];
                    let bottom_right = image[[row.high, col.high, c]];

                    let top = top_left + (top_right - top_left) * col.frac;
                    let bottom = bottom_left + (bottom_right - bottom_left) * col.frac;

                    output[[0, y, x, c]] = top + (bottom - top) * row.frac;
                }
            }
        }

        output
    }

    fn center_and_scale(&self, mut tensor: Array4<f32>) -> Array<f32, IxDyn> {
        let _s = span!("center_and_scale");

        let NormalizeConfig { mean, scale, .. } = self.config;
        tensor.mapv_inplace(|value| (value - mean) / scale);

        tensor.into_dyn()
    }
}

/// Source neighbours and weight for one output coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
struct Tap {
    low: usize,
    high: usize,
    frac: f32,
}

/// Sampling taps along one axis, clamped to the last source pixel
fn taps(src_len: usize, dst_len: usize) -> Vec<Tap> {
    let step = src_len as f32 / dst_len as f32;
    let last = src_len - 1;

    (0..dst_len)
        .map(|o| {
            let position = o as f32 * step;
            let low = (position.floor() as usize).min(last);
            Tap {
                low,
                high: (low + 1).min(last),
                frac: position - low as f32,
            }
        })
        .collect()
}
