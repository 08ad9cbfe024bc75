/// Spatial input size (width, height) of the packaged classification model
pub const DEFAULT_INPUT_SIZE: (u32, u32) = (224, 224);

/// Value subtracted from every channel value. Matched to the packaged model.
pub const DEFAULT_MEAN: f32 = 117.0;

/// Divisor applied after centering. Matched to the packaged model.
pub const DEFAULT_SCALE: f32 = 1.0;

/// Normalization constants tied to one exported model artifact.
///
/// Changing any of these without swapping the model silently degrades
/// classification quality; nothing downstream can detect the mismatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizeConfig {
    pub input_size: (u32, u32),
    pub mean: f32,
    pub scale: f32,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            input_size: DEFAULT_INPUT_SIZE,
            mean: DEFAULT_MEAN,
            scale: DEFAULT_SCALE,
        }
    }
}
