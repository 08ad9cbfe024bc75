use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("Decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Image has zero width or height")]
    EmptyImage,

    #[error("Resize error: {0}")]
    Resize(String),

    #[error("Tensor shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Invalid normalization scale: {0}")]
    InvalidScale(f32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_formatting() {
        assert_eq!(
            PreprocessError::EmptyImage.to_string(),
            "Image has zero width or height"
        );
        assert_eq!(
            PreprocessError::Resize("bad buffer".to_string()).to_string(),
            "Resize error: bad buffer"
        );
        assert_eq!(
            PreprocessError::InvalidScale(0.0).to_string(),
            "Invalid normalization scale: 0"
        );
    }
}
