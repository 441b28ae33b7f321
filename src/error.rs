use image::RgbaImage;

#[derive(Debug, thiserror::Error)]
/// Invalid input handed to the pipeline.
pub enum PipelineError {
    /// The RGBA buffer does not hold exactly `width * height * 4` bytes.
    #[error("buffer of {len} bytes does not match a {width}x{height} RGBA image")]
    InvalidDimensions { width: u32, height: u32, len: usize },

    #[error("unknown filter `{0}`")]
    UnknownFilter(String),
}

/// Wraps a decoded RGBA buffer, checking that its length matches the dimensions.
pub fn bitmap_from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<RgbaImage, PipelineError> {
    let len = data.len();
    let expected = width as usize * height as usize * 4;
    if len != expected {
        return Err(PipelineError::InvalidDimensions { width, height, len });
    }
    RgbaImage::from_raw(width, height, data).ok_or(PipelineError::InvalidDimensions {
        width,
        height,
        len,
    })
}
