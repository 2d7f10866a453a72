use bytes::Bytes;
use image::{ColorType, codecs::jpeg::JpegEncoder};

use crate::{
    error::{AppError, Result},
    models::ImageRef,
};

pub const JPEG_QUALITY: u8 = 100;
pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

/// Re-encodes one picked photo as a maximum quality JPEG.
pub fn encode_jpeg(image: &ImageRef) -> Result<Bytes> {
    let decoded = image::load_from_memory(&image.data).map_err(|e| {
        AppError::EncodingError(format!("Could not decode {}: {}", image.file_name, e))
    })?;
    let rgb = decoded.to_rgb8();

    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY)
        .encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)
        .map_err(|e| {
            AppError::EncodingError(format!("Could not encode {}: {}", image.file_name, e))
        })?;

    Ok(Bytes::from(buffer))
}

/// Encodes every photo, in order. The first photo that cannot be decoded
/// fails the whole batch.
pub fn encode_all(images: &[ImageRef]) -> Result<Vec<Bytes>> {
    images.iter().map(encode_jpeg).collect()
}

/// Runs [`encode_all`] on the blocking pool.
pub async fn encode_all_blocking(images: Vec<ImageRef>) -> Result<Vec<Bytes>> {
    tokio::task::spawn_blocking(move || encode_all(&images)).await?
}
