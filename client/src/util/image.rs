//! Selected-image payload and preview encoding.
//!
//! The analysis flow keeps the raw bytes for the multipart upload and a
//! `data:` URL for the preview and the persisted record.

#[cfg(test)]
#[path = "image_test.rs"]
mod image_test;

use base64::{Engine as _, engine::general_purpose::STANDARD};

const FALLBACK_FILE_NAME: &str = "image.png";
const FALLBACK_CONTENT_TYPE: &str = "image/png";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ImageError {
    #[error("El archivo está vacío.")]
    Empty,
    #[error("El archivo seleccionado no es una imagen.")]
    NotAnImage,
}

/// An image chosen via file picker or drag-and-drop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    /// `data:<mime>;base64,...` preview of `bytes`.
    pub data_url: String,
}

impl ImageUpload {
    /// Validate and wrap a picked file.
    ///
    /// Browsers report an empty MIME type for some files; those are accepted
    /// as PNG when the extension looks like an image.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError`] when the payload is empty or not an image.
    pub fn new(file_name: &str, content_type: &str, bytes: Vec<u8>) -> Result<Self, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        let content_type = resolve_content_type(file_name, content_type).ok_or(ImageError::NotAnImage)?;
        let file_name = if file_name.trim().is_empty() { FALLBACK_FILE_NAME.to_owned() } else { file_name.to_owned() };
        let data_url = data_url(&content_type, &bytes);
        Ok(Self { file_name, content_type, bytes, data_url })
    }
}

/// Encode bytes as a base64 `data:` URL.
#[must_use]
pub fn data_url(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{content_type};base64,{}", STANDARD.encode(bytes))
}

fn resolve_content_type(file_name: &str, content_type: &str) -> Option<String> {
    let content_type = content_type.trim().to_ascii_lowercase();
    if content_type.starts_with("image/") {
        return Some(content_type);
    }
    if !content_type.is_empty() {
        return None;
    }
    let ext = file_name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase())?;
    match ext.as_str() {
        "png" => Some(FALLBACK_CONTENT_TYPE.to_owned()),
        "jpg" | "jpeg" => Some("image/jpeg".to_owned()),
        "bmp" => Some("image/bmp".to_owned()),
        "webp" => Some("image/webp".to_owned()),
        _ => None,
    }
}
