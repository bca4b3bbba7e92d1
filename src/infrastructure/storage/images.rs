use crate::domain::errors::StorageError;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::fs;
use std::path::Path;

/// Decodes a base64 image payload and writes the raw bytes to `file_name`.
pub fn decode_image(imgstring: &str, file_name: impl AsRef<Path>) -> Result<(), StorageError> {
    let path = file_name.as_ref();
    let imgdata = STANDARD.decode(imgstring.trim())?;
    fs::write(path, imgdata).map_err(|e| StorageError::io(path, e))
}

pub fn encode_image_into_base64(image_path: impl AsRef<Path>) -> Result<String, StorageError> {
    let path = image_path.as_ref();
    let bytes = fs::read(path).map_err(|e| StorageError::io(path, e))?;
    Ok(STANDARD.encode(bytes))
}
