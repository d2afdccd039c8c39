//! Uploaded image intake
//!
//! Validates the declared content type of an uploaded cadastral map, reads
//! its bytes and turns them into the data URL handed to the vision model.

use crate::{Error, Result};
use axum::extract::multipart::Field;
use base64::Engine as _;
use std::fmt;

/// Name of the multipart field carrying the image.
pub const FILE_FIELD: &str = "file";

/// Image formats the vision model accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMime {
    Jpeg,
    Png,
    Webp,
    Gif,
}

impl ImageMime {
    /// Match a declared content type against the accepted formats.
    ///
    /// The comparison is exact: `image/PNG` or `image/png; charset=x` are
    /// rejected, as is a missing content type.
    pub fn from_content_type(content_type: Option<&str>) -> Result<Self> {
        match content_type {
            Some("image/jpeg") => Ok(ImageMime::Jpeg),
            Some("image/png") => Ok(ImageMime::Png),
            Some("image/webp") => Ok(ImageMime::Webp),
            Some("image/gif") => Ok(ImageMime::Gif),
            _ => Err(Error::unsupported_format()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Png => "image/png",
            ImageMime::Webp => "image/webp",
            ImageMime::Gif => "image/gif",
        }
    }

    /// Identify the format from the leading magic bytes, if recognisable.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0xFF, 0xD8, 0xFF, ..] => Some(ImageMime::Jpeg),
            [0x89, 0x50, 0x4E, 0x47, ..] => Some(ImageMime::Png),
            [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => {
                Some(ImageMime::Webp)
            }
            [0x47, 0x49, 0x46, 0x38, ..] => Some(ImageMime::Gif),
            _ => None,
        }
    }
}

impl fmt::Display for ImageMime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw bytes of an accepted upload together with its declared format.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub mime: ImageMime,
}

impl ImageUpload {
    pub fn new(bytes: Vec<u8>, mime: ImageMime) -> Self {
        Self { bytes, mime }
    }

    /// Validate the field's content type, then drain it into memory.
    ///
    /// Nothing is read from the field when the content type is rejected. A
    /// part without a filename is a plain form value, not a file.
    pub async fn from_field(field: Field<'_>) -> Result<Self> {
        if field.file_name().is_none() {
            return Err(Error::MissingFile);
        }
        let mime = ImageMime::from_content_type(field.content_type())?;
        let bytes = field.bytes().await?.to_vec();

        match ImageMime::sniff(&bytes) {
            Some(detected) if detected != mime => {
                tracing::warn!(
                    "Upload declared as {} but its content looks like {}; keeping declared type",
                    mime,
                    detected
                );
            }
            None => {
                tracing::warn!(
                    "Unrecognized image signature (first 4 bytes: {:02X?})",
                    &bytes[..bytes.len().min(4)]
                );
            }
            _ => {}
        }

        Ok(Self::new(bytes, mime))
    }

    /// Encode as `data:<mime>;base64,<payload>`.
    pub fn to_data_url(&self) -> String {
        encode_data_url(&self.bytes, self.mime.as_str())
    }
}

pub fn encode_data_url(bytes: &[u8], mime: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", mime, encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_accepts_the_four_image_types() {
        assert_eq!(
            ImageMime::from_content_type(Some("image/jpeg")).unwrap(),
            ImageMime::Jpeg
        );
        assert_eq!(
            ImageMime::from_content_type(Some("image/png")).unwrap(),
            ImageMime::Png
        );
        assert_eq!(
            ImageMime::from_content_type(Some("image/webp")).unwrap(),
            ImageMime::Webp
        );
        assert_eq!(
            ImageMime::from_content_type(Some("image/gif")).unwrap(),
            ImageMime::Gif
        );
    }

    #[test]
    fn test_rejects_other_content_types() {
        for declared in [
            Some("image/bmp"),
            Some("image/svg+xml"),
            Some("application/pdf"),
            Some("text/plain"),
            Some("IMAGE/PNG"),
            Some(""),
            None,
        ] {
            let err = ImageMime::from_content_type(declared).unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)), "{:?}", declared);
        }
    }

    #[test]
    fn test_data_url_has_exact_shape() {
        let upload = ImageUpload::new(b"hello".to_vec(), ImageMime::Gif);
        assert_eq!(upload.to_data_url(), "data:image/gif;base64,aGVsbG8=");
    }

    #[test]
    fn test_data_url_payload_decodes_to_original_bytes() {
        let bytes: Vec<u8> = (0..=255u8).chain(PNG_HEADER).collect();
        let upload = ImageUpload::new(bytes.clone(), ImageMime::Png);

        let url = upload.to_data_url();
        let payload = url.strip_prefix("data:image/png;base64,").unwrap();
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .unwrap();
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn test_empty_upload_encodes() {
        assert_eq!(encode_data_url(&[], "image/jpeg"), "data:image/jpeg;base64,");
    }

    #[test]
    fn test_sniff_signatures() {
        assert_eq!(ImageMime::sniff(&PNG_HEADER), Some(ImageMime::Png));
        assert_eq!(
            ImageMime::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageMime::Jpeg)
        );
        assert_eq!(
            ImageMime::sniff(&[
                0x52, 0x49, 0x46, 0x46, 0x00, 0x00, 0x00, 0x00, 0x57, 0x45, 0x42, 0x50
            ]),
            Some(ImageMime::Webp)
        );
        assert_eq!(ImageMime::sniff(b"GIF89a"), Some(ImageMime::Gif));
        assert_eq!(ImageMime::sniff(&[0x00, 0x01, 0x02, 0x03]), None);
        assert_eq!(ImageMime::sniff(&[]), None);
    }
}
