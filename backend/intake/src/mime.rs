//! Image format sniffing for uploads.
//!
//! Uploads arrive as raw bytes with no trustworthy filename, so the format
//! is detected from magic bytes rather than an extension.

use restock_core::RestockError;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Accepted upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// Detect the format from the file's leading bytes.
    pub fn sniff(bytes: &[u8]) -> Result<ImageFormat, RestockError> {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Ok(ImageFormat::Jpeg);
        }
        if bytes.starts_with(&PNG_SIGNATURE) {
            return Ok(ImageFormat::Png);
        }
        Err(RestockError::Precondition(
            "unsupported image upload: expected JPEG or PNG bytes".to_string(),
        ))
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_jpeg() {
        let bytes = [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        assert_eq!(ImageFormat::sniff(&bytes).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn sniffs_png() {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 13]);
        assert_eq!(ImageFormat::sniff(&bytes).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn rejects_other_bytes() {
        let gif = b"GIF89a";
        assert!(ImageFormat::sniff(gif).is_err());
        assert!(ImageFormat::sniff(&[]).is_err());
    }

    #[test]
    fn mime_types() {
        assert_eq!(ImageFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(ImageFormat::Png.mime_type(), "image/png");
    }
}
