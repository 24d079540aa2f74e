//! Binary assets referenced by image elements.

use crate::error::{FolioError, FolioResult};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// Image format for stored image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        // RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        None
    }
}

/// An encoded payload stored once per board and shared by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    /// `data:<mime>;base64,<payload>`
    pub data_url: String,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

impl Asset {
    /// Build an asset from raw image bytes, reading the pixel size.
    pub fn from_image_bytes(id: impl Into<String>, data: &[u8]) -> FolioResult<Self> {
        let format = ImageFormat::from_magic_bytes(data).ok_or(FolioError::UnsupportedImage)?;
        let (width, height) = image::ImageReader::new(Cursor::new(data))
            .with_guessed_format()?
            .into_dimensions()?;
        Ok(Self {
            id: id.into(),
            data_url: format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(data)),
            width: width as f64,
            height: height as f64,
        })
    }

    /// Decode the payload of the data URL.
    pub fn data(&self) -> Option<Vec<u8>> {
        let (_, payload) = self.data_url.split_once(";base64,")?;
        STANDARD.decode(payload).ok()
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.data_url
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(';'))
            .map(|(mime, _)| mime)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A 2x3 PNG.
    pub(crate) fn tiny_png() -> Vec<u8> {
        let mut bytes = Vec::new();
        let img = image::RgbaImage::new(2, 3);
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0x89, 0x50, 0x4E, 0x47, 0x0D]),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(b"RIFF\0\0\0\0WEBPVP8 "),
            Some(ImageFormat::WebP)
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF89a"), None);
    }

    #[test]
    fn test_asset_from_png() {
        let png = tiny_png();
        let asset = Asset::from_image_bytes("a1", &png).unwrap();
        assert!((asset.width - 2.0).abs() < f64::EPSILON);
        assert!((asset.height - 3.0).abs() < f64::EPSILON);
        assert_eq!(asset.mime_type(), Some("image/png"));
        assert_eq!(asset.data(), Some(png));
    }

    #[test]
    fn test_rejects_unknown_bytes() {
        assert!(matches!(
            Asset::from_image_bytes("x", b"not an image"),
            Err(FolioError::UnsupportedImage)
        ));
    }
}
