use std::fs;
use std::path::Path;

pub use image::{DynamicImage, ImageFormat};
use log::{debug, error, warn};

use crate::error::{QualityError, Result};
use crate::jpeg::{parse_header, JpegHeader};

/// A decoded image together with the JPEG header it was decoded from, if any.
///
/// ## Example of usage
/// ```rust
/// use jpeg_quality_core::Media;
///
/// let png = {
///     let mut buf = std::io::Cursor::new(Vec::new());
///     image::RgbImage::new(4, 4)
///         .write_to(&mut buf, image::ImageOutputFormat::Png)
///         .expect("Cannot encode PNG");
///     buf.into_inner()
/// };
///
/// let media = Media::from_bytes(&png).expect("Cannot decode PNG");
/// assert_eq!(media.format(), image::ImageFormat::Png);
/// assert!(media.jpeg().is_none());
/// ```
#[derive(Debug)]
pub struct Media {
    format: ImageFormat,
    image: DynamicImage,
    jpeg: Option<JpegHeader>,
}

impl Media {
    pub fn from_file(f: impl AsRef<Path>) -> Result<Self> {
        let f = f.as_ref();
        let data = fs::read(f).map_err(|source| {
            error!("Error reading file {f:?}: {source}");
            QualityError::ReadError { source }
        })?;

        let format = image::guess_format(&data)
            .ok()
            .or_else(|| ImageFormat::from_path(f).ok())
            .ok_or(QualityError::UnsupportedMedia)?;
        debug!("{f:?} detected as {format:?}");

        Self::decode(&data, format)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let format = image::guess_format(data).map_err(|_| QualityError::UnsupportedMedia)?;
        Self::decode(data, format)
    }

    fn decode(data: &[u8], format: ImageFormat) -> Result<Self> {
        let image = image::load_from_memory_with_format(data, format).map_err(|e| {
            error!("Error decoding {format:?} image: {e}");
            match e {
                image::ImageError::Unsupported(_) => QualityError::UnsupportedMedia,
                _ => QualityError::InvalidImageMedia,
            }
        })?;

        let jpeg = if format == ImageFormat::Jpeg {
            match parse_header(data) {
                Ok(header) => Some(header),
                Err(e) => {
                    warn!("Quantization tables not readable: {e}");
                    None
                }
            }
        } else {
            None
        };

        Ok(Self {
            format,
            image,
            jpeg,
        })
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// JPEG header, only present for JPEG sources with a readable header.
    pub fn jpeg(&self) -> Option<&JpegHeader> {
        self.jpeg.as_ref()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{encode_jpeg, encode_png};
    use tempfile::TempDir;

    #[test]
    fn should_keep_jpeg_header_for_jpeg_sources() {
        let media = Media::from_bytes(&encode_jpeg(60)).expect("Cannot decode JPEG");

        assert_eq!(media.format(), ImageFormat::Jpeg);
        assert_eq!(media.dimensions(), (16, 16));
        let header = media.jpeg().expect("JPEG header missing");
        assert!(header.quant_tables[0].is_some());
    }

    #[test]
    fn should_have_no_jpeg_header_for_png_sources() {
        let media = Media::from_bytes(&encode_png()).expect("Cannot decode PNG");

        assert_eq!(media.format(), ImageFormat::Png);
        assert!(media.jpeg().is_none());
    }

    #[test]
    fn should_detect_format_by_content_not_extension() -> Result<()> {
        let dir = TempDir::new()?;
        let misnamed = dir.path().join("actually-a-jpeg.png");
        fs::write(&misnamed, encode_jpeg(80))?;

        let media = Media::from_file(&misnamed)?;
        assert_eq!(media.format(), ImageFormat::Jpeg);
        assert!(media.jpeg().is_some());

        Ok(())
    }

    #[test]
    fn should_report_missing_file_as_read_error() {
        match Media::from_file("some_random_file.jpg") {
            Err(QualityError::ReadError { .. }) => (),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn should_report_unknown_content_as_unsupported() -> Result<()> {
        let dir = TempDir::new()?;
        let text = dir.path().join("notes.txt");
        fs::write(&text, "just some text")?;

        match Media::from_file(&text) {
            Err(QualityError::UnsupportedMedia) => (),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            Media::from_bytes(b"just some text"),
            Err(QualityError::UnsupportedMedia)
        ));

        Ok(())
    }

    #[test]
    fn should_report_broken_jpeg_as_invalid() {
        let mut jpeg = encode_jpeg(80);
        jpeg.truncate(jpeg.len() / 3);

        assert!(matches!(
            Media::from_bytes(&jpeg),
            Err(QualityError::InvalidImageMedia)
        ));
    }
}
