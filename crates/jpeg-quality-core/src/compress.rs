use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage};
use log::{debug, error};

use crate::error::{QualityError, Result};
use crate::media::Media;

/// Quality used for re-encoding when none is given.
pub const DEFAULT_QUALITY: u8 = 75;

/// `<dir>/<stem>_compressed_q<quality>.jpg` next to the input file.
pub fn default_output_path(input: impl AsRef<Path>, quality: u8) -> PathBuf {
    let input = input.as_ref();
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_owned());

    input.with_file_name(format!("{stem}_compressed_q{quality}.jpg"))
}

/// Encode the pixels of `media` as JPEG at `quality`.
///
/// `quality` goes to the encoder untouched. Alpha and palettes are dropped,
/// grayscale stays grayscale.
pub fn write_jpeg<W: Write>(media: &Media, quality: u8, mut writer: W) -> Result<()> {
    let mut encoder = JpegEncoder::new_with_quality(&mut writer, quality);
    let image = media.image();

    let result = if is_grayscale(image) {
        let luma = image.to_luma8();
        encoder.encode(luma.as_raw(), luma.width(), luma.height(), ColorType::L8)
    } else {
        let rgb = image.to_rgb8();
        encoder.encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)
    };

    result.map_err(|e| {
        error!("Error encoding JPEG: {e}");
        QualityError::ImageEncodingError
    })
}

/// Encode `media` as JPEG at `quality` into the file `target`.
///
/// `target` is only created once encoding succeeded.
pub fn save_jpeg(media: &Media, quality: u8, target: impl AsRef<Path>) -> Result<()> {
    let target = target.as_ref();
    write_encoded(target, |buf| write_jpeg(media, quality, buf))?;

    debug!("{target:?} written with quality {quality}");
    Ok(())
}

fn write_encoded(target: &Path, encode: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> Result<()> {
    let mut encoded = Vec::new();
    encode(&mut encoded)?;

    fs::write(target, &encoded).map_err(|source| {
        error!("Error writing file {target:?}: {source}");
        QualityError::WriteError { source }
    })
}

fn is_grayscale(image: &DynamicImage) -> bool {
    matches!(
        image.color(),
        ColorType::L8 | ColorType::L16 | ColorType::La8 | ColorType::La16
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::luminance_table;
    use crate::quality::estimate;
    use crate::test_utils::encode_png;

    #[test]
    fn should_derive_output_name_from_stem() {
        assert_eq!(
            default_output_path("photos/cat.png", 80),
            Path::new("photos/cat_compressed_q80.jpg")
        );
        assert_eq!(
            default_output_path("cat.jpeg", DEFAULT_QUALITY),
            Path::new("cat_compressed_q75.jpg")
        );
        assert_eq!(
            default_output_path("archive.tar.gz", 10),
            Path::new("archive.tar_compressed_q10.jpg")
        );
    }

    #[test]
    fn should_write_jpeg_at_requested_quality() -> Result<()> {
        let png = Media::from_bytes(&encode_png())?;
        let mut out = Vec::new();
        write_jpeg(&png, 40, &mut out)?;

        let jpeg = Media::from_bytes(&out)?;
        assert_eq!(jpeg.format(), image::ImageFormat::Jpeg);
        assert_eq!(jpeg.dimensions(), png.dimensions());
        let e = estimate(luminance_table(&jpeg).as_ref());
        assert!((37..=43).contains(&e.percentage), "got {e}");

        Ok(())
    }

    #[test]
    fn should_not_create_target_when_encoding_fails() {
        let dir = tempfile::TempDir::new().expect("Cannot create temp dir");
        let target = dir.path().join("broken.jpg");

        let result = write_encoded(&target, |buf| {
            buf.extend_from_slice(&[0xFF, 0xD8]);
            Err(QualityError::ImageEncodingError)
        });

        assert!(matches!(result, Err(QualityError::ImageEncodingError)));
        assert!(!target.exists());
    }

    #[test]
    fn should_save_encoded_bytes_to_target() -> Result<()> {
        let dir = tempfile::TempDir::new().expect("Cannot create temp dir");
        let target = dir.path().join("saved.jpg");

        save_jpeg(&Media::from_bytes(&encode_png())?, 60, &target)?;

        let saved = Media::from_file(&target)?;
        let e = estimate(luminance_table(&saved).as_ref());
        assert!((57..=63).contains(&e.percentage), "got {e}");
        Ok(())
    }

    #[test]
    fn should_keep_grayscale_single_channel() -> Result<()> {
        let gray = image::GrayImage::from_fn(8, 8, |x, y| image::Luma([(x * y) as u8]));
        let mut png = std::io::Cursor::new(Vec::new());
        gray.write_to(&mut png, image::ImageOutputFormat::Png)
            .expect("Cannot encode PNG");

        let mut out = Vec::new();
        write_jpeg(&Media::from_bytes(png.get_ref())?, 90, &mut out)?;

        let jpeg = Media::from_bytes(&out)?;
        assert_eq!(jpeg.image().color(), ColorType::L8);
        let frame = jpeg.jpeg().and_then(|h| h.frame.as_ref()).expect("frame");
        assert_eq!(frame.components.len(), 1);

        Ok(())
    }
}
