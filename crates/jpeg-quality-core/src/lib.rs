//! # JPEG Quality Core API
//!
//! Estimates the quality setting a JPEG was encoded with by reading its
//! luminance quantization table, and re-encodes images as JPEG.
//!
//! The building blocks are
//! - [`Media`] a decoded image plus its JPEG header, if it was a JPEG
//! - [`luminance_table`] the quantization table of the Y component, or `None`
//! - [`estimate`] the table (or its absence) turned into a [`QualityEstimate`]
//!
//! # Usage Examples
//!
//! ## Estimate the quality of an image
//!
//! ```rust,no_run
//! let report = jpeg_quality_core::api::estimate::prepare()
//!     .from_file("holiday.jpg")
//!     .execute()
//!     .expect("Failed to estimate quality");
//!
//! println!("Estimated Quality: {}%", report.estimate.percentage);
//! println!("Quality Category: {}", report.estimate.category);
//! ```
//!
//! ## Re-encode an image as JPEG
//!
//! ```rust,no_run
//! let written = jpeg_quality_core::api::compress::prepare()
//!     .with_image("screenshot.png")
//!     .with_quality(60)               // defaults to 75
//!     .execute()                      // writes screenshot_compressed_q60.jpg
//!     .expect("Failed to compress image");
//! ```
//!
//! ## Work on the tables directly
//!
//! ```rust
//! use jpeg_quality_core::{estimate, QualityCategory, QuantizationTable, REFERENCE_LUMINANCE_TABLE};
//!
//! let table = QuantizationTable::from_natural(0, &REFERENCE_LUMINANCE_TABLE);
//! assert_eq!(estimate(Some(&table)).percentage, 50);
//! assert_eq!(estimate(None).category, QualityCategory::High);
//! ```

#![warn(clippy::redundant_else)]

pub mod api;
pub mod compress;
pub mod error;
pub mod extract;
pub mod jpeg;
pub mod media;
pub mod quality;

pub use crate::compress::{default_output_path, save_jpeg, write_jpeg, DEFAULT_QUALITY};
pub use crate::error::{QualityError, Result};
pub use crate::extract::luminance_table;
pub use crate::jpeg::QuantizationTable;
pub use crate::media::Media;
pub use crate::quality::{
    estimate, QualityCategory, QualityEstimate, FALLBACK_ESTIMATE, REFERENCE_LUMINANCE_TABLE,
};

#[cfg(test)]
mod test_utils {
    use std::io::Cursor;

    use image::codecs::jpeg::JpegEncoder;
    use image::{ColorType, ImageBuffer, ImageOutputFormat, RgbImage};

    /// 16x16 image with a colour gradient, so the encoders have something to chew on
    pub fn prepare_16x16_gradient() -> RgbImage {
        ImageBuffer::from_fn(16, 16, |x, y| {
            image::Rgb([(x * 16) as u8, (y * 16) as u8, ((x + y) * 8) as u8])
        })
    }

    pub fn encode_jpeg(quality: u8) -> Vec<u8> {
        let img = prepare_16x16_gradient();
        let mut buf = Vec::new();
        JpegEncoder::new_with_quality(&mut buf, quality)
            .encode(img.as_raw(), img.width(), img.height(), ColorType::Rgb8)
            .expect("Cannot encode JPEG");
        buf
    }

    pub fn encode_png() -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        prepare_16x16_gradient()
            .write_to(&mut buf, ImageOutputFormat::Png)
            .expect("Cannot encode PNG");
        buf.into_inner()
    }

    /// DQT payload for one table, `values` written as given
    pub fn dqt_segment(id: u8, precision: u8, values: &[u16; 64]) -> Vec<u8> {
        let mut payload = vec![(precision << 4) | id];
        for &v in values {
            if precision == 0 {
                payload.push(v as u8);
            } else {
                payload.extend_from_slice(&v.to_be_bytes());
            }
        }
        payload
    }

    /// SOF payload, components as `(id, sampling, quant_table_id)`
    pub fn sof_segment(height: u16, width: u16, components: &[(u8, u8, u8)]) -> Vec<u8> {
        let mut payload = vec![8];
        payload.extend_from_slice(&height.to_be_bytes());
        payload.extend_from_slice(&width.to_be_bytes());
        payload.push(components.len() as u8);
        for &(id, sampling, table) in components {
            payload.extend_from_slice(&[id, sampling, table]);
        }
        payload
    }

    /// Assembles SOI, the given segments and EOI
    pub struct JpegBuilder {
        data: Vec<u8>,
    }

    impl JpegBuilder {
        pub fn new() -> Self {
            Self {
                data: vec![0xFF, 0xD8],
            }
        }

        pub fn segment(mut self, marker: u8, payload: Vec<u8>) -> Self {
            self.data.extend_from_slice(&[0xFF, marker]);
            self.data
                .extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
            self.data.extend(payload);
            self
        }

        pub fn build(mut self) -> Vec<u8> {
            self.data.extend_from_slice(&[0xFF, 0xD9]);
            self.data
        }
    }
}
