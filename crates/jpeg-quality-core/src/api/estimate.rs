use std::path::{Path, PathBuf};

use image::ImageFormat;

use crate::extract::luminance_table;
use crate::jpeg::QuantizationTable;
use crate::quality::{estimate, QualityEstimate};
use crate::{Media, QualityError};

pub fn prepare() -> EstimateApi {
    EstimateApi::default()
}

#[derive(Default, Debug)]
pub struct EstimateApi {
    source: Option<PathBuf>,
}

/// Everything the estimation found out about one image.
#[derive(Debug, Clone)]
pub struct QualityReport {
    pub source: PathBuf,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    /// Luminance table the estimate is based on, `None` for non-JPEG sources
    pub table: Option<QuantizationTable>,
    pub estimate: QualityEstimate,
}

impl EstimateApi {
    /// The image whose quality should be estimated
    pub fn from_file(mut self, source: impl AsRef<Path>) -> Self {
        self.source = Some(source.as_ref().to_path_buf());
        self
    }

    /// Load the image and estimate its quality
    pub fn execute(self) -> Result<QualityReport, QualityError> {
        let Some(source) = self.source else {
            return Err(QualityError::SourceNotSet);
        };

        let media = Media::from_file(&source)?;
        let table = luminance_table(&media);
        let estimate = estimate(table.as_ref());
        let (width, height) = media.dimensions();

        Ok(QualityReport {
            source,
            format: media.format(),
            width,
            height,
            table,
            estimate,
        })
    }
}
