use std::path::{Path, PathBuf};

use log::info;

use crate::compress::{default_output_path, save_jpeg, DEFAULT_QUALITY};
use crate::{Media, QualityError};

pub fn prepare() -> CompressApi {
    CompressApi::default()
}

#[derive(Debug)]
pub struct CompressApi {
    image: Option<PathBuf>,
    output: Option<PathBuf>,
    quality: u8,
}

impl Default for CompressApi {
    fn default() -> Self {
        Self {
            image: None,
            output: None,
            quality: DEFAULT_QUALITY,
        }
    }
}

impl CompressApi {
    /// Source image in any format the `image` crate reads
    pub fn with_image<A: AsRef<Path>>(mut self, image: A) -> Self {
        self.image = Some(image.as_ref().to_path_buf());
        self
    }

    /// Where the JPEG goes, defaults to `<stem>_compressed_q<quality>.jpg` next to the image
    pub fn with_output<A: AsRef<Path>>(mut self, output: A) -> Self {
        self.output = Some(output.as_ref().to_path_buf());
        self
    }

    /// Set the output path
    /// If `None` is passed, the default output path is used
    pub fn use_output<A: AsRef<Path>>(mut self, output: Option<A>) -> Self {
        self.output = output.map(|o| o.as_ref().to_path_buf());
        self
    }

    /// JPEG quality handed to the encoder as is
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// Path the JPEG will be written to
    pub fn output_path(&self) -> Option<PathBuf> {
        self.output.clone().or_else(|| {
            self.image
                .as_ref()
                .map(|image| default_output_path(image, self.quality))
        })
    }

    /// Re-encode the image and return where it was written
    pub fn execute(self) -> Result<PathBuf, QualityError> {
        let Some(output) = self.output_path() else {
            return Err(QualityError::SourceNotSet);
        };
        let Some(image) = self.image else {
            return Err(QualityError::SourceNotSet);
        };

        let media = Media::from_file(&image)?;
        save_jpeg(&media, self.quality, &output)?;
        info!("{image:?} compressed to {output:?} at quality {}", self.quality);

        Ok(output)
    }
}
