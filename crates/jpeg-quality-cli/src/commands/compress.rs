use std::path::PathBuf;

use clap::Args;
use jpeg_quality_core::DEFAULT_QUALITY;

use crate::CliResult;

/// Saves an image as JPEG at the given quality
#[derive(Args, Debug)]
pub struct CompressArgs {
    /// Image to compress, any format that can be decoded
    #[arg(value_name = "image file")]
    pub media: PathBuf,

    /// JPEG quality (1-100)
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_QUALITY,
        value_parser = clap::value_parser!(u8).range(1..=100)
    )]
    pub quality: u8,

    /// Output JPEG file, defaults to <stem>_compressed_q<quality>.jpg next to the input
    #[arg(short = 'o', long = "out", value_name = "output image file")]
    pub output: Option<PathBuf>,
}

impl CompressArgs {
    pub fn run(self) -> CliResult<()> {
        let written = jpeg_quality_core::api::compress::prepare()
            .with_image(&self.media)
            .use_output(self.output)
            .with_quality(self.quality)
            .execute()?;

        println!(
            "Successfully compressed image saved to {} with quality {}%",
            written.display(),
            self.quality
        );
        Ok(())
    }
}
