use std::path::PathBuf;

use clap::Args;
use log::{debug, error};
use jpeg_quality_core::api::QualityReport;

use crate::{CliError, CliResult};

/// Estimates the quality JPEG images were saved with
#[derive(Args, Debug)]
pub struct EstimateArgs {
    /// Image file(s), non-JPEG images are reported as 90% (High)
    #[arg(value_name = "image file", required = true)]
    pub files: Vec<PathBuf>,
}

impl EstimateArgs {
    pub fn run(self) -> CliResult<()> {
        let total = self.files.len();
        let mut failed = 0;

        for file in self.files {
            debug!("estimating {}", file.display());
            match jpeg_quality_core::api::estimate::prepare()
                .from_file(&file)
                .execute()
            {
                Ok(report) => print!("{}", render_report(&report)),
                Err(e) => {
                    error!("{}: {e}", file.display());
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            return Err(CliError::SomeFilesFailed { failed, total });
        }
        Ok(())
    }
}

fn render_report(report: &QualityReport) -> String {
    format!(
        "--- Image: {} ---\nEstimated Quality: {}%\nQuality Category: {}\n",
        report.source.display(),
        report.estimate.percentage,
        report.estimate.category
    )
}
