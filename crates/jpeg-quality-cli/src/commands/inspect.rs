use std::path::{Path, PathBuf};

use clap::Args;
use log::{debug, error};
use jpeg_quality_core::extract::luminance_table_of;
use jpeg_quality_core::jpeg::JpegHeader;
use jpeg_quality_core::quality::average_value;
use jpeg_quality_core::{estimate, Media};

use crate::{CliError, CliResult};

/// Shows the quantization tables of JPEG images
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// The JPEG image file(s) to inspect
    #[arg(value_name = "jpeg file", required = true)]
    pub files: Vec<PathBuf>,
}

impl InspectArgs {
    pub fn run(self) -> CliResult<()> {
        let total = self.files.len();
        let mut failed = 0;

        for file in self.files {
            debug!("inspecting {}", file.display());
            match Media::from_file(&file) {
                Ok(media) => match media.jpeg() {
                    Some(header) => print!("{}", render_tables(&file, header)),
                    None => println!(
                        "# `{}` is a {:?} image without quantization tables\n",
                        display_name(&file),
                        media.format()
                    ),
                },
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

fn display_name(file: &Path) -> String {
    file.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string())
}

fn render_tables(file: &Path, header: &JpegHeader) -> String {
    let mut out = format!("# Quantization Tables of `{}`\n\n", display_name(file));

    if let Some(frame) = &header.frame {
        out.push_str(&format!(
            "Frame: {}x{}, {}, {} coded, {} component(s)\n\n",
            frame.width,
            frame.height,
            frame.coding_process(),
            if frame.is_arithmetic_coded() { "arithmetic" } else { "Huffman" },
            frame.components.len()
        ));
    }

    for table in header.tables() {
        out.push_str(&format!(
            "## Table {} (precision: {}-bit)\n",
            table.id,
            table.bits()
        ));
        out.push_str(&table.to_ascii_table());
        out.push('\n');
    }

    let luminance = luminance_table_of(header);
    if let Some(table) = &luminance {
        out.push_str(&format!(
            "Luminance table: {}, average value: {:.2}\n",
            table.id,
            average_value(table)
        ));
    }
    out.push_str(&format!("Estimated Quality: {}\n\n", estimate(luminance.as_ref())));

    out
}
