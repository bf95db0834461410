use log::warn;

use crate::jpeg::{JpegHeader, QuantizationTable};
use crate::media::Media;

/// Luminance quantization table of a decoded image.
///
/// That is the table the first frame component (Y) refers to. `None` for
/// anything that was not decoded from a JPEG or whose JPEG header carried
/// no tables.
pub fn luminance_table(media: &Media) -> Option<QuantizationTable> {
    media.jpeg().and_then(luminance_table_of)
}

/// Same as [`luminance_table`] on an already parsed header.
pub fn luminance_table_of(header: &JpegHeader) -> Option<QuantizationTable> {
    let (wanted, direct) = match &header.frame {
        Some(frame) => (
            frame.components.first().map(|c| c.quant_table_id),
            header.table_for_component(0),
        ),
        // tables-only stream, nothing references them
        None => (Some(0), header.quant_tables[0].as_ref()),
    };
    if let Some(table) = direct {
        return Some(table.clone());
    }

    let fallback = header.tables().next()?;
    match wanted {
        Some(id) => warn!(
            "Luminance quantization table {id} not found, using table {} instead",
            fallback.id
        ),
        None => warn!(
            "Frame lists no components, using quantization table {}",
            fallback.id
        ),
    }
    Some(fallback.clone())
}
