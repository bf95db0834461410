//! JPEG header parsing.
//!
//! Walks the marker segments from SOI up to the first SOS and keeps the
//! quantization tables (DQT) and the frame header (SOF), which says which
//! table each component is quantized with. Entropy-coded data is never
//! read.

use std::io::{Cursor, ErrorKind, Read, Seek, SeekFrom};

use log::{debug, trace};

use super::marker::Marker;
use crate::error::{QualityError, Result};

/// Position in natural (row-major) order of the n-th zigzag entry.
pub const ZIGZAG_TO_NATURAL: [usize; 64] = [
    0, 1, 8, 16, 9, 2, 3, 10, 17, 24, 32, 25, 18, 11, 4, 5, 12, 19, 26, 33, 40, 48, 41, 34, 27, 20,
    13, 6, 7, 14, 21, 28, 35, 42, 49, 56, 57, 50, 43, 36, 29, 22, 15, 23, 30, 37, 44, 51, 58, 59,
    52, 45, 38, 31, 39, 46, 53, 60, 61, 54, 47, 55, 62, 63,
];

/// One DQT table, entries kept in stream (zigzag) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizationTable {
    /// Destination slot, 0 to 3.
    pub id: u8,
    /// 0 for 8-bit entries, 1 for 16-bit entries.
    pub precision: u8,
    pub values: [u16; 64],
}

impl QuantizationTable {
    /// Build a table from values in natural (row-major) order.
    ///
    /// Precision is 16-bit only when some value does not fit a byte.
    pub fn from_natural(id: u8, natural: &[u16; 64]) -> Self {
        let values = ZIGZAG_TO_NATURAL.map(|at| natural[at]);
        let precision = u8::from(natural.iter().any(|&v| v > 0xFF));
        Self {
            id,
            precision,
            values,
        }
    }

    pub fn to_natural(&self) -> [u16; 64] {
        let mut natural = [0u16; 64];
        for (&at, &value) in ZIGZAG_TO_NATURAL.iter().zip(&self.values) {
            natural[at] = value;
        }
        natural
    }

    pub fn bits(&self) -> u8 {
        8 << self.precision.min(1)
    }

    /// 8x8 grid in natural order, `x` columns and `y` rows, one line each.
    pub fn to_ascii_table(&self) -> String {
        let mut out = String::from("|    |");
        for x in 0..8 {
            out += &format!("   x{x} |");
        }
        out += "\n|----|";
        out += &"------|".repeat(8);
        out.push('\n');

        for (y, row) in self.to_natural().chunks_exact(8).enumerate() {
            out += &format!("| y{y} ");
            for value in row {
                out += &format!("| {value:4} ");
            }
            out += "|\n";
        }

        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub id: u8,
    pub h_sampling: u8,
    pub v_sampling: u8,
    /// Slot of the quantization table this component uses.
    pub quant_table_id: u8,
}

/// Contents of the SOFn segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameInfo {
    /// The `n` of SOFn.
    pub sof_type: u8,
    /// Bits per sample.
    pub precision: u8,
    pub height: u16,
    pub width: u16,
    pub components: Vec<Component>,
}

impl FrameInfo {
    /// Name of the coding process selected by SOFn.
    pub fn coding_process(&self) -> &'static str {
        match self.sof_type & 0x07 {
            0 if self.sof_type == 0 => "baseline",
            0 | 1 => "extended sequential",
            2 => "progressive",
            3 => "lossless",
            5 => "differential sequential",
            6 => "differential progressive",
            _ => "differential lossless",
        }
    }

    /// SOF9 and above use arithmetic instead of Huffman coding.
    pub fn is_arithmetic_coded(&self) -> bool {
        self.sof_type >= 8
    }
}

/// Tables and frame header found before the first scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JpegHeader {
    /// Indexed by table id. A later DQT for the same id replaces the earlier one.
    pub quant_tables: [Option<QuantizationTable>; 4],
    pub frame: Option<FrameInfo>,
}

impl JpegHeader {
    /// Table the `index`-th frame component is quantized with.
    pub fn table_for_component(&self, index: usize) -> Option<&QuantizationTable> {
        let component = self.frame.as_ref()?.components.get(index)?;
        self.quant_tables
            .get(usize::from(component.quant_table_id))?
            .as_ref()
    }

    /// Defined tables, lowest id first.
    pub fn tables(&self) -> impl Iterator<Item = &QuantizationTable> {
        self.quant_tables.iter().flatten()
    }
}

pub fn parse_header(data: &[u8]) -> Result<JpegHeader> {
    parse_header_reader(&mut Cursor::new(data))
}

/// Parse the header of a JPEG from a reader positioned at SOI.
///
/// Stops at the first SOS or at EOI. A stream that ends before either
/// yields what was found until then.
pub fn parse_header_reader<R: Read + Seek>(reader: &mut R) -> Result<JpegHeader> {
    let mut soi = [0u8; 2];
    if reader.read_exact(&mut soi).is_err() || soi != [0xFF, 0xD8] {
        return Err(QualityError::invalid_jpeg("missing SOI marker"));
    }

    let mut header = JpegHeader::default();
    while let Some(marker) = next_marker(reader)? {
        trace!("marker {marker:?}");
        match marker {
            Marker::StartOfScan | Marker::EndOfImage => break,
            Marker::QuantizationTables => parse_dqt(&read_payload(reader)?, &mut header)?,
            Marker::StartOfFrame(n) => header.frame = Some(parse_sof(n, &read_payload(reader)?)?),
            Marker::Segment => {
                let skip = payload_len(reader)?;
                reader.seek(SeekFrom::Current(i64::from(skip)))?;
            }
            Marker::StartOfImage | Marker::Standalone => {}
        }
    }

    debug!(
        "JPEG header: {} quantization table(s), frame: {}",
        header.tables().count(),
        header.frame.is_some()
    );
    Ok(header)
}

/// Next marker after the current position, skipping fill and stuffed bytes.
fn next_marker<R: Read>(reader: &mut R) -> Result<Option<Marker>> {
    let mut after_ff = false;
    while let Some(byte) = next_byte(reader)? {
        if after_ff {
            if let Some(marker) = Marker::classify(byte) {
                return Ok(Some(marker));
            }
        }
        after_ff = byte == 0xFF;
    }
    Ok(None)
}

fn next_byte<R: Read>(reader: &mut R) -> Result<Option<u8>> {
    let mut byte = [0u8; 1];
    match reader.read_exact(&mut byte) {
        Ok(()) => Ok(Some(byte[0])),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Segment length without the two length bytes themselves.
fn payload_len<R: Read>(reader: &mut R) -> Result<u16> {
    let mut len = [0u8; 2];
    reader
        .read_exact(&mut len)
        .map_err(|_| QualityError::invalid_jpeg("segment length truncated"))?;
    u16::from_be_bytes(len)
        .checked_sub(2)
        .ok_or_else(|| QualityError::invalid_jpeg("segment length below 2"))
}

fn read_payload<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut payload = vec![0u8; usize::from(payload_len(reader)?)];
    reader
        .read_exact(&mut payload)
        .map_err(|_| QualityError::invalid_jpeg("segment truncated"))?;
    Ok(payload)
}

fn parse_dqt(mut data: &[u8], header: &mut JpegHeader) -> Result<()> {
    while let Some((&pq_tq, rest)) = data.split_first() {
        let (precision, id) = (pq_tq >> 4, pq_tq & 0x0F);
        if id > 3 {
            return Err(QualityError::invalid_jpeg(format!(
                "quantization table id {id} out of range"
            )));
        }
        let width = match precision {
            0 => 1,
            1 => 2,
            _ => {
                return Err(QualityError::invalid_jpeg(format!(
                    "quantization table precision {precision} unknown"
                )))
            }
        };
        if rest.len() < 64 * width {
            return Err(QualityError::invalid_jpeg("DQT segment too short"));
        }

        let (entries, rest) = rest.split_at(64 * width);
        let mut values = [0u16; 64];
        for (value, raw) in values.iter_mut().zip(entries.chunks_exact(width)) {
            *value = raw.iter().fold(0, |acc, &b| (acc << 8) | u16::from(b));
        }
        trace!("DQT table {id}, {}-bit", 8 * width);

        header.quant_tables[usize::from(id)] = Some(QuantizationTable {
            id,
            precision,
            values,
        });
        data = rest;
    }
    Ok(())
}

fn parse_sof(sof_type: u8, data: &[u8]) -> Result<FrameInfo> {
    let [precision, h_hi, h_lo, w_hi, w_lo, count, rest @ ..] = data else {
        return Err(QualityError::invalid_jpeg("SOF segment too short"));
    };
    let listed = rest
        .get(..usize::from(*count) * 3)
        .ok_or_else(|| QualityError::invalid_jpeg("SOF segment too short for its components"))?;

    let components = listed
        .chunks_exact(3)
        .map(|c| Component {
            id: c[0],
            h_sampling: c[1] >> 4,
            v_sampling: c[1] & 0x0F,
            quant_table_id: c[2],
        })
        .collect();

    Ok(FrameInfo {
        sof_type,
        precision: *precision,
        height: u16::from_be_bytes([*h_hi, *h_lo]),
        width: u16::from_be_bytes([*w_hi, *w_lo]),
        components,
    })
}
