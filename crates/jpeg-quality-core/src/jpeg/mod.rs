//! JPEG header access.
//!
//! The `image` crate decodes pixels but keeps the quantization tables to
//! itself, so the tables are read straight from the marker segments.

pub mod marker;
pub mod parser;

pub use marker::Marker;
pub use parser::{
    parse_header, parse_header_reader, Component, FrameInfo, JpegHeader, QuantizationTable,
    ZIGZAG_TO_NATURAL,
};
