//! Classification of the byte following `0xFF` in a JPEG stream.

/// What a marker means for a header walk that stops at the first scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    StartOfImage,
    EndOfImage,
    StartOfScan,
    /// DQT, one or more quantization tables.
    QuantizationTables,
    /// SOFn, carries the frame coding process `n`.
    StartOfFrame(u8),
    /// RSTn or TEM, no length field follows.
    Standalone,
    /// Any other segment; a length field follows and the payload is skipped.
    Segment,
}

impl Marker {
    /// `None` for `0x00` (stuffed zero) and `0xFF` (fill), which are not markers.
    pub fn classify(code: u8) -> Option<Marker> {
        let marker = match code {
            0x00 | 0xFF => return None,
            0xD8 => Marker::StartOfImage,
            0xD9 => Marker::EndOfImage,
            0xDA => Marker::StartOfScan,
            0xDB => Marker::QuantizationTables,
            // 0xC4 (DHT), 0xC8 (JPG) and 0xCC (DAC) share the SOF range
            0xC4 | 0xC8 | 0xCC => Marker::Segment,
            0xC0..=0xCF => Marker::StartOfFrame(code - 0xC0),
            0x01 | 0xD0..=0xD7 => Marker::Standalone,
            _ => Marker::Segment,
        };
        Some(marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_classify_what_the_header_walk_branches_on() {
        assert_eq!(Marker::classify(0xD8), Some(Marker::StartOfImage));
        assert_eq!(Marker::classify(0xD9), Some(Marker::EndOfImage));
        assert_eq!(Marker::classify(0xDA), Some(Marker::StartOfScan));
        assert_eq!(Marker::classify(0xDB), Some(Marker::QuantizationTables));
    }

    #[test]
    fn should_carry_the_frame_process() {
        assert_eq!(Marker::classify(0xC0), Some(Marker::StartOfFrame(0)));
        assert_eq!(Marker::classify(0xC2), Some(Marker::StartOfFrame(2)));
        assert_eq!(Marker::classify(0xCF), Some(Marker::StartOfFrame(15)));
    }

    #[test]
    fn should_not_mistake_tables_in_sof_range_for_frames() {
        for code in [0xC4, 0xC8, 0xCC] {
            assert_eq!(Marker::classify(code), Some(Marker::Segment), "{code:#x}");
        }
    }

    #[test]
    fn should_separate_standalone_markers_from_segments() {
        assert_eq!(Marker::classify(0x01), Some(Marker::Standalone));
        assert_eq!(Marker::classify(0xD3), Some(Marker::Standalone));
        assert_eq!(Marker::classify(0xE1), Some(Marker::Segment));
        assert_eq!(Marker::classify(0xFE), Some(Marker::Segment));
        assert_eq!(Marker::classify(0x00), None);
        assert_eq!(Marker::classify(0xFF), None);
    }
}
