//! JPEG quality estimation from the luminance quantization table.
//!
//! Every entry of the table is compared with the IJG reference table and
//! turned back into the quality that the libjpeg scaling formula
//!
//! ```text
//! scale = quality < 50 ? 5000 / quality : 200 - 2 * quality
//! entry = round(reference * scale / 100), clamped to [1, 255]
//! ```
//!
//! would need to produce it. The per-entry qualities are averaged. Encoders
//! with their own tables (Photoshop, mozjpeg, cameras) get a plausible
//! estimate, not their own quality setting.

use std::fmt;

use crate::jpeg::QuantizationTable;

/// IJG standard luminance table (ITU T.81 Annex K.1), quality 50, natural order.
#[rustfmt::skip]
pub const REFERENCE_LUMINANCE_TABLE: [u16; 64] = [
    16,  11,  10,  16,  24,  40,  51,  61,
    12,  12,  14,  19,  26,  58,  60,  55,
    14,  13,  16,  24,  40,  57,  69,  56,
    14,  17,  22,  29,  51,  87,  80,  62,
    18,  22,  37,  56,  68, 109, 103,  77,
    24,  35,  55,  64,  81, 104, 113,  92,
    49,  64,  78,  87, 103, 121, 120, 101,
    72,  92,  95,  98, 112, 100, 103,  99,
];

/// Estimate used when there is no quantization table to look at, e.g. for
/// lossless sources like PNG.
pub const FALLBACK_ESTIMATE: QualityEstimate = QualityEstimate {
    percentage: 90,
    category: QualityCategory::High,
};

/// Coarse label for an estimated quality percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QualityCategory {
    VeryLow,
    Low,
    Medium,
    High,
}

impl QualityCategory {
    /// Lower bounds are inclusive: 80 is High, 79 is Medium.
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            80.. => QualityCategory::High,
            50..=79 => QualityCategory::Medium,
            20..=49 => QualityCategory::Low,
            _ => QualityCategory::VeryLow,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QualityCategory::High => "High",
            QualityCategory::Medium => "Medium",
            QualityCategory::Low => "Low",
            QualityCategory::VeryLow => "Very Low",
        }
    }
}

impl fmt::Display for QualityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Estimated quality in percent (1-100) and its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityEstimate {
    pub percentage: u8,
    pub category: QualityCategory,
}

impl QualityEstimate {
    pub fn from_percentage(percentage: u8) -> Self {
        let percentage = percentage.clamp(1, 100);
        Self {
            percentage,
            category: QualityCategory::from_percentage(percentage),
        }
    }
}

impl fmt::Display for QualityEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}% ({})", self.percentage, self.category)
    }
}

/// Estimate the encoder quality from a luminance quantization table.
///
/// `None` means the source carried no table and yields [`FALLBACK_ESTIMATE`].
pub fn estimate(table: Option<&QuantizationTable>) -> QualityEstimate {
    let Some(table) = table else {
        return FALLBACK_ESTIMATE;
    };

    if average_value(table) <= 1.0 {
        return QualityEstimate::from_percentage(100);
    }

    let natural = table.to_natural();
    let sum: f64 = natural
        .iter()
        .zip(REFERENCE_LUMINANCE_TABLE.iter())
        .map(|(&entry, &reference)| implied_quality(entry, reference))
        .sum();
    let quality = (sum / 64.0).round().clamp(1.0, 100.0);

    QualityEstimate::from_percentage(quality as u8)
}

/// Arithmetic mean of the 64 table entries.
pub fn average_value(table: &QuantizationTable) -> f64 {
    table.values.iter().map(|&v| f64::from(v)).sum::<f64>() / 64.0
}

/// Luminance table libjpeg writes for `quality` (1-100).
pub fn ijg_luminance_table(quality: u8) -> QuantizationTable {
    let quality = u32::from(quality.clamp(1, 100));
    let scale = if quality < 50 {
        5000 / quality
    } else {
        200 - quality * 2
    };

    let mut natural = [0u16; 64];
    for (v, &reference) in natural.iter_mut().zip(REFERENCE_LUMINANCE_TABLE.iter()) {
        *v = ((u32::from(reference) * scale + 50) / 100).clamp(1, 255) as u16;
    }
    QuantizationTable::from_natural(0, &natural)
}

/// Quality at which `reference` would have been scaled to `entry`.
fn implied_quality(entry: u16, reference: u16) -> f64 {
    let scale = 100.0 * f64::from(entry) / f64::from(reference);
    let quality = if scale <= 100.0 {
        (200.0 - scale) / 2.0
    } else {
        5000.0 / scale
    };
    quality.clamp(1.0, 100.0)
}
