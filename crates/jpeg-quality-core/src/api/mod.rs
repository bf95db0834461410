pub mod compress;
pub mod estimate;

pub use estimate::QualityReport;
