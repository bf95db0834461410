pub mod compress;
pub mod estimate;
pub mod inspect;
