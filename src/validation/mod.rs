//! Block and chain validation.

pub mod median;
pub mod validate;

pub use median::{median_timestamp, MEDIAN_WINDOW};
pub use validate::{validate_block, validate_chain};
