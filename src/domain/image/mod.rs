//! Image domain - conversion targets and results

mod entity;

pub use entity::{output_stem, ConvertedImage, OutputFormat};
