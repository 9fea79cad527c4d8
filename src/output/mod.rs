//! Output encoders.

mod svg;

pub use svg::SvgWriter;
