//! Axis-aligned box geometry and coordinate rescaling.

mod bbox;
mod rescale;

pub use bbox::BBox;
pub use rescale::Rescale;
