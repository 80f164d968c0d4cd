//! Everything drawing related.
//!
//! [`Canvas`] is the drawing interface; it only needs a way to set and read single pixels and
//! rasterizes lines, circles, rectangles and images on top of that. It's implemented by the
//! canvases of a [`crate::Matrix`] as well as by the in-memory [`Image`].

mod iterator;
pub use iterator::*;

mod image;
pub use image::*;

#[cfg(feature = "embedded-graphics")]
mod embedded;

// the outer module is for "everything canvas", and the inner module is the core Canvas
// trait
#[allow(clippy::module_inception)]
mod canvas;
pub use canvas::*;

use crate::Color;
