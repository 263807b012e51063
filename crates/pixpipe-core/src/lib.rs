//! # pixpipe-core
//!
//! Core types for the pixpipe image pipeline.
//!
//! - [`Image`] - closed set of decoded image representations plus a
//!   [`PixelSource`] fallback
//! - [`Pixel`] - canonical 16-bit premultiplied RGBA value
//! - [`accessor`] - per-representation read/write functions, chosen once per image
//! - [`Canvas`] - freshly allocated output buffer, and [`copy`]
//! - [`parallel`] - row-range dispatch used by every per-pixel loop
//! - [`Params`] - typed request parameters
//!
//! ## Crate Structure
//!
//! ```text
//! pixpipe-core (this crate)
//!    ^
//!    |
//!    +-- pixpipe-ops (Transform, combinators, gamma)
//!    +-- pixpipe-bench
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - Serialize/Deserialize for [`Params`], [`Value`], [`Pixel`], [`Layout`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod accessor;
pub mod canvas;
pub mod error;
pub mod image;
pub mod parallel;
pub mod params;
pub mod pixel;

pub use accessor::{reader, ReadFn, Writer};
pub use canvas::{copy, Canvas};
pub use error::{Error, Result};
pub use image::{Image, ImageKind, Layout, Paletted, PixelSource, Raster, SubsampleRatio, Uniform, YCbCr};
pub use params::{Params, Value};
pub use pixel::Pixel;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::accessor::{reader, Writer};
    pub use crate::canvas::{copy, Canvas};
    pub use crate::error::{Error, Result};
    pub use crate::image::{Image, ImageKind, Layout, Raster};
    pub use crate::params::{Params, Value};
    pub use crate::pixel::Pixel;
}
