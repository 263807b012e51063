//! # pixpipe-ops
//!
//! Composable image transforms on top of `pixpipe-core`.
//!
//! # Modules
//!
//! - [`transform`] - the [`Transform`] trait, [`Sequence`], [`Conditional`],
//!   [`Identity`] and friends
//! - [`gamma`] - [`Gamma`] curve and the [`GammaCorrection`] wrapper
//! - [`pipeline`] - [`ImageSource`] boundary and [`Pipeline`]
//!
//! # Example
//!
//! ```rust
//! use pixpipe_core::{Image, ImageKind, Layout, Params, Raster};
//! use pixpipe_ops::{AlwaysChange, GammaCorrection, Identity, Sequence, Transform};
//!
//! // Resampling and blending steps go inside the correction wrapper
//! let chain = Sequence::new().with(AlwaysChange(Identity));
//! let corrected = GammaCorrection::new(chain, true);
//!
//! let src = Image::from(Raster::new(Layout::Nrgba, 16, 16));
//! let out = corrected.process(src, &Params::new())?;
//! assert_eq!(out.kind(), ImageKind::Nrgba);
//! # Ok::<(), pixpipe_ops::OpsError>(())
//! ```
//!
//! Per-request switches live in [`Params`](pixpipe_core::Params):
//!
//! ```rust,ignore
//! let params = Params::new().with("gamma_correction", false);
//! let out = corrected.process(image, &params)?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod gamma;
pub mod pipeline;
pub mod transform;

pub use error::{OpsError, OpsResult};
pub use gamma::{Gamma, GammaCorrection, CORRECTION_GAMMA, GAMMA_CORRECTION_KEY};
pub use pipeline::{ImageSource, Pipeline};
pub use transform::{AlwaysChange, Conditional, FnTransform, Identity, Sequence, Transform};
