//! The [`Transform`] trait and its combinators.
//!
//! A transform takes an [`Image`] by value and returns the processed image.
//! Returning the input unchanged is a move, so no-op paths never allocate.
//!
//! [`Transform::wants_change`] reports whether `process` could alter the
//! output under the given parameters. It must be side-effect free and may
//! be conservative: `true` is always safe, a wrong `false` makes callers
//! skip real work or build a wrong cache key.
//!
//! # Combinators
//!
//! | Type | `process` | `wants_change` |
//! |---|---|---|
//! | [`Sequence`] | each member in order, first error wins | any member |
//! | [`Conditional`] | inner only if it wants change | inner |
//! | [`Identity`] | input unchanged | `false` |
//! | [`AlwaysChange`] | inner | `true` |
//! | [`FnTransform`] | the closure | `true` |
//!
//! ```rust
//! use pixpipe_core::{Image, Layout, Params, Raster};
//! use pixpipe_ops::{Identity, Sequence, Transform};
//!
//! let seq = Sequence::new().with(Identity).with(Identity);
//! let params = Params::new();
//! assert!(!seq.wants_change(&params));
//!
//! let img = Image::from(Raster::new(Layout::Rgba, 2, 2));
//! let out = seq.process(img, &params).unwrap();
//! assert_eq!(out.dimensions(), (2, 2));
//! ```

use crate::OpsResult;
use pixpipe_core::{Image, Params};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// A composable image operation.
pub trait Transform: Send + Sync {
    /// Applies the transform.
    fn process(&self, image: Image, params: &Params) -> OpsResult<Image>;

    /// Whether `process` could change the image under `params`.
    fn wants_change(&self, params: &Params) -> bool;
}

impl<T: Transform + ?Sized> Transform for &T {
    fn process(&self, image: Image, params: &Params) -> OpsResult<Image> {
        (**self).process(image, params)
    }

    fn wants_change(&self, params: &Params) -> bool {
        (**self).wants_change(params)
    }
}

impl<T: Transform + ?Sized> Transform for Box<T> {
    fn process(&self, image: Image, params: &Params) -> OpsResult<Image> {
        (**self).process(image, params)
    }

    fn wants_change(&self, params: &Params) -> bool {
        (**self).wants_change(params)
    }
}

impl<T: Transform + ?Sized> Transform for Arc<T> {
    fn process(&self, image: Image, params: &Params) -> OpsResult<Image> {
        (**self).process(image, params)
    }

    fn wants_change(&self, params: &Params) -> bool {
        (**self).wants_change(params)
    }
}

// ============================================================================
// Sequence
// ============================================================================

/// Applies transforms in order.
#[derive(Default)]
pub struct Sequence {
    steps: Vec<Box<dyn Transform>>,
}

impl Sequence {
    /// Creates an empty sequence, which behaves as [`Identity`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a transform.
    pub fn push(&mut self, t: impl Transform + 'static) {
        self.steps.push(Box::new(t));
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, t: impl Transform + 'static) -> Self {
        self.push(t);
        self
    }

    /// Number of transforms.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Transform for Sequence {
    fn process(&self, image: Image, params: &Params) -> OpsResult<Image> {
        trace!(steps = self.steps.len(), "sequence");
        self.steps
            .iter()
            .try_fold(image, |image, step| step.process(image, params))
    }

    fn wants_change(&self, params: &Params) -> bool {
        self.steps.iter().any(|step| step.wants_change(params))
    }
}

impl From<Vec<Box<dyn Transform>>> for Sequence {
    fn from(steps: Vec<Box<dyn Transform>>) -> Self {
        Self { steps }
    }
}

impl FromIterator<Box<dyn Transform>> for Sequence {
    fn from_iter<I: IntoIterator<Item = Box<dyn Transform>>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("steps", &self.steps.len())
            .finish()
    }
}

// ============================================================================
// Conditional / Identity / AlwaysChange
// ============================================================================

/// Runs the inner transform only when it wants to change the image.
#[derive(Debug, Clone, Default)]
pub struct Conditional<T>(pub T);

impl<T: Transform> Transform for Conditional<T> {
    fn process(&self, image: Image, params: &Params) -> OpsResult<Image> {
        if !self.0.wants_change(params) {
            trace!("conditional: skipped");
            return Ok(image);
        }
        self.0.process(image, params)
    }

    fn wants_change(&self, params: &Params) -> bool {
        self.0.wants_change(params)
    }
}

/// Returns the input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Transform for Identity {
    fn process(&self, image: Image, _params: &Params) -> OpsResult<Image> {
        Ok(image)
    }

    fn wants_change(&self, _params: &Params) -> bool {
        false
    }
}

/// Forwards `process` and always reports a change.
///
/// Useful to force a wrapper such as [`GammaCorrection`] to run around a
/// transform whose own predicate says "no change".
///
/// [`GammaCorrection`]: crate::GammaCorrection
#[derive(Debug, Clone, Default)]
pub struct AlwaysChange<T>(pub T);

impl<T: Transform> Transform for AlwaysChange<T> {
    fn process(&self, image: Image, params: &Params) -> OpsResult<Image> {
        self.0.process(image, params)
    }

    fn wants_change(&self, _params: &Params) -> bool {
        true
    }
}

// ============================================================================
// FnTransform
// ============================================================================

/// Adapts a closure into a [`Transform`].
///
/// The closure cannot be inspected, so `wants_change` is always `true`.
pub struct FnTransform<F>(pub F);

impl<F> FnTransform<F>
where
    F: Fn(Image, &Params) -> OpsResult<Image> + Send + Sync,
{
    /// Wraps `f`.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Transform for FnTransform<F>
where
    F: Fn(Image, &Params) -> OpsResult<Image> + Send + Sync,
{
    fn process(&self, image: Image, params: &Params) -> OpsResult<Image> {
        (self.0)(image, params)
    }

    fn wants_change(&self, _params: &Params) -> bool {
        true
    }
}

impl<F> fmt::Debug for FnTransform<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnTransform")
    }
}
