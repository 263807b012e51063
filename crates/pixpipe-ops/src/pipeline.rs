//! Boundary between image providers and transforms.
//!
//! Fetching and decoding happen behind [`ImageSource`]; a [`Pipeline`]
//! pairs a source with a transform and runs one request through both.

use crate::{OpsResult, Transform};
use pixpipe_core::{Image, Params};
use std::sync::Arc;
use tracing::debug;

/// Provides decoded images.
pub trait ImageSource: Send + Sync {
    /// Returns the image for a request.
    fn image(&self, params: &Params) -> OpsResult<Image>;
}

impl<S: ImageSource + ?Sized> ImageSource for &S {
    fn image(&self, params: &Params) -> OpsResult<Image> {
        (**self).image(params)
    }
}

impl<S: ImageSource + ?Sized> ImageSource for Box<S> {
    fn image(&self, params: &Params) -> OpsResult<Image> {
        (**self).image(params)
    }
}

impl<S: ImageSource + ?Sized> ImageSource for Arc<S> {
    fn image(&self, params: &Params) -> OpsResult<Image> {
        (**self).image(params)
    }
}

/// A source followed by a transform.
#[derive(Debug, Clone)]
pub struct Pipeline<S, T> {
    source: S,
    transform: T,
}

impl<S: ImageSource, T: Transform> Pipeline<S, T> {
    /// Pairs `source` with `transform`.
    pub fn new(source: S, transform: T) -> Self {
        Self { source, transform }
    }

    /// The image provider.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The transform.
    pub fn transform(&self) -> &T {
        &self.transform
    }

    /// Fetches the image for `params` and applies the transform.
    pub fn run(&self, params: &Params) -> OpsResult<Image> {
        let image = self.source.image(params)?;
        debug!(kind = ?image.kind(), dimensions = ?image.dimensions(), %params, "pipeline");
        self.transform.process(image, params)
    }

    /// Whether the transform would alter the source image.
    pub fn wants_change(&self, params: &Params) -> bool {
        self.transform.wants_change(params)
    }
}
