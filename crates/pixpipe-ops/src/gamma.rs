//! Gamma transform and gamma-correction wrapper.
//!
//! [`Gamma`] applies `out = in^(1/gamma)` to straight (non-premultiplied)
//! color through a 65536-entry lookup table built once at construction.
//! Alpha is never touched.
//!
//! [`GammaCorrection`] brackets another transform with a decode to linear
//! light (`Gamma(1/2.2)`) and a re-encode (`Gamma(2.2)`), so resampling and
//! blending inside it happen in linear space.
//!
//! ```rust
//! use pixpipe_core::{Image, Layout, Params, Raster};
//! use pixpipe_ops::{Gamma, Transform};
//!
//! let src = Image::from(Raster::new(Layout::Nrgba, 8, 8));
//! let out = Gamma::new(2.2, false).process(src, &Params::new()).unwrap();
//! assert_eq!(out.kind(), pixpipe_core::ImageKind::Nrgba);
//! ```

use crate::{OpsResult, Transform};
use pixpipe_core::{copy, reader, Canvas, Image, Layout, Params, Pixel};
use std::fmt;
use tracing::{debug, trace};

/// Exponent used by [`GammaCorrection`].
pub const CORRECTION_GAMMA: f64 = 2.2;

/// Parameter overriding [`GammaCorrection`]'s default enabled state.
pub const GAMMA_CORRECTION_KEY: &str = "gamma_correction";

const TABLE_SIZE: usize = 1 << 16;

/// Gamma transform.
///
/// `high_quality` selects the output buffer: 16-bit straight RGBA
/// ([`Layout::Nrgba64`]) when set, otherwise the source's own
/// representation.
pub struct Gamma {
    gamma: f64,
    high_quality: bool,
    table: Box<[u16; TABLE_SIZE]>,
}

impl Gamma {
    /// Builds the lookup table `round(65535 * (i / 65535)^(1 / gamma))`.
    pub fn new(gamma: f64, high_quality: bool) -> Self {
        let inv = 1.0 / gamma;
        let mut table = Box::new([0u16; TABLE_SIZE]);
        for (i, v) in table.iter_mut().enumerate() {
            *v = ((i as f64 / 65535.0).powf(inv) * 65535.0 + 0.5) as u16;
        }
        Self {
            gamma,
            high_quality,
            table,
        }
    }

    /// Exponent this transform was built with.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Whether output is forced to 16-bit straight RGBA.
    pub fn high_quality(&self) -> bool {
        self.high_quality
    }

    /// Table entry for channel value `v`.
    #[inline]
    pub fn lookup(&self, v: u16) -> u16 {
        self.table[v as usize]
    }

    /// Applies the curve to `image`, returning a new image.
    pub fn apply(&self, image: &Image) -> Image {
        let (width, height) = image.dimensions();
        trace!(
            width,
            height,
            gamma = self.gamma,
            high_quality = self.high_quality,
            "gamma"
        );

        let mut canvas = if self.high_quality {
            Canvas::new(Layout::Nrgba64, width, height)
        } else {
            Canvas::new_like(image)
        };
        let read = reader(image);
        let table = &*self.table;
        canvas.fill_with(|x, y| {
            let p = read(x, y).to_straight();
            Pixel::new(
                table[p.r as usize],
                table[p.g as usize],
                table[p.b as usize],
                p.a,
            )
            .to_premultiplied()
        });
        canvas.into_image()
    }
}

impl Transform for Gamma {
    fn process(&self, image: Image, _params: &Params) -> OpsResult<Image> {
        Ok(self.apply(&image))
    }

    /// Always `true`: the table is not compared against identity.
    fn wants_change(&self, _params: &Params) -> bool {
        true
    }
}

impl fmt::Debug for Gamma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gamma")
            .field("gamma", &self.gamma)
            .field("high_quality", &self.high_quality)
            .finish()
    }
}

/// Runs a transform in linear light.
///
/// Enabled state comes from the `"gamma_correction"` parameter when present
/// and from the constructor otherwise. When the inner transform reports no
/// change, nothing runs at all.
///
/// The result keeps the input's representation: if correction widened an
/// 8-bit input to 16 bits, it is copied back into a buffer of the original
/// kind.
pub struct GammaCorrection<T> {
    inner: T,
    enabled: bool,
    before: Gamma,
    after: Gamma,
}

impl<T: Transform> GammaCorrection<T> {
    /// Wraps `inner`; `enabled` is the default when the request does not
    /// say.
    pub fn new(inner: T, enabled: bool) -> Self {
        Self {
            inner,
            enabled,
            before: Gamma::new(1.0 / CORRECTION_GAMMA, true),
            after: Gamma::new(CORRECTION_GAMMA, true),
        }
    }

    /// The wrapped transform.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Resolves the enabled flag for a request.
    ///
    /// # Errors
    ///
    /// A present `"gamma_correction"` that is not a boolean.
    pub fn is_enabled(&self, params: &Params) -> OpsResult<bool> {
        if params.has(GAMMA_CORRECTION_KEY) {
            return Ok(params.get_bool(GAMMA_CORRECTION_KEY)?);
        }
        Ok(self.enabled)
    }

    fn process_linear(&self, image: Image, params: &Params) -> OpsResult<Image> {
        let original = image.kind();
        let linear = self.before.apply(&image);
        let processed = self.inner.process(linear, params)?;
        let encoded = self.after.apply(&processed);

        if encoded.is_high_quality() && !original.is_high_quality() {
            let (width, height) = encoded.dimensions();
            debug!(?original, width, height, "gamma correction: restoring representation");
            let mut canvas = Canvas::new_for_kind(original, width, height);
            copy(&mut canvas, &encoded);
            return Ok(canvas.into_image());
        }
        Ok(encoded)
    }
}

impl<T: Transform> Transform for GammaCorrection<T> {
    fn process(&self, image: Image, params: &Params) -> OpsResult<Image> {
        if !self.inner.wants_change(params) {
            return Ok(image);
        }
        if !self.is_enabled(params)? {
            trace!("gamma correction: disabled");
            return self.inner.process(image, params);
        }
        self.process_linear(image, params)
    }

    fn wants_change(&self, params: &Params) -> bool {
        self.inner.wants_change(params)
    }
}

impl<T: fmt::Debug> fmt::Debug for GammaCorrection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GammaCorrection")
            .field("inner", &self.inner)
            .field("enabled", &self.enabled)
            .finish()
    }
}
