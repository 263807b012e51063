//! Image representations.
//!
//! [`Image`] is a closed set of storage layouts plus one open fallback:
//!
//! | Variant | Storage |
//! |---|---|
//! | [`Image::Raster`] | one packed plane, see [`Layout`] |
//! | [`Image::Paletted`] | 8-bit indices into a palette of [`Pixel`] |
//! | [`Image::YCbCr`] | luma plane + two subsampled chroma planes |
//! | [`Image::Uniform`] | one color of infinite extent |
//! | [`Image::Generic`] | any [`PixelSource`] implementation |
//!
//! All images have their origin at `(0, 0)`. 16-bit samples are stored
//! big-endian.
//!
//! # Memory Layout
//!
//! Rasters are row-major with an explicit `stride` in bytes:
//!
//! ```text
//! pix[y * stride + x * bytes_per_pixel .. + bytes_per_pixel]
//! ```
//!
//! ```rust
//! use pixpipe_core::{Image, ImageKind, Layout, Raster};
//!
//! let raster = Raster::new(Layout::Nrgba, 4, 2);
//! assert_eq!(raster.stride(), 16);
//!
//! let image = Image::from(raster);
//! assert_eq!(image.kind(), ImageKind::Nrgba);
//! assert_eq!(image.dimensions(), (4, 2));
//! ```

use crate::{Error, Pixel, Result};
use std::fmt;
use std::sync::Arc;

/// Sample layout of a packed [`Raster`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Layout {
    /// 8-bit premultiplied RGBA.
    Rgba,
    /// 16-bit premultiplied RGBA.
    Rgba64,
    /// 8-bit straight-alpha RGBA.
    Nrgba,
    /// 16-bit straight-alpha RGBA.
    Nrgba64,
    /// 8-bit alpha mask.
    Alpha,
    /// 16-bit alpha mask.
    Alpha16,
    /// 8-bit grayscale, opaque.
    Gray,
    /// 16-bit grayscale, opaque.
    Gray16,
    /// 8-bit CMYK ink coverage, opaque.
    Cmyk,
}

impl Layout {
    /// Bytes per pixel.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Alpha | Self::Gray => 1,
            Self::Alpha16 | Self::Gray16 => 2,
            Self::Rgba | Self::Nrgba | Self::Cmyk => 4,
            Self::Rgba64 | Self::Nrgba64 => 8,
        }
    }

    /// Representation tag of a raster with this layout.
    #[inline]
    pub const fn kind(self) -> ImageKind {
        match self {
            Self::Rgba => ImageKind::Rgba,
            Self::Rgba64 => ImageKind::Rgba64,
            Self::Nrgba => ImageKind::Nrgba,
            Self::Nrgba64 => ImageKind::Nrgba64,
            Self::Alpha => ImageKind::Alpha,
            Self::Alpha16 => ImageKind::Alpha16,
            Self::Gray => ImageKind::Gray,
            Self::Gray16 => ImageKind::Gray16,
            Self::Cmyk => ImageKind::Cmyk,
        }
    }
}

/// Fieldless tag naming an image's representation.
///
/// Used wherever the pipeline needs to inspect "what kind of image is
/// this" without touching pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    /// See [`Layout::Rgba`].
    Rgba,
    /// See [`Layout::Rgba64`].
    Rgba64,
    /// See [`Layout::Nrgba`].
    Nrgba,
    /// See [`Layout::Nrgba64`].
    Nrgba64,
    /// See [`Layout::Alpha`].
    Alpha,
    /// See [`Layout::Alpha16`].
    Alpha16,
    /// See [`Layout::Gray`].
    Gray,
    /// See [`Layout::Gray16`].
    Gray16,
    /// See [`Layout::Cmyk`].
    Cmyk,
    /// See [`Paletted`].
    Paletted,
    /// See [`YCbCr`].
    YCbCr,
    /// See [`Uniform`].
    Uniform,
    /// See [`PixelSource`].
    Generic,
}

impl ImageKind {
    /// Whether this is one of the 64-bits-per-pixel color kinds.
    #[inline]
    pub const fn is_high_quality(self) -> bool {
        matches!(self, Self::Rgba64 | Self::Nrgba64)
    }

    /// Packed layout for this kind, if it is writable.
    #[inline]
    pub const fn layout(self) -> Option<Layout> {
        match self {
            Self::Rgba => Some(Layout::Rgba),
            Self::Rgba64 => Some(Layout::Rgba64),
            Self::Nrgba => Some(Layout::Nrgba),
            Self::Nrgba64 => Some(Layout::Nrgba64),
            Self::Alpha => Some(Layout::Alpha),
            Self::Alpha16 => Some(Layout::Alpha16),
            Self::Gray => Some(Layout::Gray),
            Self::Gray16 => Some(Layout::Gray16),
            Self::Cmyk => Some(Layout::Cmyk),
            Self::Paletted | Self::YCbCr | Self::Uniform | Self::Generic => None,
        }
    }
}

// ============================================================================
// Raster
// ============================================================================

/// Packed single-plane image buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    layout: Layout,
    width: u32,
    height: u32,
    stride: usize,
    pix: Vec<u8>,
}

impl Raster {
    /// Creates a zero-filled raster.
    pub fn new(layout: Layout, width: u32, height: u32) -> Self {
        let stride = width as usize * layout.bytes_per_pixel();
        Self {
            layout,
            width,
            height,
            stride,
            pix: vec![0; stride * height as usize],
        }
    }

    /// Wraps existing tightly packed sample data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `pix.len()` is not
    /// `width * height * bytes_per_pixel`.
    pub fn from_pix(layout: Layout, width: u32, height: u32, pix: Vec<u8>) -> Result<Self> {
        let stride = width as usize * layout.bytes_per_pixel();
        Self::from_pix_with_stride(layout, width, height, stride, pix)
    }

    /// Wraps existing sample data with a custom row stride.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if the stride is smaller than a
    /// row or the buffer cannot hold `height` rows.
    pub fn from_pix_with_stride(
        layout: Layout,
        width: u32,
        height: u32,
        stride: usize,
        pix: Vec<u8>,
    ) -> Result<Self> {
        let row = width as usize * layout.bytes_per_pixel();
        if stride < row {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("stride {stride} is less than row size {row}"),
            ));
        }
        let needed = match height {
            0 => 0,
            h => stride * (h as usize - 1) + row,
        };
        if pix.len() < needed {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected at least {needed} bytes, got {}", pix.len()),
            ));
        }
        Ok(Self {
            layout,
            width,
            height,
            stride,
            pix,
        })
    }

    /// Sample layout.
    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Raw samples.
    #[inline]
    pub fn pix(&self) -> &[u8] {
        &self.pix
    }

    /// Raw samples, mutable.
    #[inline]
    pub fn pix_mut(&mut self) -> &mut [u8] {
        &mut self.pix
    }

    /// Byte offset of pixel `(x, y)`.
    #[inline]
    pub fn pix_offset(&self, x: usize, y: usize) -> usize {
        y * self.stride + x * self.layout.bytes_per_pixel()
    }

    /// Consumes the raster and returns its samples.
    pub fn into_pix(self) -> Vec<u8> {
        self.pix
    }
}

impl fmt::Debug for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raster")
            .field("layout", &self.layout)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("bytes", &self.pix.len())
            .finish()
    }
}

// ============================================================================
// Paletted
// ============================================================================

/// Image of 8-bit indices into a palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paletted {
    width: u32,
    height: u32,
    stride: usize,
    pix: Vec<u8>,
    palette: Vec<Pixel>,
}

impl Paletted {
    /// Creates an all-zero-index image with the given palette.
    pub fn new(width: u32, height: u32, palette: Vec<Pixel>) -> Self {
        Self {
            width,
            height,
            stride: width as usize,
            pix: vec![0; width as usize * height as usize],
            palette,
        }
    }

    /// Wraps existing index data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `pix.len() != width * height`.
    pub fn from_pix(width: u32, height: u32, pix: Vec<u8>, palette: Vec<Pixel>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if pix.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {expected} indices, got {}", pix.len()),
            ));
        }
        Ok(Self {
            width,
            height,
            stride: width as usize,
            pix,
            palette,
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Palette entries, premultiplied.
    #[inline]
    pub fn palette(&self) -> &[Pixel] {
        &self.palette
    }

    /// Index at `(x, y)`.
    #[inline]
    pub fn index_at(&self, x: usize, y: usize) -> u8 {
        self.pix[y * self.stride + x]
    }

    /// Sets the index at `(x, y)`.
    #[inline]
    pub fn set_index(&mut self, x: usize, y: usize, index: u8) {
        self.pix[y * self.stride + x] = index;
    }

    /// Palette entry at `(x, y)`; indices past the palette read as
    /// transparent black.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Pixel {
        self.palette
            .get(self.index_at(x, y) as usize)
            .copied()
            .unwrap_or_default()
    }
}

// ============================================================================
// YCbCr
// ============================================================================

/// Chroma subsampling ratio of a [`YCbCr`] image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SubsampleRatio {
    /// No subsampling.
    #[default]
    R444,
    /// Half horizontal chroma resolution.
    R422,
    /// Half horizontal and vertical chroma resolution.
    R420,
    /// Half vertical chroma resolution.
    R440,
    /// Quarter horizontal chroma resolution.
    R411,
    /// Quarter horizontal, half vertical chroma resolution.
    R410,
}

impl SubsampleRatio {
    /// Horizontal and vertical chroma divisors.
    #[inline]
    pub const fn factors(self) -> (usize, usize) {
        match self {
            Self::R444 => (1, 1),
            Self::R422 => (2, 1),
            Self::R420 => (2, 2),
            Self::R440 => (1, 2),
            Self::R411 => (4, 1),
            Self::R410 => (4, 2),
        }
    }

    /// Chroma plane size for a luma plane of `width` x `height`.
    #[inline]
    pub const fn chroma_size(self, width: usize, height: usize) -> (usize, usize) {
        let (fx, fy) = self.factors();
        (width.div_ceil(fx), height.div_ceil(fy))
    }
}

/// Luma plane plus two (possibly subsampled) chroma planes, opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YCbCr {
    width: u32,
    height: u32,
    ratio: SubsampleRatio,
    y_stride: usize,
    c_stride: usize,
    y: Vec<u8>,
    cb: Vec<u8>,
    cr: Vec<u8>,
}

impl YCbCr {
    /// Creates a black image (`Y = 0`, `Cb = Cr = 128`).
    pub fn new(width: u32, height: u32, ratio: SubsampleRatio) -> Self {
        let (w, h) = (width as usize, height as usize);
        let (cw, ch) = ratio.chroma_size(w, h);
        Self {
            width,
            height,
            ratio,
            y_stride: w,
            c_stride: cw,
            y: vec![0; w * h],
            cb: vec![128; cw * ch],
            cr: vec![128; cw * ch],
        }
    }

    /// Wraps existing planes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if a plane length does not
    /// match the size implied by `width`, `height` and `ratio`.
    pub fn from_planes(
        width: u32,
        height: u32,
        ratio: SubsampleRatio,
        y: Vec<u8>,
        cb: Vec<u8>,
        cr: Vec<u8>,
    ) -> Result<Self> {
        let (w, h) = (width as usize, height as usize);
        let (cw, ch) = ratio.chroma_size(w, h);
        if y.len() != w * h {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} luma samples, got {}", w * h, y.len()),
            ));
        }
        if cb.len() != cw * ch || cr.len() != cw * ch {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!(
                    "expected {} chroma samples per plane, got {} and {}",
                    cw * ch,
                    cb.len(),
                    cr.len()
                ),
            ));
        }
        Ok(Self {
            width,
            height,
            ratio,
            y_stride: w,
            c_stride: cw,
            y,
            cb,
            cr,
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Subsampling ratio.
    #[inline]
    pub fn ratio(&self) -> SubsampleRatio {
        self.ratio
    }

    /// Index into the luma plane for `(x, y)`.
    #[inline]
    pub fn y_offset(&self, x: usize, y: usize) -> usize {
        y * self.y_stride + x
    }

    /// Index into the chroma planes for `(x, y)`.
    #[inline]
    pub fn c_offset(&self, x: usize, y: usize) -> usize {
        let (fx, fy) = self.ratio.factors();
        (y / fy) * self.c_stride + x / fx
    }

    /// Samples `(Y, Cb, Cr)` at `(x, y)`.
    #[inline]
    pub fn sample(&self, x: usize, y: usize) -> (u8, u8, u8) {
        let yi = self.y_offset(x, y);
        let ci = self.c_offset(x, y);
        (self.y[yi], self.cb[ci], self.cr[ci])
    }

    /// Luma plane, mutable.
    pub fn y_mut(&mut self) -> &mut [u8] {
        &mut self.y
    }

    /// Blue-difference chroma plane, mutable.
    pub fn cb_mut(&mut self) -> &mut [u8] {
        &mut self.cb
    }

    /// Red-difference chroma plane, mutable.
    pub fn cr_mut(&mut self) -> &mut [u8] {
        &mut self.cr
    }
}

// ============================================================================
// Uniform / Generic
// ============================================================================

/// A single color covering the whole plane.
///
/// Processing treats a uniform source as 1x1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Uniform(pub Pixel);

/// Open fallback representation.
///
/// Anything that can answer "what is the premultiplied color at `(x, y)`"
/// can enter the pipeline. Access goes through a per-pixel call, so this is
/// the slow path.
pub trait PixelSource: Send + Sync + fmt::Debug {
    /// Width and height in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Premultiplied color at `(x, y)`.
    fn pixel(&self, x: u32, y: u32) -> Pixel;
}

// ============================================================================
// Image
// ============================================================================

/// A decoded image in one of the supported representations.
///
/// Cloning a [`Image::Generic`] shares the source; every other variant
/// deep-copies its buffers.
#[derive(Debug, Clone)]
pub enum Image {
    /// Packed single-plane buffer.
    Raster(Raster),
    /// Palette indices.
    Paletted(Paletted),
    /// Luma/chroma planes.
    YCbCr(YCbCr),
    /// Constant color, infinite extent.
    Uniform(Uniform),
    /// Any other pixel source.
    Generic(Arc<dyn PixelSource>),
}

impl Image {
    /// Representation tag.
    pub fn kind(&self) -> ImageKind {
        match self {
            Self::Raster(r) => r.layout().kind(),
            Self::Paletted(_) => ImageKind::Paletted,
            Self::YCbCr(_) => ImageKind::YCbCr,
            Self::Uniform(_) => ImageKind::Uniform,
            Self::Generic(_) => ImageKind::Generic,
        }
    }

    /// Processing extent `(width, height)`.
    ///
    /// A [`Uniform`] image reports `(1, 1)`.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Raster(r) => (r.width(), r.height()),
            Self::Paletted(p) => (p.width(), p.height()),
            Self::YCbCr(y) => (y.width(), y.height()),
            Self::Uniform(_) => (1, 1),
            Self::Generic(g) => g.dimensions(),
        }
    }

    /// Processing width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.dimensions().0
    }

    /// Processing height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.dimensions().1
    }

    /// Whether the image covers an infinite extent.
    #[inline]
    pub fn is_infinite(&self) -> bool {
        matches!(self, Self::Uniform(_))
    }

    /// Shortcut for `self.kind().is_high_quality()`.
    #[inline]
    pub fn is_high_quality(&self) -> bool {
        self.kind().is_high_quality()
    }

    /// The packed raster, if this is one.
    pub fn as_raster(&self) -> Option<&Raster> {
        match self {
            Self::Raster(r) => Some(r),
            _ => None,
        }
    }
}

impl From<Raster> for Image {
    fn from(r: Raster) -> Self {
        Self::Raster(r)
    }
}

impl From<Paletted> for Image {
    fn from(p: Paletted) -> Self {
        Self::Paletted(p)
    }
}

impl From<YCbCr> for Image {
    fn from(y: YCbCr) -> Self {
        Self::YCbCr(y)
    }
}

impl From<Uniform> for Image {
    fn from(u: Uniform) -> Self {
        Self::Uniform(u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_sizes() {
        assert_eq!(Layout::Gray.bytes_per_pixel(), 1);
        assert_eq!(Layout::Gray16.bytes_per_pixel(), 2);
        assert_eq!(Layout::Cmyk.bytes_per_pixel(), 4);
        assert_eq!(Layout::Nrgba64.bytes_per_pixel(), 8);
    }

    #[test]
    fn test_high_quality_kinds() {
        assert!(ImageKind::Rgba64.is_high_quality());
        assert!(ImageKind::Nrgba64.is_high_quality());
        // 16-bit but not a color kind
        assert!(!ImageKind::Gray16.is_high_quality());
        assert!(!ImageKind::Rgba.is_high_quality());
    }

    #[test]
    fn test_raster_from_pix_validates() {
        assert!(Raster::from_pix(Layout::Rgba, 2, 2, vec![0; 16]).is_ok());
        let err = Raster::from_pix(Layout::Rgba, 2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { .. }));
        let err = Raster::from_pix_with_stride(Layout::Rgba, 2, 2, 7, vec![0; 16]).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { .. }));
    }

    #[test]
    fn test_raster_padded_stride() {
        // last row may omit padding
        let r = Raster::from_pix_with_stride(Layout::Gray, 3, 2, 4, vec![0; 7]).unwrap();
        assert_eq!(r.pix_offset(2, 1), 6);
    }

    #[test]
    fn test_ycbcr_chroma_sizes() {
        assert_eq!(SubsampleRatio::R444.chroma_size(5, 3), (5, 3));
        assert_eq!(SubsampleRatio::R422.chroma_size(5, 3), (3, 3));
        assert_eq!(SubsampleRatio::R420.chroma_size(5, 3), (3, 2));
        assert_eq!(SubsampleRatio::R440.chroma_size(5, 3), (5, 2));
        assert_eq!(SubsampleRatio::R411.chroma_size(5, 3), (2, 3));
        assert_eq!(SubsampleRatio::R410.chroma_size(5, 3), (2, 2));
    }

    #[test]
    fn test_ycbcr_offsets() {
        let img = YCbCr::new(8, 4, SubsampleRatio::R420);
        assert_eq!(img.c_offset(0, 0), 0);
        assert_eq!(img.c_offset(1, 1), 0);
        assert_eq!(img.c_offset(2, 1), 1);
        assert_eq!(img.c_offset(3, 3), 4 + 1);
        assert_eq!(img.y_offset(3, 3), 27);
    }

    #[test]
    fn test_paletted_out_of_range_index() {
        let mut p = Paletted::new(2, 1, vec![Pixel::WHITE]);
        p.set_index(1, 0, 5);
        assert_eq!(p.pixel(0, 0), Pixel::WHITE);
        assert_eq!(p.pixel(1, 0), Pixel::TRANSPARENT);
    }

    #[test]
    fn test_uniform_extent() {
        let img = Image::from(Uniform(Pixel::BLACK));
        assert!(img.is_infinite());
        assert_eq!(img.dimensions(), (1, 1));
        assert_eq!(img.kind(), ImageKind::Uniform);
    }
}
