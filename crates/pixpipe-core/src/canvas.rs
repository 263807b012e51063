//! Drawable output buffers.
//!
//! A [`Canvas`] is a freshly allocated, writable [`Raster`] bound to the
//! encoder for its layout. Transforms allocate one per call, fill it through
//! [`Canvas::fill_with`] and hand it back as an [`Image`].
//!
//! ```rust
//! use pixpipe_core::{Canvas, Image, Layout, Pixel, Raster};
//!
//! let src = Image::from(Raster::new(Layout::Gray, 4, 4));
//! let mut canvas = Canvas::new_like(&src);
//! assert_eq!(canvas.layout(), Layout::Gray);
//!
//! canvas.fill_with(|_, _| Pixel::WHITE);
//! let out = canvas.into_image();
//! assert!(out.as_raster().unwrap().pix().iter().all(|&v| v == 0xff));
//! ```

use crate::accessor::{reader, Writer};
use crate::image::{Image, ImageKind, Layout, Raster};
use crate::parallel::parallel_rows_mut;
use crate::pixel::Pixel;

/// Writable output buffer.
#[derive(Debug, Clone)]
pub struct Canvas {
    raster: Raster,
    writer: Writer,
}

impl Canvas {
    /// Allocates a zeroed canvas.
    pub fn new(layout: Layout, width: u32, height: u32) -> Self {
        Self {
            raster: Raster::new(layout, width, height),
            writer: Writer::new(layout),
        }
    }

    /// Allocates a canvas of the same representation and extent as `image`.
    ///
    /// Representations that cannot be written (paletted, YCbCr, uniform,
    /// generic) get [`Layout::Rgba`]. A uniform source yields 1x1.
    pub fn new_like(image: &Image) -> Self {
        let (width, height) = image.dimensions();
        Self::new_like_sized(image, width, height)
    }

    /// Allocates a canvas of the same representation as `image` with an
    /// explicit extent.
    pub fn new_like_sized(image: &Image, width: u32, height: u32) -> Self {
        Self::new_for_kind(image.kind(), width, height)
    }

    /// Allocates a canvas for representation `kind`, falling back to
    /// [`Layout::Rgba`] when `kind` is not writable.
    pub fn new_for_kind(kind: ImageKind, width: u32, height: u32) -> Self {
        Self::new(kind.layout().unwrap_or(Layout::Rgba), width, height)
    }

    /// Sample layout.
    #[inline]
    pub fn layout(&self) -> Layout {
        self.raster.layout()
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// Writes `f(x, y)` to every pixel, rows split across workers.
    ///
    /// `f` may be called from several threads at once but never twice for
    /// the same coordinate.
    pub fn fill_with<F>(&mut self, f: F)
    where
        F: Fn(usize, usize) -> Pixel + Sync,
    {
        self.fill_region_with(self.width() as usize, self.height() as usize, f)
    }

    /// Writes `f(x, y)` to the top-left `width` x `height` region.
    fn fill_region_with<F>(&mut self, width: usize, height: usize, f: F)
    where
        F: Fn(usize, usize) -> Pixel + Sync,
    {
        let writer = self.writer;
        let stride = self.raster.stride();
        parallel_rows_mut(self.raster.pix_mut(), stride, height, |start, end, band| {
            for y in start..end {
                let row = &mut band[(y - start) * stride..];
                for x in 0..width {
                    writer.put(row, x, f(x, y));
                }
            }
        });
    }

    /// Finishes drawing.
    pub fn into_image(self) -> Image {
        Image::Raster(self.raster)
    }
}

/// Copies `src` into `dst` channel by channel.
///
/// Only the overlapping top-left region is written.
pub fn copy(dst: &mut Canvas, src: &Image) {
    let (sw, sh) = src.dimensions();
    let width = sw.min(dst.width()) as usize;
    let height = sh.min(dst.height()) as usize;
    let read = reader(src);
    dst.fill_region_with(width, height, |x, y| read(x, y));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{Paletted, SubsampleRatio, Uniform, YCbCr};

    #[test]
    fn test_new_like_keeps_layout() {
        for layout in [
            Layout::Rgba,
            Layout::Rgba64,
            Layout::Nrgba,
            Layout::Nrgba64,
            Layout::Alpha,
            Layout::Alpha16,
            Layout::Gray,
            Layout::Gray16,
            Layout::Cmyk,
        ] {
            let src = Image::from(Raster::new(layout, 3, 2));
            let c = Canvas::new_like(&src);
            assert_eq!(c.layout(), layout);
            assert_eq!((c.width(), c.height()), (3, 2));
        }
    }

    #[test]
    fn test_new_like_falls_back_to_rgba() {
        let p = Image::from(Paletted::new(3, 2, vec![Pixel::BLACK]));
        assert_eq!(Canvas::new_like(&p).layout(), Layout::Rgba);

        let y = Image::from(YCbCr::new(3, 2, SubsampleRatio::R420));
        assert_eq!(Canvas::new_like(&y).layout(), Layout::Rgba);

        assert_eq!(Canvas::new_for_kind(ImageKind::Generic, 1, 1).layout(), Layout::Rgba);
        assert_eq!(Canvas::new_for_kind(ImageKind::Cmyk, 1, 1).layout(), Layout::Cmyk);

        let u = Image::from(Uniform(Pixel::WHITE));
        let c = Canvas::new_like(&u);
        assert_eq!(c.layout(), Layout::Rgba);
        assert_eq!((c.width(), c.height()), (1, 1));
    }

    #[test]
    fn test_copy_overlapping_region() {
        let mut src = Raster::new(Layout::Gray, 4, 4);
        for (i, v) in src.pix_mut().iter_mut().enumerate() {
            *v = i as u8;
        }
        let src = Image::from(src);

        let mut dst = Canvas::new(Layout::Gray, 2, 3);
        copy(&mut dst, &src);
        let out = dst.into_image();
        assert_eq!(out.as_raster().unwrap().pix(), &[0, 1, 4, 5, 8, 9]);
    }

    #[test]
    fn test_copy_smaller_source_leaves_rest() {
        let src = Image::from(Uniform(Pixel::WHITE));
        let mut dst = Canvas::new(Layout::Alpha, 2, 2);
        copy(&mut dst, &src);
        let out = dst.into_image();
        assert_eq!(out.as_raster().unwrap().pix(), &[0xff, 0, 0, 0]);
    }
}
