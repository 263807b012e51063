//! Pixel accessors: one read function and one write function per
//! representation.
//!
//! Selection happens once per image ([`reader`], [`Writer::new`]); the
//! returned values are then called per pixel without further branching on
//! the representation.
//!
//! # Read side
//!
//! [`reader`] returns a [`ReadFn`] producing canonical premultiplied
//! [`Pixel`] values:
//!
//! | Kind | Decode |
//! |---|---|
//! | `Rgba` | bytes replicated to 16 bits |
//! | `Rgba64` | big-endian pairs |
//! | `Nrgba`, `Nrgba64` | premultiplied on read, alpha 0 reads as all-zero |
//! | `Alpha`, `Alpha16` | color channels equal alpha |
//! | `Gray`, `Gray16` | luma in R, G, B, opaque |
//! | `Paletted` | palette entry |
//! | `YCbCr` | fixed-point BT.601, clamped, opaque |
//! | `Cmyk` | `(65535 - c*257) * w / 65535` with `w = 65535 - k*257`, opaque |
//! | `Uniform` | the constant |
//! | `Generic` | [`PixelSource::pixel`] |
//!
//! # Write side
//!
//! [`Writer`] encodes a canonical pixel into the bytes of one packed
//! [`Layout`]. Writers address pixels inside a row slice so that parallel
//! workers can each own a disjoint band of the output.
//!
//! Coordinates are not range checked beyond Rust's slice indexing; callers
//! keep `x < width` and `y < height`.
//!
//! [`PixelSource::pixel`]: crate::PixelSource::pixel

use crate::image::{Image, Layout, Raster, Uniform, YCbCr};
use crate::pixel::{widen, Pixel, MAX};

/// Reads the canonical pixel at `(x, y)`.
pub type ReadFn<'a> = Box<dyn Fn(usize, usize) -> Pixel + Send + Sync + 'a>;

/// Encodes one canonical pixel into exactly `bytes_per_pixel` bytes.
pub type EncodeFn = fn(&mut [u8], Pixel);

/// Selects the read function for `image`.
pub fn reader(image: &Image) -> ReadFn<'_> {
    match image {
        Image::Raster(r) => raster_reader(r),
        Image::Paletted(p) => Box::new(move |x, y| p.pixel(x, y)),
        Image::YCbCr(img) => ycbcr_reader(img),
        Image::Uniform(Uniform(c)) => {
            let c = *c;
            Box::new(move |_, _| c)
        }
        Image::Generic(src) => Box::new(move |x, y| src.pixel(x as u32, y as u32)),
    }
}

fn raster_reader(r: &Raster) -> ReadFn<'_> {
    let pix = r.pix();
    let stride = r.stride();
    match r.layout() {
        Layout::Rgba => packed(pix, stride, 4, decode_rgba),
        Layout::Rgba64 => packed(pix, stride, 8, decode_rgba64),
        Layout::Nrgba => packed(pix, stride, 4, decode_nrgba),
        Layout::Nrgba64 => packed(pix, stride, 8, decode_nrgba64),
        Layout::Alpha => packed(pix, stride, 1, decode_alpha),
        Layout::Alpha16 => packed(pix, stride, 2, decode_alpha16),
        Layout::Gray => packed(pix, stride, 1, decode_gray),
        Layout::Gray16 => packed(pix, stride, 2, decode_gray16),
        Layout::Cmyk => packed(pix, stride, 4, decode_cmyk),
    }
}

#[inline]
fn packed<'a, D>(pix: &'a [u8], stride: usize, bpp: usize, decode: D) -> ReadFn<'a>
where
    D: Fn(&[u8]) -> Pixel + Send + Sync + 'a,
{
    Box::new(move |x, y| {
        let i = y * stride + x * bpp;
        decode(&pix[i..i + bpp])
    })
}

fn ycbcr_reader(img: &YCbCr) -> ReadFn<'_> {
    Box::new(move |x, y| {
        let (yy, cb, cr) = img.sample(x, y);
        ycbcr_to_pixel(yy, cb, cr)
    })
}

#[inline]
fn be16(s: &[u8]) -> u16 {
    u16::from_be_bytes([s[0], s[1]])
}

#[inline]
fn decode_rgba(s: &[u8]) -> Pixel {
    Pixel::from_rgba8(s[0], s[1], s[2], s[3])
}

#[inline]
fn decode_rgba64(s: &[u8]) -> Pixel {
    Pixel::new(be16(&s[0..]), be16(&s[2..]), be16(&s[4..]), be16(&s[6..]))
}

#[inline]
fn decode_nrgba(s: &[u8]) -> Pixel {
    Pixel::from_nrgba8(s[0], s[1], s[2], s[3])
}

#[inline]
fn decode_nrgba64(s: &[u8]) -> Pixel {
    decode_rgba64(s).to_premultiplied()
}

#[inline]
fn decode_alpha(s: &[u8]) -> Pixel {
    let a = widen(s[0]);
    Pixel::new(a, a, a, a)
}

#[inline]
fn decode_alpha16(s: &[u8]) -> Pixel {
    let a = be16(s);
    Pixel::new(a, a, a, a)
}

#[inline]
fn decode_gray(s: &[u8]) -> Pixel {
    let y = widen(s[0]);
    Pixel::new(y, y, y, 0xffff)
}

#[inline]
fn decode_gray16(s: &[u8]) -> Pixel {
    let y = be16(s);
    Pixel::new(y, y, y, 0xffff)
}

#[inline]
fn decode_cmyk(s: &[u8]) -> Pixel {
    let w = MAX - s[3] as u32 * 0x101;
    let ink = |c: u8| ((MAX - c as u32 * 0x101) * w / MAX) as u16;
    Pixel::new(ink(s[0]), ink(s[1]), ink(s[2]), 0xffff)
}

/// Converts one `Y'CbCr` sample to an opaque canonical pixel.
///
/// Uses the JFIF fixed-point coefficients scaled by `0x10100`, so the
/// result is full 16-bit precision rather than a widened byte.
#[inline]
pub fn ycbcr_to_pixel(y: u8, cb: u8, cr: u8) -> Pixel {
    let y1 = y as i32 * 0x10100;
    let cb1 = cb as i32 - 128;
    let cr1 = cr as i32 - 128;
    let r = (y1 + 91881 * cr1) >> 8;
    let g = (y1 - 22554 * cb1 - 46802 * cr1) >> 8;
    let b = (y1 + 116130 * cb1) >> 8;
    let clamp = |v: i32| v.clamp(0, 0xffff) as u16;
    Pixel::new(clamp(r), clamp(g), clamp(b), 0xffff)
}

// ============================================================================
// Write side
// ============================================================================

/// Encoder bound to one packed layout.
#[derive(Debug, Clone, Copy)]
pub struct Writer {
    encode: EncodeFn,
    bpp: usize,
}

impl Writer {
    /// Selects the encoder for `layout`.
    pub fn new(layout: Layout) -> Self {
        Self {
            encode: encoder(layout),
            bpp: layout.bytes_per_pixel(),
        }
    }

    /// Bytes per pixel written.
    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        self.bpp
    }

    /// Writes `p` at column `x` of `row`.
    #[inline]
    pub fn put(&self, row: &mut [u8], x: usize, p: Pixel) {
        let i = x * self.bpp;
        (self.encode)(&mut row[i..i + self.bpp], p)
    }
}

/// Encoder function for `layout`.
pub fn encoder(layout: Layout) -> EncodeFn {
    match layout {
        Layout::Rgba => encode_rgba,
        Layout::Rgba64 => encode_rgba64,
        Layout::Nrgba => encode_nrgba,
        Layout::Nrgba64 => encode_nrgba64,
        Layout::Alpha => encode_alpha,
        Layout::Alpha16 => encode_alpha16,
        Layout::Gray => encode_gray,
        Layout::Gray16 => encode_gray16,
        Layout::Cmyk => encode_cmyk,
    }
}

#[inline]
fn put_be16(d: &mut [u8], v: u16) {
    d[..2].copy_from_slice(&v.to_be_bytes());
}

fn encode_rgba(d: &mut [u8], p: Pixel) {
    d.copy_from_slice(&p.to_rgba8());
}

fn encode_rgba64(d: &mut [u8], p: Pixel) {
    put_be16(&mut d[0..], p.r);
    put_be16(&mut d[2..], p.g);
    put_be16(&mut d[4..], p.b);
    put_be16(&mut d[6..], p.a);
}

fn encode_nrgba(d: &mut [u8], p: Pixel) {
    d.copy_from_slice(&p.to_straight().to_rgba8());
}

fn encode_nrgba64(d: &mut [u8], p: Pixel) {
    encode_rgba64(d, p.to_straight());
}

fn encode_alpha(d: &mut [u8], p: Pixel) {
    d[0] = (p.a >> 8) as u8;
}

fn encode_alpha16(d: &mut [u8], p: Pixel) {
    put_be16(d, p.a);
}

#[inline]
fn luma(p: Pixel) -> u32 {
    let (r, g, b, _) = p.to_u32();
    19595 * r + 38470 * g + 7471 * b + (1 << 15)
}

fn encode_gray(d: &mut [u8], p: Pixel) {
    d[0] = (luma(p) >> 24) as u8;
}

fn encode_gray16(d: &mut [u8], p: Pixel) {
    put_be16(d, (luma(p) >> 16) as u16);
}

fn encode_cmyk(d: &mut [u8], p: Pixel) {
    let [r, g, b, _] = p.to_rgba8();
    d.copy_from_slice(&rgb_to_cmyk(r, g, b));
}

/// Converts 8-bit RGB to CMYK ink coverage.
pub fn rgb_to_cmyk(r: u8, g: u8, b: u8) -> [u8; 4] {
    let (r, g, b) = (r as u32, g as u32, b as u32);
    let w = r.max(g).max(b);
    if w == 0 {
        return [0, 0, 0, 0xff];
    }
    let ink = |c: u32| ((w - c) * 0xff / w) as u8;
    [ink(r), ink(g), ink(b), (0xff - w) as u8]
}
