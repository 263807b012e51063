//! Read -> write -> read through a freshly allocated canvas of the same
//! representation reproduces every pixel within the precision of the
//! representation written.

use pixpipe_core::{
    copy, reader, Canvas, Image, Layout, Paletted, Pixel, PixelSource, Raster, SubsampleRatio,
    Uniform, YCbCr,
};
use std::sync::Arc;

const W: u32 = 13;
const H: u32 = 7;

/// Deterministic xorshift byte stream.
struct Bytes(u32);

impl Bytes {
    fn next(&mut self) -> u8 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 17;
        self.0 ^= self.0 << 5;
        (self.0 >> 24) as u8
    }

    fn fill(&mut self, n: usize) -> Vec<u8> {
        (0..n).map(|_| self.next()).collect()
    }
}

fn assert_roundtrip(src: &Image, tolerance: u16) {
    let mut canvas = Canvas::new_like(src);
    copy(&mut canvas, src);
    let out = canvas.into_image();
    assert_eq!(out.dimensions(), src.dimensions());

    let before = reader(src);
    let after = reader(&out);
    let (w, h) = src.dimensions();
    for y in 0..h as usize {
        for x in 0..w as usize {
            let a = before(x, y);
            let b = after(x, y);
            for (ca, cb) in [(a.r, b.r), (a.g, b.g), (a.b, b.b), (a.a, b.a)] {
                assert!(
                    ca.abs_diff(cb) <= tolerance,
                    "{:?} at ({x}, {y}): {a:?} vs {b:?}",
                    src.kind()
                );
            }
        }
    }
}

fn random_raster(layout: Layout, seed: u32) -> Raster {
    let mut bytes = Bytes(seed);
    let n = (W * H) as usize * layout.bytes_per_pixel();
    Raster::from_pix(layout, W, H, bytes.fill(n)).unwrap()
}

/// Premultiplied layouts need color <= alpha to be well formed.
fn clamp_premultiplied(mut raster: Raster) -> Raster {
    let wide = raster.layout() == Layout::Rgba64;
    let bpp = raster.layout().bytes_per_pixel();
    for px in raster.pix_mut().chunks_mut(bpp) {
        if wide {
            let a = u16::from_be_bytes([px[6], px[7]]);
            for c in 0..3 {
                let v = u16::from_be_bytes([px[2 * c], px[2 * c + 1]]).min(a);
                px[2 * c..2 * c + 2].copy_from_slice(&v.to_be_bytes());
            }
        } else {
            let a = px[3];
            for c in &mut px[..3] {
                *c = (*c).min(a);
            }
        }
    }
    raster
}

#[test]
fn rgba_is_exact() {
    let src = Image::from(clamp_premultiplied(random_raster(Layout::Rgba, 1)));
    assert_roundtrip(&src, 0);
}

#[test]
fn rgba64_is_exact() {
    let src = Image::from(clamp_premultiplied(random_raster(Layout::Rgba64, 2)));
    assert_roundtrip(&src, 0);
}

#[test]
fn nrgba_within_one_step() {
    assert_roundtrip(&Image::from(random_raster(Layout::Nrgba, 3)), 0x101);
}

#[test]
fn nrgba64_within_one_unit() {
    assert_roundtrip(&Image::from(random_raster(Layout::Nrgba64, 4)), 1);
}

#[test]
fn alpha_and_gray_are_exact() {
    for (i, layout) in [Layout::Alpha, Layout::Alpha16, Layout::Gray, Layout::Gray16]
        .into_iter()
        .enumerate()
    {
        assert_roundtrip(&Image::from(random_raster(layout, 10 + i as u32)), 0);
    }
}

#[test]
fn cmyk_within_two_steps() {
    assert_roundtrip(&Image::from(random_raster(Layout::Cmyk, 5)), 2 * 0x101);
}

#[test]
fn paletted_within_one_step() {
    let mut bytes = Bytes(6);
    let palette: Vec<Pixel> = (0..16)
        .map(|_| {
            let a = bytes.next();
            Pixel::from_nrgba8(bytes.next(), bytes.next(), bytes.next(), a)
        })
        .collect();
    let pix = bytes.fill((W * H) as usize).into_iter().map(|b| b % 20).collect();
    let src = Image::from(Paletted::from_pix(W, H, pix, palette).unwrap());
    assert_roundtrip(&src, 0x101);
}

#[test]
fn ycbcr_within_one_step() {
    for ratio in [
        SubsampleRatio::R444,
        SubsampleRatio::R422,
        SubsampleRatio::R420,
        SubsampleRatio::R440,
        SubsampleRatio::R411,
        SubsampleRatio::R410,
    ] {
        let mut bytes = Bytes(7);
        let (cw, ch) = ratio.chroma_size(W as usize, H as usize);
        let src = YCbCr::from_planes(
            W,
            H,
            ratio,
            bytes.fill((W * H) as usize),
            bytes.fill(cw * ch),
            bytes.fill(cw * ch),
        )
        .unwrap();
        assert_roundtrip(&Image::from(src), 0x101);
    }
}

#[test]
fn uniform_within_one_step() {
    let src = Image::from(Uniform(Pixel::new(0x1234, 0x5678, 0x9abc, 0xdef0)));
    assert_roundtrip(&src, 0x101);
}

#[derive(Debug)]
struct Gradient;

impl PixelSource for Gradient {
    fn dimensions(&self) -> (u32, u32) {
        (W, H)
    }

    fn pixel(&self, x: u32, y: u32) -> Pixel {
        let v = (x * 5000 + y * 300) as u16;
        Pixel::new(v, v / 2, v / 3, 0xffff)
    }
}

#[test]
fn generic_within_one_step() {
    assert_roundtrip(&Image::Generic(Arc::new(Gradient)), 0x101);
}
