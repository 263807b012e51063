//! The canonical pixel value.
//!
//! Every transform in pixpipe reads and writes [`Pixel`]: four 16-bit
//! channels, alpha-premultiplied, each in `[0, 65535]`. Representation
//! specific decoding and encoding lives in [`crate::accessor`].
//!
//! # Premultiplied vs straight
//!
//! In a premultiplied pixel every color channel is already scaled by
//! `alpha / 65535`, so `r <= a` for well-formed values. Curves such as gamma
//! must run on straight color, see [`Pixel::to_straight`] and
//! [`Pixel::to_premultiplied`].
//!
//! ```
//! use pixpipe_core::Pixel;
//!
//! let half_red = Pixel::new(0x8000, 0, 0, 0x8000);
//! let straight = half_red.to_straight();
//! assert_eq!(straight.r, 0xffff);
//! assert_eq!(straight.a, 0x8000);
//! ```

/// Maximum channel value.
pub const MAX: u32 = 0xffff;

/// Alpha-premultiplied RGBA pixel with 16 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pixel {
    /// Red, premultiplied.
    pub r: u16,
    /// Green, premultiplied.
    pub g: u16,
    /// Blue, premultiplied.
    pub b: u16,
    /// Alpha.
    pub a: u16,
}

impl Pixel {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 0xffff);

    /// Opaque white.
    pub const WHITE: Self = Self::new(0xffff, 0xffff, 0xffff, 0xffff);

    /// Creates a pixel from premultiplied channels.
    #[inline]
    pub const fn new(r: u16, g: u16, b: u16, a: u16) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a pixel from 8-bit premultiplied channels, replicating each
    /// byte into both halves of the 16-bit channel.
    #[inline]
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(widen(r), widen(g), widen(b), widen(a))
    }

    /// Creates a pixel from 8-bit straight (non-premultiplied) channels.
    #[inline]
    pub fn from_nrgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(widen(r), widen(g), widen(b), widen(a)).to_premultiplied()
    }

    /// Channels widened to `u32` for arithmetic.
    #[inline]
    pub fn to_u32(self) -> (u32, u32, u32, u32) {
        (self.r as u32, self.g as u32, self.b as u32, self.a as u32)
    }

    /// Interprets `self` as premultiplied and returns straight color.
    ///
    /// Alpha 0 yields all-zero channels; full alpha passes through.
    /// Channels are clamped to the valid range for inputs where a color
    /// channel exceeds alpha.
    #[inline]
    pub fn to_straight(self) -> Self {
        match self.a as u32 {
            MAX => self,
            0 => Self::TRANSPARENT,
            a => {
                let (r, g, b, _) = self.to_u32();
                Self::new(
                    unscale(r, a),
                    unscale(g, a),
                    unscale(b, a),
                    self.a,
                )
            }
        }
    }

    /// Interprets `self` as straight color and returns premultiplied.
    ///
    /// Each color channel becomes `c * a / 65535` (truncating).
    #[inline]
    pub fn to_premultiplied(self) -> Self {
        match self.a as u32 {
            MAX => self,
            0 => Self::TRANSPARENT,
            a => {
                let (r, g, b, _) = self.to_u32();
                Self::new(
                    (r * a / MAX) as u16,
                    (g * a / MAX) as u16,
                    (b * a / MAX) as u16,
                    self.a,
                )
            }
        }
    }

    /// High bytes of the channels.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            (self.r >> 8) as u8,
            (self.g >> 8) as u8,
            (self.b >> 8) as u8,
            (self.a >> 8) as u8,
        ]
    }
}

/// Replicates an 8-bit sample into a 16-bit channel (`v | v << 8`).
#[inline]
pub const fn widen(v: u8) -> u16 {
    (v as u16) << 8 | v as u16
}

#[inline]
fn unscale(c: u32, a: u32) -> u16 {
    (c * MAX / a).min(MAX) as u16
}
