use std::time::Duration;

use crate::foundation::error::{FlipbookError, FlipbookResult};

/// Absolute 0-based position of a frame in the animation sequence.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32, // must be > 0
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> FlipbookResult<Self> {
        if den == 0 {
            return Err(FlipbookError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(FlipbookError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Spacing between playback ticks, in whole milliseconds (`1000 * den / num`).
    pub fn tick_interval(self) -> Duration {
        let num = u64::from(self.num.max(1));
        Duration::from_millis(1000 * u64::from(self.den) / num)
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 4, den: 1 }
    }
}

/// Drawing-surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas; both sides must be non-zero.
    pub fn new(width: u32, height: u32) -> FlipbookResult<Self> {
        if width == 0 || height == 0 {
            return Err(FlipbookError::validation(format!(
                "canvas must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Number of pixels covered by the canvas.
    pub fn area(self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Straight-alpha RGBA8 colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black.
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::opaque(255, 0, 0);
    /// Opaque green.
    pub const GREEN: Self = Self::opaque(0, 255, 0);
    /// Opaque blue.
    pub const BLUE: Self = Self::opaque(0, 0, 255);
    /// Opaque yellow.
    pub const YELLOW: Self = Self::opaque(255, 255, 0);
    /// Opaque cyan.
    pub const CYAN: Self = Self::opaque(0, 255, 255);
    /// Opaque magenta.
    pub const MAGENTA: Self = Self::opaque(255, 0, 255);
    /// Opaque light gray.
    pub const LIGHT_GRAY: Self = Self::opaque(0xcc, 0xcc, 0xcc);
    /// Opaque dark gray.
    pub const DARK_GRAY: Self = Self::opaque(0x44, 0x44, 0x44);

    /// Build an opaque colour.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Channels in `[r, g, b, a]` order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Build from `[r, g, b, a]`.
    pub fn from_array(px: [u8; 4]) -> Self {
        Self {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
