use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{FlipbookError, FlipbookResult};

/// One drawable raster: straight-alpha RGBA8, tightly packed, row-major.
///
/// Dimensions are fixed at construction. The only way to get a differently sized buffer is
/// [`FrameBuffer::cropped`], which returns a new one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl FrameBuffer {
    /// Create a buffer of `canvas` size filled with `fill`.
    pub fn new(canvas: Canvas, fill: Rgba8) -> Self {
        let data = fill.to_array().repeat(canvas.area());
        Self {
            width: canvas.width,
            height: canvas.height,
            data,
        }
    }

    /// Wrap raw RGBA8 bytes. `data.len()` must equal `width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> FlipbookResult<Self> {
        let canvas = Canvas::new(width, height)?;
        if data.len() != canvas.area() * 4 {
            return Err(FlipbookError::validation(format!(
                "rgba8 buffer has {} bytes, expected {} for {width}x{height}",
                data.len(),
                canvas.area() * 4
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Convert an `image` raster.
    pub fn from_image(img: image::RgbaImage) -> FlipbookResult<Self> {
        let (width, height) = img.dimensions();
        Self::from_rgba8(width, height, img.into_raw())
    }

    /// Copy into an `image` raster (for PNG/GIF encoding).
    pub fn to_image(&self) -> image::RgbaImage {
        // Length is checked at construction, so this cannot fail.
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .unwrap_or_else(|| image::RgbaImage::new(self.width, self.height))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Size as a [`Canvas`].
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Raw RGBA8 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| (y as usize * self.width as usize + x as usize) * 4)
    }

    /// Read one pixel, `None` outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        let i = self.offset(x, y)?;
        Some(Rgba8::from_array([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]))
    }

    /// Overwrite one pixel. Out-of-bounds writes are ignored, like drawing off-canvas.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Rgba8) {
        if let Some(i) = self.offset(x, y) {
            self.data[i..i + 4].copy_from_slice(&color.to_array());
        }
    }

    /// Overwrite every pixel with `color`.
    pub fn fill(&mut self, color: Rgba8) {
        let px = color.to_array();
        for d in self.data.chunks_exact_mut(4) {
            d.copy_from_slice(&px);
        }
    }

    /// Overwrite this buffer with `other`'s pixels. Sizes must match.
    pub fn copy_from(&mut self, other: &FrameBuffer) -> FlipbookResult<()> {
        if self.canvas() != other.canvas() {
            return Err(FlipbookError::validation(format!(
                "cannot copy {}x{} frame into {}x{} frame",
                other.width, other.height, self.width, self.height
            )));
        }
        self.data.copy_from_slice(&other.data);
        Ok(())
    }

    /// Top-left crop to `width x height`. Both must be non-zero and no larger than the buffer.
    pub fn cropped(&self, width: u32, height: u32) -> FlipbookResult<FrameBuffer> {
        if width == 0 || height == 0 || width > self.width || height > self.height {
            return Err(FlipbookError::validation(format!(
                "crop {width}x{height} does not fit a {}x{} frame",
                self.width, self.height
            )));
        }
        if width == self.width && height == self.height {
            return Ok(self.clone());
        }

        let src_stride = self.width as usize * 4;
        let dst_stride = width as usize * 4;
        let mut data = Vec::with_capacity(dst_stride * height as usize);
        for row in self.data.chunks_exact(src_stride).take(height as usize) {
            data.extend_from_slice(&row[..dst_stride]);
        }
        Ok(FrameBuffer {
            width,
            height,
            data,
        })
    }

    /// Composite `img` over this buffer at `(0, 0)` using its per-pixel alpha.
    ///
    /// Parts of `img` outside the buffer are clipped.
    pub fn draw_image(&mut self, img: &image::RgbaImage) {
        let w = self.width.min(img.width());
        let h = self.height.min(img.height());
        for y in 0..h {
            for x in 0..w {
                let src = img.get_pixel(x, y).0;
                if let Some(i) = self.offset(x, y) {
                    blend_px(&mut self.data[i..i + 4], src, u16::from(src[3]));
                }
            }
        }
    }

    /// Composite `top` over this buffer with uniform opacity `alpha` (0..=255).
    ///
    /// `top`'s own alpha is multiplied in. Sizes must match.
    pub fn blend_over(&mut self, top: &FrameBuffer, alpha: u8) -> FlipbookResult<()> {
        if self.canvas() != top.canvas() {
            return Err(FlipbookError::validation(format!(
                "cannot blend {}x{} frame over {}x{} frame",
                top.width, top.height, self.width, self.height
            )));
        }
        let alpha = u16::from(alpha);
        for (d, s) in self
            .data
            .chunks_exact_mut(4)
            .zip(top.data.chunks_exact(4))
        {
            let a = mul_div255(u16::from(s[3]), alpha);
            blend_px(d, [s[0], s[1], s[2], s[3]], a);
        }
        Ok(())
    }
}

/// Source-over with straight alpha, result stays opaque when the destination is.
fn blend_px(dst: &mut [u8], src: [u8; 4], a: u16) {
    if a == 0 {
        return;
    }
    if a == 255 {
        dst.copy_from_slice(&src);
        return;
    }
    let inv = 255 - a;
    for c in 0..3 {
        dst[c] = (mul_div255(u16::from(src[c]), a) + mul_div255(u16::from(dst[c]), inv)).min(255)
            as u8;
    }
    dst[3] = (a + mul_div255(u16::from(dst[3]), inv)).min(255) as u8;
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/frames/buffer.rs"]
mod tests;
