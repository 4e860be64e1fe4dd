use crate::foundation::core::Rgba8;

/// Inks offered by the picker, in display order.
pub const PALETTE: [Rgba8; 8] = [
    Rgba8::BLACK,
    Rgba8::WHITE,
    Rgba8::RED,
    Rgba8::GREEN,
    Rgba8::BLUE,
    Rgba8::YELLOW,
    Rgba8::CYAN,
    Rgba8::MAGENTA,
];

/// Axis-aligned swatch cell in picker-view pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwatchRect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Side length.
    pub size: f32,
}

/// Colour picker that reports selections to a handler supplied at construction.
pub struct ColorPicker {
    selected: usize,
    on_select: Box<dyn FnMut(Rgba8)>,
}

impl std::fmt::Debug for ColorPicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorPicker")
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

impl ColorPicker {
    /// Picker starting on black; `on_select` receives every selection.
    pub fn new(on_select: impl FnMut(Rgba8) + 'static) -> Self {
        Self {
            selected: 0,
            on_select: Box::new(on_select),
        }
    }

    /// Index of the selected swatch.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Colour of the selected swatch.
    pub fn color(&self) -> Rgba8 {
        PALETTE[self.selected]
    }

    /// Select swatch `idx` if it exists, then notify the handler with the (possibly
    /// unchanged) selection.
    pub fn select(&mut self, idx: usize) -> Rgba8 {
        if idx < PALETTE.len() {
            self.selected = idx;
        }
        let color = self.color();
        (self.on_select)(color);
        color
    }

    /// Select by a tap at horizontal position `x` in a row of `square_dim`-wide swatches.
    pub fn select_at(&mut self, x: f32, square_dim: f32) -> Rgba8 {
        let idx = if square_dim > 0.0 && x >= 0.0 {
            (x / square_dim) as usize
        } else {
            usize::MAX
        };
        self.select(idx)
    }

    /// Swatch layout for a picker view `view_height` pixels tall: squares of a tenth of the
    /// height, in one row starting halfway down.
    pub fn swatch_rects(view_height: f32) -> [SwatchRect; 8] {
        let size = view_height / 10.0;
        let y = view_height / 2.0;
        std::array::from_fn(|i| SwatchRect {
            x: i as f32 * size,
            y,
            size,
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/palette.rs"]
mod tests;
