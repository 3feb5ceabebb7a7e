use crate::color::{Chip8Color, Palette};

pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;

/// 64x32 pixels 1 bit monochrome display buffer
#[derive(Clone, Debug)]
pub struct Display {
    pixels: Vec<bool>,
    /// Set whenever the buffer is cleared or drawn to
    dirty: bool,
}

impl Default for Display {
    fn default() -> Display {
        Display::new()
    }
}

impl Display {
    pub fn new() -> Display {
        Display {
            pixels: vec![false; SCREEN_WIDTH * SCREEN_HEIGHT],
            dirty: false,
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[y * SCREEN_WIDTH + x]
    }

    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|p| !p)
    }

    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// Returns whether the buffer changed since the last call and resets the marker.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn clear(&mut self) {
        self.pixels.iter_mut().for_each(|p| *p = false);
        self.dirty = true;
    }

    /// XOR a pixel on, returning true if it was switched from on to off.
    pub(crate) fn flip(&mut self, x: usize, y: usize) -> bool {
        let idx = y * SCREEN_WIDTH + x;
        let was_on = self.pixels[idx];
        self.pixels[idx] = !was_on;
        self.dirty = true;
        was_on
    }

    /// Render the buffer into `frame`, one color per pixel in row-major order.
    ///
    /// # Panics
    ///
    /// Panics if `frame` does not hold exactly `SCREEN_WIDTH * SCREEN_HEIGHT` colors.
    pub fn render(&self, palette: &Palette, frame: &mut [Chip8Color]) {
        assert_eq!(frame.len(), self.pixels.len(), "Frame size must match display");
        for (dst, &on) in frame.iter_mut().zip(&self.pixels) {
            *dst = if on { palette.foreground } else { palette.background };
        }
    }

    pub fn to_frame(&self, palette: &Palette) -> Vec<Chip8Color> {
        let mut frame = vec![palette.background; self.pixels.len()];
        self.render(palette, &mut frame);
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_reports_collision() {
        let mut display = Display::new();

        assert!(!display.flip(3, 4));
        assert!(display.pixel(3, 4));
        assert!(display.flip(3, 4));
        assert!(!display.pixel(3, 4));
    }

    #[test]
    fn test_clear_marks_dirty() {
        let mut display = Display::new();
        display.flip(63, 31);
        assert!(display.take_dirty());
        assert!(!display.dirty());

        display.clear();
        assert!(display.is_blank());
        assert!(display.take_dirty());
    }

    #[test]
    fn test_render_palette() {
        let mut display = Display::new();
        display.flip(1, 0);
        let palette = Palette {
            foreground: Chip8Color::new(1, 2, 3),
            background: Chip8Color::new(9, 9, 9),
        };

        let frame = display.to_frame(&palette);

        assert_eq!(frame.len(), SCREEN_WIDTH * SCREEN_HEIGHT);
        assert_eq!(frame[0], palette.background);
        assert_eq!(frame[1], palette.foreground);
    }

    #[test]
    #[should_panic(expected = "Frame size must match display")]
    fn test_render_wrong_frame_size() {
        let display = Display::new();
        let mut frame = vec![Chip8Color::new(0, 0, 0); 10];
        display.render(&Palette::default(), &mut frame);
    }
}
