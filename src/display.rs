pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// Monochrome 64x32 screen, row major. Pixels only change through `paint` and
/// `clear_buffer`, both of which request a redraw.
pub struct FrameBuffer {
    bit_buffer: [bool; WIDTH * HEIGHT],
    redraw: bool,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            bit_buffer: [false; WIDTH * HEIGHT],
            redraw: true,
        }
    }

    pub fn clear_buffer(&mut self) {
        self.bit_buffer = [false; WIDTH * HEIGHT];
        self.redraw = true;
    }

    /// XORs an 8 pixel wide sprite onto the screen with its top left corner at
    /// (x, y). Both the origin and every pixel wrap around the screen edges.
    /// Returns true if any lit pixel was switched off.
    pub fn paint(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let mut collision = false;
        for (i, &row) in sprite.iter().enumerate() {
            let ny = (y as usize + i) % HEIGHT;
            for j in 0..8 {
                if (row >> (7 - j)) & 1 == 0 {
                    continue;
                }
                let nx = (x as usize + j) % WIDTH;
                let pixel = &mut self.bit_buffer[ny * WIDTH + nx];
                collision |= *pixel;
                *pixel = !*pixel;
            }
        }
        self.redraw = true;
        collision
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.bit_buffer[(y % HEIGHT) * WIDTH + (x % WIDTH)]
    }

    pub fn pixels(&self) -> &[bool] {
        &self.bit_buffer
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.bit_buffer.chunks(WIDTH)
    }

    pub fn needs_redraw(&self) -> bool {
        self.redraw
    }

    /// Called by the host once it has rendered the current frame.
    pub fn acknowledge_redraw(&mut self) {
        self.redraw = false;
    }

    /// Checks and clears the redraw flag
    pub fn take_redraw(&mut self) -> bool {
        std::mem::replace(&mut self.redraw, false)
    }
}
