use emuchip::{
    display::{FrameBuffer, HEIGHT, WIDTH},
    keyboard::Keyboard,
    ExecError,
};
use minifb::{Key, Scale, Window, WindowOptions};

const LIT: u32 = from_u8_rgb(0, 127, 255);
const UNLIT: u32 = from_u8_rgb(0, 0, 0);

// 1 2 3 C        1 2 3 4
// 4 5 6 D   <-   Q W E R
// 7 8 9 E        A S D F
// A 0 B F        Z X C V
const KEYMAP: [(Key, u8); 16] = [
    (Key::Key1, 0x1),
    (Key::Key2, 0x2),
    (Key::Key3, 0x3),
    (Key::Key4, 0xC),
    (Key::Q, 0x4),
    (Key::W, 0x5),
    (Key::E, 0x6),
    (Key::R, 0xD),
    (Key::A, 0x7),
    (Key::S, 0x8),
    (Key::D, 0x9),
    (Key::F, 0xE),
    (Key::Z, 0xA),
    (Key::X, 0x0),
    (Key::C, 0xB),
    (Key::V, 0xF),
];

const fn from_u8_rgb(r: u8, g: u8, b: u8) -> u32 {
    let (r, g, b) = (r as u32, g as u32, b as u32);
    (r << 16) | (g << 8) | b
}

/// Converts the 1 bit screen into the 0RGB buffer minifb expects.
pub fn render(fb: &FrameBuffer, pixel_buffer: &mut [u32]) {
    for (out, lit) in pixel_buffer.iter_mut().zip(fb.pixels()) {
        *out = if *lit { LIT } else { UNLIT };
    }
}

pub struct Frontend {
    window: Window,
    pixel_buffer: Vec<u32>,
}

impl Frontend {
    pub fn new(scale: Scale) -> Result<Self, minifb::Error> {
        let mut window = Window::new(
            "emuchip - ESC to exit",
            WIDTH,
            HEIGHT,
            WindowOptions {
                scale,
                ..WindowOptions::default()
            },
        )?;
        // Limit to max ~60 fps update rate
        window.limit_update_rate(Some(std::time::Duration::from_micros(16600)));
        Ok(Self {
            window,
            pixel_buffer: vec![UNLIT; WIDTH * HEIGHT],
        })
    }

    pub fn is_running(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// Copies the physical key state into the keypad, presses and releases alike.
    pub fn sync_keys(&self, keyboard: &mut Keyboard) -> Result<(), ExecError> {
        for (key, num) in KEYMAP {
            keyboard.set_key(num, self.window.is_key_down(key))?;
        }
        Ok(())
    }

    /// Presents the screen if it changed, otherwise just pumps window events.
    pub fn sync_display(&mut self, fb: &mut FrameBuffer) -> Result<(), minifb::Error> {
        if fb.take_redraw() {
            render(fb, &mut self.pixel_buffer);
            self.window
                .update_with_buffer(&self.pixel_buffer, WIDTH, HEIGHT)
        } else {
            self.window.update();
            Ok(())
        }
    }
}
