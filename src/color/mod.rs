mod float;

pub use float::Rgbf;
use smart_leds::RGB8;

pub type Rgb = RGB8;

/// Create an RGB color from a `[r, g, b]` triple.
pub const fn rgb_from_array(color: [u8; 3]) -> Rgb {
    Rgb {
        r: color[0],
        g: color[1],
        b: color[2],
    }
}
