mod order;

use smart_leds::RGB8;

pub use order::ColorOrder;

pub type Rgb = RGB8;

/// Convert a pixel stored in BMP byte order (blue, green, red)
pub const fn rgb_from_bgr(bgr: [u8; 3]) -> Rgb {
    Rgb {
        r: bgr[2],
        g: bgr[1],
        b: bgr[0],
    }
}
