//! Channel order of the physical strip
//!
//! Addressable LEDs latch their three channels in a chip-specific order.
//! WS2812 ("NeoPixel") strips expect green, red, blue.

use super::Rgb;

const ORDER_NAME_RGB: &str = "rgb";
const ORDER_NAME_RBG: &str = "rbg";
const ORDER_NAME_GRB: &str = "grb";
const ORDER_NAME_GBR: &str = "gbr";
const ORDER_NAME_BRG: &str = "brg";
const ORDER_NAME_BGR: &str = "bgr";

/// Permutation from RGB to the strip's wire order
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorOrder {
    Rgb,
    Rbg,
    #[default]
    Grb,
    Gbr,
    Brg,
    Bgr,
}

impl ColorOrder {
    /// Arrange a color into the three bytes sent to the strip
    pub const fn arrange(self, color: Rgb) -> [u8; 3] {
        let Rgb { r, g, b } = color;
        match self {
            Self::Rgb => [r, g, b],
            Self::Rbg => [r, b, g],
            Self::Grb => [g, r, b],
            Self::Gbr => [g, b, r],
            Self::Brg => [b, r, g],
            Self::Bgr => [b, g, r],
        }
    }

    /// Parse an order from its lowercase name, e.g. `"grb"`
    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            ORDER_NAME_RGB => Some(Self::Rgb),
            ORDER_NAME_RBG => Some(Self::Rbg),
            ORDER_NAME_GRB => Some(Self::Grb),
            ORDER_NAME_GBR => Some(Self::Gbr),
            ORDER_NAME_BRG => Some(Self::Brg),
            ORDER_NAME_BGR => Some(Self::Bgr),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rgb => ORDER_NAME_RGB,
            Self::Rbg => ORDER_NAME_RBG,
            Self::Grb => ORDER_NAME_GRB,
            Self::Gbr => ORDER_NAME_GBR,
            Self::Brg => ORDER_NAME_BRG,
            Self::Bgr => ORDER_NAME_BGR,
        }
    }
}
