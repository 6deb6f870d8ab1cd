//! BMP fixtures synthesized in memory.

#![allow(dead_code)]

use light_paintstick::error::IoError;
use light_paintstick::source::ImageSource;

pub const DATA_OFFSET: u32 = 54;

/// Encode a 24-bit BMP.
///
/// `rows` are image rows top first, each pixel as (r, g, b). Rows are stored
/// bottom-up unless `top_down` is set, in which case the height is negative.
pub fn bmp(rows: &[Vec<(u8, u8, u8)>], top_down: bool) -> Vec<u8> {
    bmp_with(rows, top_down, 1, 24, 0)
}

pub fn bmp_with(
    rows: &[Vec<(u8, u8, u8)>],
    top_down: bool,
    planes: u16,
    bit_depth: u16,
    compression: u32,
) -> Vec<u8> {
    let width = rows.first().map_or(0, Vec::len);
    let stride = (width * 3).div_ceil(4) * 4;
    let height = i32::try_from(rows.len()).unwrap();
    let height = if top_down { -height } else { height };
    let file_size = DATA_OFFSET as usize + stride * rows.len();

    let mut out = Vec::with_capacity(file_size);
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&u32::try_from(file_size).unwrap().to_le_bytes());
    out.extend_from_slice(&[0; 4]);
    out.extend_from_slice(&DATA_OFFSET.to_le_bytes());
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&i32::try_from(width).unwrap().to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(&planes.to_le_bytes());
    out.extend_from_slice(&bit_depth.to_le_bytes());
    out.extend_from_slice(&compression.to_le_bytes());
    out.extend_from_slice(&[0; 20]);
    assert_eq!(out.len(), DATA_OFFSET as usize);

    let stored: Vec<&Vec<(u8, u8, u8)>> = if top_down {
        rows.iter().collect()
    } else {
        rows.iter().rev().collect()
    };
    for row in stored {
        let start = out.len();
        for &(r, g, b) in row {
            out.extend_from_slice(&[b, g, r]);
        }
        out.resize(start + stride, 0);
    }
    out
}

/// Image where every pixel encodes its own position.
pub fn gradient(width: usize, height: usize) -> Vec<Vec<(u8, u8, u8)>> {
    (0..height)
        .map(|y| {
            (0..width)
                .map(|x| {
                    let x = u8::try_from(x).unwrap();
                    let y = u8::try_from(y).unwrap();
                    (x, y, x ^ y)
                })
                .collect()
        })
        .collect()
}

/// Source that fails every operation with the same error.
pub struct FailingSource(pub IoError);

impl ImageSource for FailingSource {
    fn seek(&mut self, _pos: u32) -> Result<(), IoError> {
        Err(self.0)
    }

    fn read_exact(&mut self, _buf: &mut [u8]) -> Result<(), IoError> {
        Err(self.0)
    }
}
