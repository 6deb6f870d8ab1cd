//! Uncompressed 24-bit BMP decoding
//!
//! Only the header fields needed to locate and validate pixel data are
//! parsed. Rows are fetched one at a time by seeking, so memory use does not
//! depend on the file size.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::error::{FormatError, IoError, LoadError};
use crate::frame::{FrameBuilder, FrameSequence};
use crate::source::ImageSource;

/// File header plus the leading BITMAPINFOHEADER fields, up to compression
pub const HEADER_LEN: usize = 34;

const SIGNATURE: [u8; 2] = *b"BM";
const BYTES_PER_PIXEL: usize = 3;
const REQUIRED_PLANES: u16 = 1;
const REQUIRED_BIT_DEPTH: u16 = 24;
const COMPRESSION_NONE: u32 = 0;

/// Pixels fetched per read while streaming a row
const CHUNK_PIXELS: usize = 16;

/// Interpret up to four bytes as a little-endian value
pub fn read_le(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .take(4)
        .enumerate()
        .fold(0, |acc, (i, &byte)| acc | (u32::from(byte) << (8 * i)))
}

/// Storage order of the scanlines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrder {
    /// Last image row first; positive height, the usual BMP layout
    BottomUp,
    /// First image row first; negative height
    TopDown,
}

/// Validated BMP header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapHeader {
    data_offset: u32,
    width: u32,
    height: u32,
    row_order: RowOrder,
}

impl BitmapHeader {
    /// Parse and validate a raw header
    ///
    /// Checks signature, plane count, bit depth and compression in that order.
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub fn parse(raw: &[u8; HEADER_LEN]) -> Result<Self, FormatError> {
        if raw[0..2] != SIGNATURE {
            return Err(FormatError::BadSignature);
        }
        // 2..10: file size and creator bytes, 14..18: DIB header size
        let data_offset = read_le(&raw[10..14]);
        let width = read_le(&raw[18..22]) as i32;
        let height = read_le(&raw[22..26]) as i32;

        let planes = read_le(&raw[26..28]) as u16;
        if planes != REQUIRED_PLANES {
            return Err(FormatError::Planes(planes));
        }
        let bit_depth = read_le(&raw[28..30]) as u16;
        if bit_depth != REQUIRED_BIT_DEPTH {
            return Err(FormatError::BitDepth(bit_depth));
        }
        let compression = read_le(&raw[30..34]);
        if compression != COMPRESSION_NONE {
            return Err(FormatError::Compressed(compression));
        }
        let width = u32::try_from(width).map_err(|_| FormatError::InvalidWidth(width))?;

        let row_order = if height < 0 {
            RowOrder::TopDown
        } else {
            RowOrder::BottomUp
        };

        Ok(Self {
            data_offset,
            width,
            height: height.unsigned_abs(),
            row_order,
        })
    }

    /// Read the header from the start of `source`
    ///
    /// The signature is checked before the rest is read, so short non-BMP
    /// files still report a format error.
    pub fn read<S: ImageSource + ?Sized>(source: &mut S) -> Result<Self, LoadError> {
        let mut raw = [0; HEADER_LEN];
        source.seek(0)?;
        source.read_exact(&mut raw[..2])?;
        if raw[..2] != SIGNATURE {
            return Err(FormatError::BadSignature.into());
        }
        source.read_exact(&mut raw[2..])?;
        Ok(Self::parse(&raw)?)
    }

    /// Byte offset of the first scanline in the file
    pub const fn data_offset(&self) -> u32 {
        self.data_offset
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Absolute image height
    pub const fn height(&self) -> u32 {
        self.height
    }

    pub const fn row_order(&self) -> RowOrder {
        self.row_order
    }

    /// Scanline size in bytes, padded to a 32-bit boundary
    pub const fn row_stride(&self) -> u64 {
        (self.width as u64 * BYTES_PER_PIXEL as u64).div_ceil(4) * 4
    }

    /// Rows that fit on a strip of `strip_length` pixels
    pub const fn clipped_height(&self, strip_length: u32) -> u32 {
        if self.height < strip_length {
            self.height
        } else {
            strip_length
        }
    }

    /// Scanline index in the file holding display row `row`
    ///
    /// `None` when `row` is not below the image height.
    pub const fn source_row(&self, row: u32) -> Option<u32> {
        if row >= self.height {
            return None;
        }
        match self.row_order {
            RowOrder::BottomUp => Some(self.height - 1 - row),
            RowOrder::TopDown => Some(row),
        }
    }

    /// File offset of display row `row`
    pub const fn row_offset(&self, row: u32) -> Option<u64> {
        match self.source_row(row) {
            Some(source_row) => {
                Some(self.data_offset as u64 + source_row as u64 * self.row_stride())
            }
            None => None,
        }
    }
}

/// Decode a BMP into one frame per image column
///
/// Only the first `strip_length` display rows are read. Nothing is returned
/// unless the whole image decodes.
pub fn decode<S, const MAX_LEDS: usize, const MAX_FRAMES: usize>(
    source: &mut S,
    builder: &FrameBuilder,
) -> Result<FrameSequence<MAX_LEDS, MAX_FRAMES>, LoadError>
where
    S: ImageSource + ?Sized,
{
    let header = BitmapHeader::read(source)?;
    #[cfg(feature = "esp32-log")]
    println!("WxH: ({},{})", header.width(), header.height());

    let mut frames = builder.allocate(header.width())?;
    #[cfg(feature = "esp32-log")]
    println!("Image format OK, reading data...");

    let width = header.width() as usize;
    let mut chunk = [0; CHUNK_PIXELS * BYTES_PER_PIXEL];
    for row in 0..header.clipped_height(builder.strip_length()) {
        let offset = header
            .row_offset(row)
            .and_then(|offset| u32::try_from(offset).ok())
            .ok_or(IoError::Failed)?;
        source.seek(offset)?;

        let mut column = 0;
        while column < width {
            let count = (width - column).min(CHUNK_PIXELS);
            let bytes = &mut chunk[..count * BYTES_PER_PIXEL];
            source.read_exact(bytes)?;
            for (i, bgr) in bytes.chunks_exact(BYTES_PER_PIXEL).enumerate() {
                builder.place(&mut frames, row, column + i, [bgr[0], bgr[1], bgr[2]]);
            }
            column += count;
        }
    }

    Ok(builder.finish(frames)?)
}
