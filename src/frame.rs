//! Strip frames built from decoded image rows
//!
//! Every source image column becomes one frame, so rows coming out of the
//! decoder are scattered across all frames at once. The image sits at the
//! tail of the strip: the first decoded row lands on the last LED and each
//! following row one LED closer to the head.

use core::iter;

use heapless::Vec;

use crate::color::{ColorOrder, rgb_from_bgr};
use crate::config::PlaybackConfig;
use crate::error::{CapacityError, ConfigError};
use crate::gamma::GammaTable;

/// One LED in wire order
pub type WirePixel = [u8; 3];

/// A full strip of corrected pixels, ready to be latched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<const MAX_LEDS: usize> {
    pixels: Vec<WirePixel, MAX_LEDS>,
}

impl<const MAX_LEDS: usize> Frame<MAX_LEDS> {
    /// All-off frame of `len` pixels, capped at `MAX_LEDS`
    pub fn blank(len: usize) -> Self {
        Self {
            pixels: iter::repeat([0; 3]).take(len.min(MAX_LEDS)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixel(&self, index: usize) -> Option<WirePixel> {
        self.pixels.get(index).copied()
    }

    pub fn pixels(&self) -> &[WirePixel] {
        &self.pixels
    }

    /// Wire buffer of `3 * len()` bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_flattened()
    }

    /// Check if every channel is off
    pub fn is_blank(&self) -> bool {
        self.as_bytes().iter().all(|&b| b == 0)
    }
}

/// Frames of one loaded image, in playback order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSequence<const MAX_LEDS: usize, const MAX_FRAMES: usize> {
    frames: Vec<Frame<MAX_LEDS>, MAX_FRAMES>,
    strip_length: usize,
    looping: bool,
}

impl<const MAX_LEDS: usize, const MAX_FRAMES: usize> FrameSequence<MAX_LEDS, MAX_FRAMES> {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Frame<MAX_LEDS>> {
        self.frames.get(index)
    }

    pub fn last(&self) -> Option<&Frame<MAX_LEDS>> {
        self.frames.last()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Frame<MAX_LEDS>> {
        self.frames.iter()
    }

    pub fn as_slice(&self) -> &[Frame<MAX_LEDS>] {
        &self.frames
    }

    /// Number of pixels in every frame
    pub const fn strip_length(&self) -> usize {
        self.strip_length
    }

    /// Built for endless replay, without the blank terminal frame
    pub const fn is_looping(&self) -> bool {
        self.looping
    }
}

impl<'a, const MAX_LEDS: usize, const MAX_FRAMES: usize> IntoIterator
    for &'a FrameSequence<MAX_LEDS, MAX_FRAMES>
{
    type Item = &'a Frame<MAX_LEDS>;
    type IntoIter = core::slice::Iter<'a, Frame<MAX_LEDS>>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

/// Converts decoded pixels into strip frames
///
/// Holds everything derived from the configuration that the per-pixel
/// transform needs, so no float math is left for playback.
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    strip_length: u32,
    gamma: GammaTable,
    order: ColorOrder,
    loop_playback: bool,
}

impl FrameBuilder {
    /// Create a builder, rejecting out-of-range configuration
    pub fn new(config: &PlaybackConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            strip_length: config.strip_length,
            gamma: GammaTable::new(config.gamma, config.brightness),
            order: config.color_order,
            loop_playback: config.loop_playback,
        })
    }

    pub const fn strip_length(&self) -> u32 {
        self.strip_length
    }

    /// Frames produced for an image `width` columns wide
    pub const fn frame_count(&self, width: u32) -> u32 {
        if self.loop_playback {
            width
        } else {
            width.saturating_add(1)
        }
    }

    /// Transform one stored pixel into wire order
    #[inline]
    pub const fn convert(&self, bgr: [u8; 3]) -> WirePixel {
        self.order.arrange(self.gamma.correct_rgb(rgb_from_bgr(bgr)))
    }

    /// Reserve one blank frame per image column
    ///
    /// Fails before any pixel data is touched if the image cannot fit.
    pub fn allocate<const MAX_LEDS: usize, const MAX_FRAMES: usize>(
        &self,
        width: u32,
    ) -> Result<FrameSequence<MAX_LEDS, MAX_FRAMES>, CapacityError> {
        let strip_length = self.strip_length as usize;
        if strip_length > MAX_LEDS {
            return Err(CapacityError::StripTooLong {
                requested: self.strip_length,
                capacity: MAX_LEDS,
            });
        }
        let requested = self.frame_count(width);
        if requested as usize > MAX_FRAMES {
            return Err(CapacityError::TooManyFrames {
                requested,
                capacity: MAX_FRAMES,
            });
        }

        let frames = iter::repeat_with(|| Frame::blank(strip_length))
            .take(width as usize)
            .collect();
        Ok(FrameSequence {
            frames,
            strip_length,
            looping: self.loop_playback,
        })
    }

    /// Store the pixel of decoded `row` at image `column`
    ///
    /// `row` counts in display order and must be below the strip length.
    pub fn place<const MAX_LEDS: usize, const MAX_FRAMES: usize>(
        &self,
        sequence: &mut FrameSequence<MAX_LEDS, MAX_FRAMES>,
        row: u32,
        column: usize,
        bgr: [u8; 3],
    ) {
        debug_assert!(row < self.strip_length, "row {row} is outside the strip");
        let Some(index) = self.strip_length.checked_sub(row.saturating_add(1)) else {
            return;
        };
        if let Some(pixel) = sequence
            .frames
            .get_mut(column)
            .and_then(|frame| frame.pixels.get_mut(index as usize))
        {
            *pixel = self.convert(bgr);
        }
    }

    /// Seal the sequence, appending the terminal blank frame unless looping
    pub fn finish<const MAX_LEDS: usize, const MAX_FRAMES: usize>(
        &self,
        mut sequence: FrameSequence<MAX_LEDS, MAX_FRAMES>,
    ) -> Result<FrameSequence<MAX_LEDS, MAX_FRAMES>, CapacityError> {
        if !self.loop_playback {
            let requested = u32::try_from(sequence.len())
                .unwrap_or(u32::MAX)
                .saturating_add(1);
            let blank = Frame::blank(sequence.strip_length);
            sequence
                .frames
                .push(blank)
                .map_err(|_| CapacityError::TooManyFrames {
                    requested,
                    capacity: MAX_FRAMES,
                })?;
        }
        Ok(sequence)
    }
}
