#![cfg_attr(not(feature = "std"), no_std)]

pub mod bmp;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod gamma;
pub mod player;
pub mod source;

#[cfg(feature = "esp32-log")]
use esp_println::println;

pub use bmp::{BitmapHeader, RowOrder, decode};
pub use color::{ColorOrder, Rgb};
pub use config::PlaybackConfig;
pub use error::{CapacityError, ConfigError, FormatError, IoError, LoadError};
pub use frame::{Frame, FrameBuilder, FrameSequence};
pub use gamma::GammaTable;
pub use player::{PlaybackState, Player, PlayerTick};
pub use source::{ImageSource, SliceSource};
#[cfg(feature = "std")]
pub use source::IoSource;
pub use embassy_time::{Duration, Instant};

/// Raw LED strip output
///
/// Implement this trait to support different hardware platforms.
/// `bytes` is always three bytes per pixel in the strip's channel order.
pub trait StripWriter {
    /// Latch a full buffer onto the strip
    fn write(&mut self, bytes: &[u8]);
}

/// Touch sensor used as the playback trigger
pub trait TouchInput {
    /// Current touch level
    fn is_touched(&mut self) -> bool;
}

/// Load an image into frames using the playback configuration
///
/// On error no frames are produced; the caller should not start playback.
pub fn load<S, const MAX_LEDS: usize, const MAX_FRAMES: usize>(
    source: &mut S,
    config: &PlaybackConfig,
) -> Result<FrameSequence<MAX_LEDS, MAX_FRAMES>, LoadError>
where
    S: ImageSource + ?Sized,
{
    #[cfg(feature = "esp32-log")]
    println!("Loading {}", config.filename.as_str());

    let result = FrameBuilder::new(config)
        .map_err(LoadError::from)
        .and_then(|builder| decode(source, &builder));

    #[cfg(feature = "esp32-log")]
    match &result {
        Ok(frames) => println!("Loaded OK! {} frames", frames.len()),
        Err(err) => println!("Failed to load {}: {}", config.filename.as_str(), err),
    }

    result
}
