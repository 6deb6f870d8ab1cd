//! Playback configuration
//!
//! Fixed at startup and read-only afterwards. The defaults match the stock
//! paintstick: a 30 pixel NeoPixel strip playing `bats.bmp` once per touch.
//!
//! A configuration can also be read from a small text file:
//!
//! ```text
//! # paintstick.cfg
//! file = ghost04.bmp
//! brightness = 0.5
//! gamma = 2.7
//! pixels = 30
//! speed = 20000
//! loop = false
//! order = grb
//! ```

use embassy_time::Duration;
use heapless::String;

use crate::color::ColorOrder;
use crate::error::ConfigError;

/// Maximum filename length in bytes
pub const FILENAME_CAPACITY: usize = 64;

pub const DEFAULT_FILENAME: &str = "bats.bmp";
pub const DEFAULT_BRIGHTNESS: f64 = 1.0;
pub const DEFAULT_GAMMA: f64 = 2.7;
pub const DEFAULT_STRIP_LENGTH: u32 = 30;
pub const DEFAULT_SPEED: u32 = 20_000;

/// Speed value that maps to the longest frame delay
const SPEED_SCALE: u64 = 65_535;

/// Frame delay at full speed scale, in microseconds (0.1 s)
const MAX_FRAME_DELAY_US: u64 = 100_000;

/// Playback configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackConfig {
    /// BMP file to load from the storage root
    pub filename: String<FILENAME_CAPACITY>,
    /// Global brightness, 0.0 (off) to 1.0 (full)
    pub brightness: f64,
    /// Perceptual brightness exponent
    pub gamma: f64,
    /// Number of pixels on the strip
    pub strip_length: u32,
    /// Inter-frame delay control, linear; 65535 is 0.1 s per frame
    pub speed: u32,
    /// Replay frames forever instead of once per touch
    pub loop_playback: bool,
    /// Channel order expected by the strip
    pub color_order: ColorOrder,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        let mut filename = String::new();
        let _ = filename.push_str(DEFAULT_FILENAME);
        Self {
            filename,
            brightness: DEFAULT_BRIGHTNESS,
            gamma: DEFAULT_GAMMA,
            strip_length: DEFAULT_STRIP_LENGTH,
            speed: DEFAULT_SPEED,
            loop_playback: false,
            color_order: ColorOrder::default(),
        }
    }
}

impl PlaybackConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.brightness) {
            return Err(ConfigError::Brightness);
        }
        if !self.gamma.is_finite() || self.gamma <= 0.0 {
            return Err(ConfigError::Gamma);
        }
        if self.strip_length == 0 {
            return Err(ConfigError::StripLength);
        }
        Ok(())
    }

    /// Delay between two frames, `speed / 65535 / 10` seconds
    pub const fn frame_delay(&self) -> Duration {
        Duration::from_micros(self.speed as u64 * MAX_FRAME_DELAY_US / SPEED_SCALE)
    }

    /// Parse a `key = value` configuration file over the defaults
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for (index, raw_line) in text.lines().enumerate() {
            let line = index + 1;
            let content = raw_line
                .split_once('#')
                .map_or(raw_line, |(before, _)| before)
                .trim();
            if content.is_empty() {
                continue;
            }

            let (key, value) = content
                .split_once('=')
                .ok_or(ConfigError::InvalidValue { line })?;
            let value = value.trim();
            let invalid = ConfigError::InvalidValue { line };

            match key.trim() {
                "file" => {
                    config.filename =
                        String::try_from(value).map_err(|_| ConfigError::FilenameTooLong)?;
                }
                "brightness" => config.brightness = value.parse().map_err(|_| invalid)?,
                "gamma" => config.gamma = value.parse().map_err(|_| invalid)?,
                "pixels" => config.strip_length = value.parse().map_err(|_| invalid)?,
                "speed" => config.speed = value.parse().map_err(|_| invalid)?,
                "loop" => config.loop_playback = value.parse().map_err(|_| invalid)?,
                "order" => {
                    config.color_order = ColorOrder::parse_from_str(value).ok_or(invalid)?;
                }
                _ => return Err(ConfigError::UnknownKey { line }),
            }
        }

        config.validate()?;
        Ok(config)
    }
}
