//! Error types for image loading and configuration.

use embassy_time::Duration;

/// OS error code reported by the flash filesystem while it is busy.
pub const BUSY_OS_CODE: i32 = 28;

/// The file is not a BMP this loader can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("not a bitmap file")]
    BadSignature,

    #[error("not single-plane ({0} planes)")]
    Planes(u16),

    #[error("not 24-bit ({0} bits per pixel)")]
    BitDepth(u16),

    #[error("compressed file (method {0})")]
    Compressed(u32),

    #[error("negative image width {0}")]
    InvalidWidth(i32),
}

/// Failure of the underlying byte store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IoError {
    /// Storage is busy; the read may succeed if retried shortly.
    #[error("storage busy, retry soon")]
    Busy,

    /// Any other read or seek failure, including reads past the end.
    #[error("storage read failed")]
    Failed,
}

impl IoError {
    /// Map a low-level OS error code onto a storage error.
    pub const fn from_os_code(code: i32) -> Self {
        if code == BUSY_OS_CODE {
            Self::Busy
        } else {
            Self::Failed
        }
    }

    /// Suggested wait before retrying the load.
    pub const fn retry_after(self) -> Duration {
        match self {
            Self::Busy => Duration::from_millis(250),
            Self::Failed => Duration::from_millis(500),
        }
    }
}

/// Decoded image does not fit the compiled-in frame storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CapacityError {
    #[error("strip length {requested} exceeds capacity {capacity}")]
    StripTooLong { requested: u32, capacity: usize },

    #[error("{requested} frames exceed capacity {capacity}")]
    TooManyFrames { requested: u32, capacity: usize },
}

/// Invalid playback configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("brightness must be within 0.0..=1.0")]
    Brightness,

    #[error("gamma must be a positive number")]
    Gamma,

    #[error("strip length must be at least one pixel")]
    StripLength,

    #[error("filename is too long")]
    FilenameTooLong,

    #[error("unknown key on line {line}")]
    UnknownKey { line: usize },

    #[error("invalid value on line {line}")]
    InvalidValue { line: usize },
}

/// Any failure while turning a BMP file into frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("failed to parse BMP: {0}")]
    Format(#[from] FormatError),

    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    #[error("image does not fit: {0}")]
    Capacity(#[from] CapacityError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
