//! Byte stores the decoder can read images from.
//!
//! The decoder only needs absolute seeks and exact reads, which is what a
//! flash filesystem on a microcontroller offers. Implementors translate
//! their native failures into [`IoError`].

use crate::error::IoError;

/// Seekable, byte-addressable image storage
pub trait ImageSource {
    /// Move the read position to `pos` bytes from the start
    fn seek(&mut self, pos: u32) -> Result<(), IoError>;

    /// Fill `buf` completely from the current position
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), IoError>;
}

impl<S: ImageSource + ?Sized> ImageSource for &mut S {
    fn seek(&mut self, pos: u32) -> Result<(), IoError> {
        (**self).seek(pos)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), IoError> {
        (**self).read_exact(buf)
    }
}

/// Image stored in memory, e.g. embedded with `include_bytes!`
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current read position
    pub const fn position(&self) -> usize {
        self.pos
    }
}

impl ImageSource for SliceSource<'_> {
    fn seek(&mut self, pos: u32) -> Result<(), IoError> {
        let pos = pos as usize;
        if pos > self.data.len() {
            return Err(IoError::Failed);
        }
        self.pos = pos;
        Ok(())
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), IoError> {
        let end = self.pos.checked_add(buf.len()).ok_or(IoError::Failed)?;
        let bytes = self.data.get(self.pos..end).ok_or(IoError::Failed)?;
        buf.copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }
}

#[cfg(feature = "std")]
pub use self::std_io::IoSource;

#[cfg(feature = "std")]
mod std_io {
    use std::io::{ErrorKind, Read, Seek, SeekFrom};

    use super::ImageSource;
    use crate::error::IoError;

    /// Adapter for any `std` reader, such as a `File`
    #[derive(Debug)]
    pub struct IoSource<R> {
        inner: R,
    }

    impl<R: Read + Seek> IoSource<R> {
        pub const fn new(inner: R) -> Self {
            Self { inner }
        }

        pub fn into_inner(self) -> R {
            self.inner
        }
    }

    fn map_error(err: &std::io::Error) -> IoError {
        match err.kind() {
            ErrorKind::ResourceBusy | ErrorKind::WouldBlock | ErrorKind::Interrupted => {
                IoError::Busy
            }
            _ => err
                .raw_os_error()
                .map_or(IoError::Failed, IoError::from_os_code),
        }
    }

    impl<R: Read + Seek> ImageSource for IoSource<R> {
        fn seek(&mut self, pos: u32) -> Result<(), IoError> {
            self.inner
                .seek(SeekFrom::Start(u64::from(pos)))
                .map(|_| ())
                .map_err(|e| map_error(&e))
        }

        fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), IoError> {
            self.inner.read_exact(buf).map_err(|e| map_error(&e))
        }
    }
}
