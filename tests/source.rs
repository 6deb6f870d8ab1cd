mod tests {
    use light_paintstick::{ImageSource, IoError, SliceSource};

    #[test]
    fn test_slice_source_reads() {
        let data = [1, 2, 3, 4, 5];
        let mut source = SliceSource::new(&data);
        let mut buf = [0; 2];
        source.seek(3).unwrap();
        source.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [4, 5]);
        assert_eq!(source.position(), 5);
    }

    #[test]
    fn test_slice_source_bounds() {
        let data = [1, 2, 3];
        let mut source = SliceSource::new(&data);
        assert_eq!(source.seek(4), Err(IoError::Failed));
        source.seek(2).unwrap();
        let mut buf = [0; 2];
        assert_eq!(source.read_exact(&mut buf), Err(IoError::Failed));
        assert_eq!(source.position(), 2);
    }

    #[cfg(feature = "std")]
    mod io_source {
        use std::io::{self, ErrorKind, Read, Seek, SeekFrom};

        use light_paintstick::{FrameSequence, IoError, IoSource, LoadError, PlaybackConfig, load};

        /// Reader whose every operation fails with a fresh copy of one error.
        struct BrokenReader {
            error: fn() -> io::Error,
        }

        impl Read for BrokenReader {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err((self.error)())
            }
        }

        impl Seek for BrokenReader {
            fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
                Err((self.error)())
            }
        }

        fn load_from(error: fn() -> io::Error) -> Result<FrameSequence<30, 8>, LoadError> {
            let mut source = IoSource::new(BrokenReader { error });
            load(&mut source, &PlaybackConfig::default())
        }

        #[test]
        fn test_busy_kinds() {
            assert_eq!(
                load_from(|| io::Error::from(ErrorKind::ResourceBusy)),
                Err(LoadError::Io(IoError::Busy))
            );
            assert_eq!(
                load_from(|| io::Error::from(ErrorKind::WouldBlock)),
                Err(LoadError::Io(IoError::Busy))
            );
            assert_eq!(
                load_from(|| io::Error::from(ErrorKind::Interrupted)),
                Err(LoadError::Io(IoError::Busy))
            );
        }

        #[test]
        fn test_busy_os_code() {
            assert_eq!(
                load_from(|| io::Error::from_raw_os_error(28)),
                Err(LoadError::Io(IoError::Busy))
            );
        }

        #[test]
        fn test_generic_failure() {
            assert_eq!(
                load_from(|| io::Error::from(ErrorKind::NotFound)),
                Err(LoadError::Io(IoError::Failed))
            );
            assert_eq!(
                load_from(|| io::Error::from(ErrorKind::UnexpectedEof)),
                Err(LoadError::Io(IoError::Failed))
            );
        }
    }
}
