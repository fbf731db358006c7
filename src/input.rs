//! Utility module for accumulating raw document bytes

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

/// Fixed size of the chunks a file is read in
pub(crate) const READ_CHUNK_SIZE: usize = 1024;

/// Growable contiguous buffer holding the raw bytes of a document source
///
/// The buffer is append-only; once filled it is handed to the parse engine
/// as a read-only slice.
#[derive(Default, Debug)]
pub(crate) struct RawInput {
    buf: Vec<u8>,
}

impl RawInput {
    pub(crate) fn new() -> Self {
        RawInput { buf: Vec::new() }
    }

    /// Appends the bytes to the end of the buffer
    pub(crate) fn append_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Read-only view of the accumulated bytes
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Creates a buffer holding a copy of the caller's text, without file I/O
    pub(crate) fn from_text(text: &str) -> Self {
        RawInput {
            buf: text.as_bytes().to_vec(),
        }
    }

    /// Reads the complete file into a new buffer
    ///
    /// The file is consumed in [`READ_CHUNK_SIZE`] chunks; a short read
    /// signals the end of the file. Reading blocks until the file has been
    /// consumed completely.
    pub(crate) fn from_file(path: &Path) -> std::io::Result<Self> {
        let mut file = File::open(path)?;
        let mut input = RawInput::new();
        let mut chunk = [0_u8; READ_CHUNK_SIZE];

        loop {
            let read_bytes_count = match file.read(&mut chunk) {
                Ok(read_bytes_count) => read_bytes_count,
                // Retry if interrupted
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            input.append_bytes(&chunk[..read_bytes_count]);

            if read_bytes_count < READ_CHUNK_SIZE {
                break;
            }
        }
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn append_and_view() {
        let mut input = RawInput::new();
        assert_eq!(b"" as &[u8], input.as_bytes());

        input.append_bytes(b"ab");
        input.append_bytes(b"");
        input.append_bytes(b"c");
        assert_eq!(b"abc" as &[u8], input.as_bytes());
    }

    #[test]
    fn from_text_copies_verbatim() {
        let input = RawInput::from_text("{\"a\": \"\u{10FFFF}\"}");
        assert_eq!("{\"a\": \"\u{10FFFF}\"}".as_bytes(), input.as_bytes());
    }

    #[test]
    fn from_file_reads_complete_file() -> TestResult {
        // Larger than one chunk, and not a multiple of the chunk size
        let content = "x".repeat(READ_CHUNK_SIZE * 3 + 17);

        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(content.as_bytes())?;
        file.flush()?;

        let input = RawInput::from_file(file.path())?;
        assert_eq!(content.as_bytes(), input.as_bytes());
        Ok(())
    }

    #[test]
    fn from_file_exact_chunk_multiple() -> TestResult {
        // A file whose size is an exact chunk multiple requires one final
        // zero-length read to detect the end of the file
        let content = "y".repeat(READ_CHUNK_SIZE * 2);

        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(content.as_bytes())?;
        file.flush()?;

        let input = RawInput::from_file(file.path())?;
        assert_eq!(content.as_bytes(), input.as_bytes());
        Ok(())
    }

    #[test]
    fn from_file_missing() {
        let result = RawInput::from_file(Path::new("/nonexistent/jsondoc-test-input"));
        assert!(result.is_err());
    }
}
