//! The byte-stream collaborator backing message bodies.
//!
//! A message never inspects body bytes; it only holds a [`BodyHandle`] and
//! hands it out. Siblings produced by the with- operations share the handle
//! until one of them replaces it through `with_body`.

use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;

use crate::error::HttpError;

/// Contract every message body satisfies.
pub trait MessageBody: Send {
    /// Read up to `length` bytes from the current position.
    fn read(&mut self, length: usize) -> Result<Vec<u8>, HttpError>;

    /// Write `data` at the current position, returning the bytes written.
    fn write(&mut self, data: &[u8]) -> Result<usize, HttpError>;

    fn seek(&mut self, pos: SeekFrom) -> Result<(), HttpError>;

    /// Seek to the beginning.
    fn rewind(&mut self) -> Result<(), HttpError>;

    /// Current position of the read/write pointer.
    fn tell(&mut self) -> Result<u64, HttpError>;

    fn eof(&mut self) -> bool;

    /// Total size in bytes, when known.
    fn size(&self) -> Option<u64>;

    /// The full contents, rewinding first when the stream is seekable.
    fn contents(&mut self) -> Result<Vec<u8>, HttpError>;

    fn is_readable(&self) -> bool;

    fn is_writable(&self) -> bool;

    fn is_seekable(&self) -> bool;

    fn metadata(&self) -> IndexMap<String, String>;
}

/// A shareable message body. Cloning the handle shares the underlying
/// stream; the lifetime of the stream is that of the longest-lived holder.
pub type BodyHandle = Arc<Mutex<dyn MessageBody>>;

/// Wrap a concrete body in a shareable handle.
pub fn body_handle<B: MessageBody + 'static>(body: B) -> BodyHandle {
    Arc::new(Mutex::new(body))
}

/// In-memory body backed by a cursor, with explicit read/write modes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStream {
    cursor: Option<Cursor<Vec<u8>>>,
    readable: bool,
    writable: bool,
}

impl MemoryStream {
    /// An empty stream open for reading and writing.
    pub fn new() -> Self {
        Self::from_bytes(Vec::new())
    }

    /// A read/write stream positioned at the start of `data`.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self {
            cursor: Some(Cursor::new(data)),
            readable: true,
            writable: true,
        }
    }

    /// A read-only stream over `data`.
    pub fn read_only(data: Vec<u8>) -> Self {
        Self {
            writable: false,
            ..Self::from_bytes(data)
        }
    }

    /// Detach the underlying buffer, leaving the stream unusable.
    pub fn detach(&mut self) -> Option<Vec<u8>> {
        self.cursor.take().map(Cursor::into_inner)
    }

    fn resource(&mut self) -> Result<&mut Cursor<Vec<u8>>, HttpError> {
        self.cursor.as_mut().ok_or(HttpError::NoResource)
    }
}

impl MessageBody for MemoryStream {
    fn read(&mut self, length: usize) -> Result<Vec<u8>, HttpError> {
        if self.cursor.is_some() && !self.readable {
            return Err(HttpError::NotReadable);
        }
        let cursor = self.resource()?;
        let mut data = vec![0u8; length];
        let len = cursor.read(&mut data)?;
        data.truncate(len);
        Ok(data)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, HttpError> {
        if self.cursor.is_some() && !self.writable {
            return Err(HttpError::NotWritable);
        }
        let cursor = self.resource()?;
        Ok(cursor.write(data)?)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<(), HttpError> {
        let cursor = self.resource()?;
        cursor.seek(pos)?;
        Ok(())
    }

    fn rewind(&mut self) -> Result<(), HttpError> {
        self.seek(SeekFrom::Start(0))
    }

    fn tell(&mut self) -> Result<u64, HttpError> {
        let cursor = self.resource()?;
        Ok(cursor.position())
    }

    fn eof(&mut self) -> bool {
        match &self.cursor {
            Some(cursor) => cursor.position() >= cursor.get_ref().len() as u64,
            None => true,
        }
    }

    fn size(&self) -> Option<u64> {
        self.cursor.as_ref().map(|c| c.get_ref().len() as u64)
    }

    fn contents(&mut self) -> Result<Vec<u8>, HttpError> {
        if self.cursor.is_some() && !self.readable {
            return Err(HttpError::NotReadable);
        }
        if self.is_seekable() {
            self.rewind()?;
        }
        let cursor = self.resource()?;
        let mut data = Vec::new();
        cursor.read_to_end(&mut data)?;
        Ok(data)
    }

    fn is_readable(&self) -> bool {
        self.cursor.is_some() && self.readable
    }

    fn is_writable(&self) -> bool {
        self.cursor.is_some() && self.writable
    }

    fn is_seekable(&self) -> bool {
        self.cursor.is_some()
    }

    fn metadata(&self) -> IndexMap<String, String> {
        if self.cursor.is_none() {
            return IndexMap::new();
        }
        let mode = match (self.readable, self.writable) {
            (true, true) => "r+",
            (true, false) => "r",
            (false, true) => "w",
            (false, false) => "",
        };
        IndexMap::from([
            ("mode".to_string(), mode.to_string()),
            ("seekable".to_string(), "true".to_string()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_write_round_trip() {
        let mut stream = MemoryStream::new();
        assert_eq!(stream.write(b"hello").unwrap(), 5);
        stream.rewind().unwrap();
        assert_eq!(stream.read(5).unwrap(), b"hello");
        assert!(stream.eof());
    }

    #[test]
    fn short_read_at_end() {
        let mut stream = MemoryStream::from_bytes(b"abc".to_vec());
        assert_eq!(stream.read(16).unwrap(), b"abc");
        assert_eq!(stream.read(16).unwrap(), b"");
    }

    #[test]
    fn contents_rewinds_first() {
        let mut stream = MemoryStream::from_bytes(b"payload".to_vec());
        stream.seek(SeekFrom::Start(3)).unwrap();
        assert_eq!(stream.contents().unwrap(), b"payload");
    }

    #[test]
    fn tell_tracks_position() {
        let mut stream = MemoryStream::from_bytes(b"abcdef".to_vec());
        assert_eq!(stream.tell().unwrap(), 0);
        stream.seek(SeekFrom::Start(4)).unwrap();
        assert_eq!(stream.tell().unwrap(), 4);
        assert!(!stream.eof());
    }

    #[test]
    fn read_only_rejects_writes() {
        let mut stream = MemoryStream::read_only(b"x".to_vec());
        assert!(matches!(stream.write(b"y"), Err(HttpError::NotWritable)));
        assert!(stream.is_readable());
        assert!(!stream.is_writable());
    }

    #[test]
    fn detached_stream_is_unusable() {
        let mut stream = MemoryStream::from_bytes(b"gone".to_vec());
        assert_eq!(stream.detach(), Some(b"gone".to_vec()));
        assert!(matches!(stream.read(1), Err(HttpError::NoResource)));
        assert!(matches!(stream.tell(), Err(HttpError::NoResource)));
        assert!(stream.eof());
        assert!(!stream.is_readable());
        assert!(!stream.is_seekable());
        assert!(stream.metadata().is_empty());
        assert_eq!(stream.size(), None);
    }

    #[test]
    fn metadata_reports_mode() {
        let stream = MemoryStream::new();
        let metadata = stream.metadata();
        assert_eq!(metadata["mode"], "r+");
        assert_eq!(metadata["seekable"], "true");
    }
}
