use std::io::{ErrorKind, Read};

use bytes::BytesMut;

use crate::codec::{decode_frame, Frame, FrameConfig, HEADER_SIZE};
use crate::error::{FrameError, Result};

// A typical device frame is a few hundred bytes; map pushes run to tens of KiB.
const READ_CHUNK: usize = 4 * 1024;

/// Blocking frame source over any `Read`, e.g. a captured traffic dump or a
/// std `TcpStream` in tools.
pub struct FrameReader<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(HEADER_SIZE + READ_CHUNK),
            config,
        }
    }

    /// Next whole frame. `Ok(None)` on EOF at a frame boundary; EOF inside a
    /// frame is [`FrameError::ConnectionClosed`].
    pub fn read_frame(&mut self) -> Result<Option<Frame>> {
        while !self.fill()? {
            if let Some(frame) = decode_frame(&mut self.buf, self.config.max_body_size)? {
                return Ok(Some(frame));
            }
        }

        match decode_frame(&mut self.buf, self.config.max_body_size)? {
            Some(frame) => Ok(Some(frame)),
            None if self.buf.is_empty() => Ok(None),
            None => Err(FrameError::ConnectionClosed),
        }
    }

    /// Pull one chunk into the buffer unless it already holds a frame.
    /// Returns `true` once the source is exhausted.
    fn fill(&mut self) -> Result<bool> {
        if self.has_frame() {
            return Ok(false);
        }

        let start = self.buf.len();
        self.buf.resize(start + READ_CHUNK, 0);
        let read = loop {
            match self.inner.read(&mut self.buf[start..]) {
                Ok(n) => break n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    self.buf.truncate(start);
                    return Err(FrameError::Io(err));
                }
            }
        };
        self.buf.truncate(start + read);
        Ok(read == 0)
    }

    fn has_frame(&self) -> bool {
        if self.buf.len() < HEADER_SIZE {
            return false;
        }
        let body_len = usize::from(u16::from_le_bytes([self.buf[2], self.buf[3]]));
        self.buf.len() >= HEADER_SIZE + body_len
    }

    /// Bytes buffered but not yet consumed as a frame.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read> Iterator for FrameReader<T> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_frame().transpose()
    }
}
