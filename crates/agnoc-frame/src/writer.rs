use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode_frame, Frame, FrameConfig};
use crate::error::{FrameError, Result};

/// Writes complete frames to any blocking `Write` sink.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Write> FrameWriter<T> {
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::new(),
            config,
        }
    }

    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.send(frame.opcode, frame.body.as_ref())
    }

    /// Frame `body` under `opcode` and write it out in full (blocking).
    pub fn send(&mut self, opcode: u16, body: &[u8]) -> Result<()> {
        if body.len() > self.config.max_body_size {
            return Err(FrameError::BodyTooLarge {
                size: body.len(),
                max: self.config.max_body_size,
            });
        }

        self.buf.clear();
        encode_frame(opcode, body, &mut self.buf)?;

        // write_all retries on Interrupted; a sink that stops taking bytes
        // reports WriteZero.
        self.inner
            .write_all(&self.buf)
            .and_then(|()| self.inner.flush())
            .map_err(|err| match err.kind() {
                ErrorKind::WriteZero => FrameError::ConnectionClosed,
                _ => FrameError::Io(err),
            })
    }

    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::FrameReader;

    #[test]
    fn written_frames_read_back_in_order() {
        let mut writer = FrameWriter::new(Vec::new());
        writer.send(0x07d5, b"").unwrap();
        writer
            .write_frame(&Frame::new(0x1012, b"{\"deviceTime\":1}".to_vec()))
            .unwrap();

        let wire = writer.into_inner();
        assert_eq!(&wire[..4], &[0xd5, 0x07, 0x00, 0x00]);

        let opcodes: Vec<u16> = FrameReader::new(wire.as_slice())
            .map(|f| f.unwrap().opcode)
            .collect();
        assert_eq!(opcodes, vec![0x07d5, 0x1012]);
    }

    #[test]
    fn rejects_body_over_configured_max() {
        let mut writer = FrameWriter::with_config(Vec::new(), FrameConfig { max_body_size: 2 });
        let err = writer.send(1, b"abc").unwrap_err();
        assert!(matches!(err, FrameError::BodyTooLarge { size: 3, max: 2 }));
        assert!(writer.get_ref().is_empty());
    }

    #[test]
    fn zero_length_write_means_closed() {
        struct Full;
        impl Write for Full {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Ok(0)
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut writer = FrameWriter::new(Full);
        assert!(matches!(
            writer.send(1, b"x"),
            Err(FrameError::ConnectionClosed)
        ));
    }
}
