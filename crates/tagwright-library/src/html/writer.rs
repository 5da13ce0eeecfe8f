use std::io::{self, Write};

use crate::diag::SinkError;

/// Writes markup into an output sink while counting every byte that the
/// sink accepted.
///
/// When the sink fails, the returned [`SinkError`] carries the number of
/// bytes written so far by this writer, including any partial write that
/// happened just before the failure. Failed writes are never retried.
pub struct Writer<'a> {
    sink: &'a mut dyn Write,
    written: usize,
}

impl<'a> Writer<'a> {
    /// Wrap a sink, starting the count at zero.
    pub fn new(sink: &'a mut dyn Write) -> Self {
        Self { sink, written: 0 }
    }

    /// The number of bytes the sink has accepted so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Write a string.
    pub fn write_str(&mut self, s: &str) -> Result<(), SinkError> {
        self.write_bytes(s.as_bytes())
    }

    /// Write raw bytes.
    pub fn write_bytes(&mut self, mut buf: &[u8]) -> Result<(), SinkError> {
        while !buf.is_empty() {
            match self.sink.write(buf) {
                Ok(0) => return Err(self.fail(io::ErrorKind::WriteZero.into())),
                Ok(n) => {
                    self.written += n;
                    buf = &buf[n..];
                }
                Err(err) => return Err(self.fail(err)),
            }
        }
        Ok(())
    }

    /// Produce an error at the current byte count.
    pub fn fail(&self, source: io::Error) -> SinkError {
        SinkError::new(self.written, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A sink that accepts at most `n` bytes per call.
    struct Trickle(Vec<u8>, usize);

    impl Write for Trickle {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(self.1);
            self.0.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_short_writes_are_continued() {
        let mut sink = Trickle(vec![], 2);
        let mut w = Writer::new(&mut sink);
        w.write_str("hello").unwrap();
        w.write_str(" world").unwrap();
        assert_eq!(w.written(), 11);
        assert_eq!(sink.0, b"hello world");
    }

    #[test]
    fn test_zero_write_fails() {
        let mut sink = Trickle(vec![], 0);
        let mut w = Writer::new(&mut sink);
        let err = w.write_str("x").unwrap_err();
        assert_eq!(err.written, 0);
        assert_eq!(err.source.kind(), io::ErrorKind::WriteZero);
    }
}
