use std::fmt;
use std::io::{self, BufRead, BufReader, Cursor, Read, Write};
use std::sync::Arc;

use strata_core::{Charset, Result};

pub type ByteReader = Box<dyn Read + Send>;
pub type ByteWriter = Box<dyn Write + Send>;
pub type CharReader = Box<dyn BufRead + Send>;

type Opener<T> = Arc<dyn Fn() -> Result<T> + Send + Sync>;

/// A reusable factory of byte input streams.
///
/// Nothing is opened until [`ByteSource::open_stream`] is called, and every
/// call returns a fresh stream positioned at the start. Callers own and drop
/// the returned streams.
#[derive(Clone)]
pub struct ByteSource {
    opener: Opener<ByteReader>,
}

impl ByteSource {
    pub fn new<F>(opener: F) -> Self
    where
        F: Fn() -> Result<ByteReader> + Send + Sync + 'static,
    {
        ByteSource {
            opener: Arc::new(opener),
        }
    }

    /// A source whose streams are always at end-of-stream.
    pub fn empty() -> Self {
        ByteSource::new(|| Ok(Box::new(io::empty())))
    }

    pub fn wrap(bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes = bytes.into();
        ByteSource::new(move || Ok(Box::new(Cursor::new(bytes.clone()))))
    }

    pub fn open_stream(&self) -> Result<ByteReader> {
        (self.opener)()
    }

    /// Reads a whole stream into memory.
    pub fn read(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.open_stream()?.read_to_end(&mut buffer)?;
        Ok(buffer)
    }

    pub fn as_char_source(&self, charset: Charset) -> CharSource {
        CharSource {
            bytes: self.clone(),
            charset,
        }
    }
}

impl fmt::Debug for ByteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ByteSource { .. }")
    }
}

/// A reusable factory of byte output streams.
#[derive(Clone)]
pub struct ByteSink {
    opener: Opener<ByteWriter>,
}

impl ByteSink {
    pub fn new<F>(opener: F) -> Self
    where
        F: Fn() -> Result<ByteWriter> + Send + Sync + 'static,
    {
        ByteSink {
            opener: Arc::new(opener),
        }
    }

    /// A sink whose streams discard everything written to them.
    pub fn discarding() -> Self {
        ByteSink::new(|| Ok(Box::new(io::sink())))
    }

    pub fn open_stream(&self) -> Result<ByteWriter> {
        (self.opener)()
    }

    /// Opens a stream, writes `bytes` to it and flushes it.
    pub fn write(&self, bytes: &[u8]) -> Result<()> {
        let mut stream = self.open_stream()?;
        stream.write_all(bytes)?;
        stream.flush()?;
        Ok(())
    }

    pub fn as_char_sink(&self, charset: Charset) -> CharSink {
        CharSink {
            bytes: self.clone(),
            charset,
        }
    }
}

impl fmt::Debug for ByteSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ByteSink { .. }")
    }
}

/// A [`ByteSource`] decoded with a charset.
#[derive(Debug, Clone)]
pub struct CharSource {
    bytes: ByteSource,
    charset: Charset,
}

impl CharSource {
    pub fn new(bytes: ByteSource, charset: Charset) -> Self {
        CharSource { bytes, charset }
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub fn byte_source(&self) -> &ByteSource {
        &self.bytes
    }

    /// Opens a buffered stream. UTF-8 is validated by `BufRead::read_line`
    /// and `Read::read_to_string`; US-ASCII streams additionally fail with
    /// `InvalidData` on the first byte above `0x7f`.
    pub fn open_stream(&self) -> Result<CharReader> {
        let stream = self.bytes.open_stream()?;
        Ok(match self.charset {
            Charset::Utf8 => Box::new(BufReader::new(stream)),
            Charset::UsAscii => Box::new(BufReader::new(AsciiReader(stream))),
        })
    }

    pub fn read(&self) -> Result<String> {
        let bytes = self.bytes.read()?;
        if self.charset == Charset::UsAscii && !bytes.is_ascii() {
            return Err(invalid_data("stream is not US-ASCII").into());
        }
        String::from_utf8(bytes).map_err(|e| invalid_data(e).into())
    }
}

/// A [`ByteSink`] encoding text with a charset.
#[derive(Debug, Clone)]
pub struct CharSink {
    bytes: ByteSink,
    charset: Charset,
}

impl CharSink {
    pub fn new(bytes: ByteSink, charset: Charset) -> Self {
        CharSink { bytes, charset }
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub fn byte_sink(&self) -> &ByteSink {
        &self.bytes
    }

    /// Opens a byte stream for encoded text. Writes to a US-ASCII stream fail
    /// with `InvalidData`, without writing anything, when the buffer holds a
    /// byte above `0x7f`.
    pub fn open_stream(&self) -> Result<ByteWriter> {
        let stream = self.bytes.open_stream()?;
        Ok(match self.charset {
            Charset::Utf8 => stream,
            Charset::UsAscii => Box::new(AsciiWriter(stream)),
        })
    }

    pub fn write(&self, text: &str) -> Result<()> {
        if self.charset == Charset::UsAscii && !text.is_ascii() {
            return Err(invalid_data("text is not US-ASCII").into());
        }
        self.bytes.write(text.as_bytes())
    }
}

struct AsciiReader(ByteReader);

impl Read for AsciiReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.0.read(buf)?;
        if !buf[..read].is_ascii() {
            return Err(invalid_data("stream is not US-ASCII"));
        }
        Ok(read)
    }
}

struct AsciiWriter(ByteWriter);

impl Write for AsciiWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !buf.is_ascii() {
            return Err(invalid_data("text is not US-ASCII"));
        }
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

fn invalid_data<E>(error: E) -> io::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    io::Error::new(io::ErrorKind::InvalidData, error)
}
