use crate::sequence_processor::core::{FastqRecord, RecordSink};
use anyhow::{Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

type Inner = Box<dyn Write + Send>;

/// Destination byte stream. A gzip stream is only complete once its
/// trailer has been written by [`OutputStream::finish`].
enum OutputStream {
    Plain(Inner),
    Gzip(GzEncoder<Inner>),
}

impl OutputStream {
    fn finish(&mut self) -> io::Result<()> {
        match self {
            OutputStream::Plain(w) => w.flush(),
            OutputStream::Gzip(w) => {
                w.try_finish()?;
                w.get_mut().flush()
            }
        }
    }
}

impl Write for OutputStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputStream::Plain(w) => w.write(buf),
            OutputStream::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputStream::Plain(w) => w.flush(),
            OutputStream::Gzip(w) => w.flush(),
        }
    }
}

/// Four-line FASTQ record sink. Paths ending in `.gz` are gzip compressed.
pub struct FastqWriter {
    writer: BufWriter<OutputStream>,
    name: String,
}

impl FastqWriter {
    pub fn create(path: &Path, compression_level: u32) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file {}", path.display()))?;
        let name = path.display().to_string();
        if path.extension().map_or(false, |ext| ext == "gz") {
            Ok(Self::gzip(Box::new(file), name, compression_level))
        } else {
            Ok(Self::from_writer(Box::new(file), name))
        }
    }

    pub fn from_writer(writer: Inner, name: impl Into<String>) -> Self {
        Self::with_stream(OutputStream::Plain(writer), name.into())
    }

    pub fn gzip(writer: Inner, name: impl Into<String>, compression_level: u32) -> Self {
        let encoder = GzEncoder::new(writer, Compression::new(compression_level.min(9)));
        Self::with_stream(OutputStream::Gzip(encoder), name.into())
    }

    fn with_stream(stream: OutputStream, name: String) -> Self {
        Self {
            writer: BufWriter::new(stream),
            name,
        }
    }
}

impl RecordSink for FastqWriter {
    fn write_record(&mut self, record: &FastqRecord) -> Result<()> {
        write_fastq(&mut self.writer, record)
            .with_context(|| format!("Failed to write record to {}", self.name))
    }

    /// Flush buffered records and, for gzip, write the stream trailer.
    fn close(&mut self) -> Result<()> {
        self.writer
            .flush()
            .and_then(|_| self.writer.get_mut().finish())
            .with_context(|| format!("Failed to finish {}", self.name))
    }
}

fn write_fastq<W: Write>(w: &mut W, record: &FastqRecord) -> io::Result<()> {
    w.write_all(b"@")?;
    w.write_all(record.id.as_bytes())?;
    if let Some(desc) = &record.desc {
        w.write_all(b" ")?;
        w.write_all(desc.as_bytes())?;
    }
    w.write_all(b"\n")?;
    w.write_all(&record.sequence)?;
    w.write_all(b"\n+\n")?;
    w.write_all(&record.quality)?;
    w.write_all(b"\n")
}
