use crate::sequence_processor::core::{FastqRecord, MatePair};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Per-read diagnostic log: `<name> <length> <start> <end> <trailing>`.
pub struct TrimLogWriter {
    writer: BufWriter<Box<dyn Write + Send>>,
}

impl TrimLogWriter {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create trim log {}", path.display()))?;
        Ok(Self::from_writer(Box::new(file)))
    }

    pub fn from_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// One line per mate that was present in the input, mate 1 first.
    pub fn log_pair(&mut self, original: &MatePair, trimmed: &MatePair) -> Result<()> {
        let slots = original.mates().into_iter().zip(trimmed.mates());
        for (original, trimmed) in slots {
            if let Some(original) = original {
                writeln!(self.writer, "{}", log_line(original, trimmed))
                    .context("Failed to write trim log")?;
            }
        }
        Ok(())
    }

    pub fn close(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush trim log")
    }
}

pub(crate) fn log_line(original: &FastqRecord, trimmed: Option<&FastqRecord>) -> String {
    let (length, start) = match trimmed {
        Some(rec) => (rec.len(), rec.head_pos),
        None => (0, 0),
    };
    let end = length + start;
    // a dropped read reports everything as trailing trim
    let trailing = original.len().saturating_sub(end);

    format!("{} {} {} {} {}", original.name(), length, start, end, trailing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(seq: &[u8]) -> FastqRecord {
        FastqRecord::new("read", Some("1".to_string()), seq.to_vec(), vec![b'I'; seq.len()], 33)
    }

    #[test]
    fn test_log_line_arithmetic() {
        let original = rec(b"ACGTACGTAC");
        let trimmed = original.trim(2, 5);
        assert_eq!(log_line(&original, Some(&trimmed)), "read 1 5 2 7 3");
        assert_eq!(log_line(&original, Some(&original)), "read 1 10 0 10 0");
        assert_eq!(log_line(&original, None), "read 1 0 0 0 10");
    }

    #[test]
    fn test_log_pair_skips_absent_originals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trim.log");

        let mut log = TrimLogWriter::create(&path).unwrap();
        let a = rec(b"ACGT");
        log.log_pair(
            &MatePair::new(Some(a.clone()), Some(a.clone())),
            &MatePair::new(Some(a.trim(1, 3)), None),
        )
        .unwrap();
        log.log_pair(&MatePair::new(None, Some(a.clone())), &MatePair::new(None, Some(a)))
            .unwrap();
        log.close().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "read 1 3 1 4 0\nread 1 0 0 0 4\nread 1 4 0 4 0\n");
    }
}
