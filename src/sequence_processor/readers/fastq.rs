use crate::error::TrimError;
use crate::sequence_processor::core::{FastqRecord, RecordSource};
use anyhow::{Context, Result};
use bio::io::fastq;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

type InnerRecords = fastq::Records<BufReader<Box<dyn Read + Send>>>;

/// FASTQ record source over a plain or compressed stream.
pub struct FastqReader {
    records: InnerRecords,
    name: String,
    phred_offset: u8,
    index: u64,
}

impl FastqReader {
    pub fn new(path: &Path, phred_offset: u8, buffer_bytes: usize) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open input file {}", path.display()))?;
        Self::from_reader(
            Box::new(file),
            path.display().to_string(),
            phred_offset,
            buffer_bytes,
        )
    }

    pub fn from_reader(
        reader: Box<dyn Read + Send>,
        name: impl Into<String>,
        phred_offset: u8,
        buffer_bytes: usize,
    ) -> Result<Self> {
        let name = name.into();
        let mut buffered = BufReader::new(reader);
        // compression sniffing needs a few bytes; an empty input is just an empty stream
        let inner_reader: Box<dyn Read + Send> = if buffered.fill_buf()?.is_empty() {
            Box::new(io::empty())
        } else {
            let (inner_reader, _compression) = niffler::send::get_reader(Box::new(buffered))
                .with_context(|| format!("Failed to detect compression of {}", name))?;
            inner_reader
        };
        let records = fastq::Reader::from_bufread(BufReader::with_capacity(
            buffer_bytes.max(1),
            inner_reader,
        ))
        .records();

        Ok(Self {
            records,
            name,
            phred_offset,
            index: 0,
        })
    }

    fn create_record_from_fastq(&self, record: &fastq::Record) -> FastqRecord {
        FastqRecord::new(
            record.id(),
            record.desc().map(str::to_string),
            record.seq().to_vec(),
            record.qual().to_vec(),
            self.phred_offset,
        )
    }
}

impl RecordSource for FastqReader {
    fn next_record(&mut self) -> Result<Option<FastqRecord>> {
        let record = match self.records.next() {
            None => return Ok(None),
            Some(Ok(record)) => record,
            Some(Err(e)) => {
                return Err(TrimError::malformed_record(&self.name, self.index, e.to_string()).into())
            }
        };

        if let Err(reason) = record.check() {
            return Err(TrimError::malformed_record(&self.name, self.index, reason).into());
        }

        self.index += 1;
        Ok(Some(self.create_record_from_fastq(&record)))
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(text: &str) -> FastqReader {
        FastqReader::from_reader(
            Box::new(Cursor::new(text.as_bytes().to_vec())),
            "test.fq",
            33,
            1024,
        )
        .unwrap()
    }

    #[test]
    fn test_reads_records_in_order() {
        let mut r = reader("@r1 1:N\nACGT\n+\nIIII\n@r2\nGG\n+\n#I\n");

        let first = r.next_record().unwrap().unwrap();
        assert_eq!(first.name(), "r1 1:N");
        assert_eq!(first.sequence, b"ACGT");
        assert_eq!(first.phred_offset, 33);

        let second = r.next_record().unwrap().unwrap();
        assert_eq!(second.name(), "r2");
        assert_eq!(second.quality_score(0), 2);

        assert!(r.next_record().unwrap().is_none());
    }

    #[test]
    fn test_malformed_record_reports_index() {
        let mut r = reader("@r1\nACGT\n+\nIIII\n@r2\nACGT\n+\nII\n");
        assert!(r.next_record().unwrap().is_some());

        let err = r.next_record().unwrap_err();
        match err.downcast_ref::<TrimError>() {
            Some(TrimError::MalformedRecord { index, source_name, .. }) => {
                assert_eq!(*index, 1);
                assert_eq!(source_name, "test.fq");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_empty_input() {
        let mut r = reader("");
        assert!(r.next_record().unwrap().is_none());
    }
}
