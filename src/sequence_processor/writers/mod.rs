mod fastq;
mod trim_log;

pub use fastq::FastqWriter;
pub use trim_log::TrimLogWriter;
