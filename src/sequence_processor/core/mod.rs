pub(crate) mod mate_pair;
pub(crate) mod record;
pub(crate) mod stats;
mod reader;
mod writer;

pub use mate_pair::{MatePair, PairFate};
pub use reader::RecordSource;
pub use record::FastqRecord;
pub use stats::TrimStats;
pub use writer::RecordSink;
