use super::record::FastqRecord;

/// The two reads of one sequenced fragment. Either slot may be absent:
/// because the read was dropped by a trimmer, or because one input stream
/// ran out before the other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatePair {
    pub mate1: Option<FastqRecord>,
    pub mate2: Option<FastqRecord>,
}

/// Which mates of a pair survived trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairFate {
    BothKept,
    OnlyMate1,
    OnlyMate2,
    Dropped,
}

impl MatePair {
    pub fn new(mate1: Option<FastqRecord>, mate2: Option<FastqRecord>) -> Self {
        Self { mate1, mate2 }
    }

    pub fn fate(&self) -> PairFate {
        match (&self.mate1, &self.mate2) {
            (Some(_), Some(_)) => PairFate::BothKept,
            (Some(_), None) => PairFate::OnlyMate1,
            (None, Some(_)) => PairFate::OnlyMate2,
            (None, None) => PairFate::Dropped,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.mate1.is_none() && self.mate2.is_none()
    }

    /// Mates in output order: mate 1 then mate 2.
    pub fn mates(&self) -> [Option<&FastqRecord>; 2] {
        [self.mate1.as_ref(), self.mate2.as_ref()]
    }
}
