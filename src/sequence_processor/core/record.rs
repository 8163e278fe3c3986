/// A decoded FASTQ read together with the position of its surviving
/// region inside the read as it was originally sequenced.
///
/// Records are never mutated once built; trimming produces a narrower copy
/// through [`FastqRecord::trim`], which keeps `head_pos` in step with the
/// number of bases removed from the 5' end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRecord {
    pub id: String,
    pub desc: Option<String>,
    pub sequence: Vec<u8>,
    pub quality: Vec<u8>,
    pub head_pos: usize,
    pub phred_offset: u8,
}

impl FastqRecord {
    pub fn new(
        id: impl Into<String>,
        desc: Option<String>,
        sequence: Vec<u8>,
        quality: Vec<u8>,
        phred_offset: u8,
    ) -> Self {
        Self {
            id: id.into(),
            desc,
            sequence,
            quality,
            head_pos: 0,
            phred_offset,
        }
    }

    /// Header line without the leading '@'.
    pub fn name(&self) -> String {
        match &self.desc {
            Some(desc) => format!("{} {}", self.id, desc),
            None => self.id.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn quality_score(&self, index: usize) -> i32 {
        self.quality[index] as i32 - self.phred_offset as i32
    }

    pub fn quality_scores(&self) -> impl Iterator<Item = i32> + '_ {
        self.quality
            .iter()
            .map(move |&q| q as i32 - self.phred_offset as i32)
    }

    /// Keep `len` bases starting at `start`. Out-of-range requests are
    /// clamped to the current read, so a trim can only ever narrow.
    pub fn trim(&self, start: usize, len: usize) -> FastqRecord {
        let start = start.min(self.sequence.len());
        let end = start + len.min(self.sequence.len() - start);

        FastqRecord {
            id: self.id.clone(),
            desc: self.desc.clone(),
            sequence: self.sequence[start..end].to_vec(),
            quality: self.quality[start..end].to_vec(),
            head_pos: self.head_pos + start,
            phred_offset: self.phred_offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> FastqRecord {
        FastqRecord::new("read1", Some("1:N:0".to_string()), b"ACGTACGT".to_vec(), b"IIIIIIII".to_vec(), 33)
    }

    #[test]
    fn test_name_includes_description() {
        assert_eq!(record().name(), "read1 1:N:0");

        let mut bare = record();
        bare.desc = None;
        assert_eq!(bare.name(), "read1");
    }

    #[test]
    fn test_trim_tracks_head_position() {
        let rec = record();
        let first = rec.trim(2, 4);
        assert_eq!(first.sequence, b"GTAC");
        assert_eq!(first.head_pos, 2);

        let second = first.trim(1, 10);
        assert_eq!(second.sequence, b"TAC");
        assert_eq!(second.quality, b"III");
        assert_eq!(second.head_pos, 3);
    }

    #[test]
    fn test_quality_scores_use_offset() {
        let rec = FastqRecord::new("r", None, b"AC".to_vec(), b"#I".to_vec(), 33);
        assert_eq!(rec.quality_scores().collect::<Vec<_>>(), vec![2, 40]);
        assert_eq!(rec.quality_score(1), 40);
    }
}
