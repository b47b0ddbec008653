//src/motif.rs

use std::fmt;
use crate::error::{NanoRangerError, Result};
use crate::types::DNASequence;

/// Symbols accepted in a cutting site.
const NUCLEOTIDES: &[u8] = b"ACGTN";

/// Symbols accepted in a primer (IUPAC degenerate codes included).
const IUPAC: &[u8] = b"ACGTURYSWKMBDHVN";

#[inline]
fn is_valid_base(b: u8, alphabet: &[u8]) -> bool {
    alphabet.contains(&b)
}

/// Upper-case `raw` and reject any symbol outside `alphabet`.
fn normalize(kind: &'static str, raw: &str, alphabet: &[u8]) -> Result<String> {
    let seq = raw.trim().to_ascii_uppercase();
    if seq.is_empty() {
        return Err(NanoRangerError::config(format!("{kind} sequence is empty")));
    }
    if let Some(bad) = seq.bytes().find(|&b| !is_valid_base(b, alphabet)) {
        return Err(NanoRangerError::InvalidSequence {
            kind,
            sequence: raw.to_string(),
            symbol: bad as char,
        });
    }
    Ok(seq)
}

/// Validate a primer, returning its upper-case form.
pub fn normalize_primer(raw: &str) -> Result<String> {
    normalize("primer", raw, IUPAC)
}

/// A validated restriction motif.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CuttingSite(String);

impl CuttingSite {
    pub fn new(raw: &str) -> Result<Self> {
        normalize("cutting site", raw, NUCLEOTIDES).map(CuttingSite)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Non-overlapping occurrences in `seq`, scanning left to right and
    /// resuming after the end of each match.
    #[inline]
    pub fn count_in(&self, seq: &str) -> usize {
        if seq.len() < self.0.len() {
            return 0;
        }
        seq.matches(self.0.as_str()).count()
    }

    /// Occurrences in one read.
    pub fn count_in_read(&self, dna: &DNASequence) -> usize {
        self.count_in(&dna.seq)
    }
}

impl fmt::Display for CuttingSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
