use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::HarvestError;

pub const LINE_WIDTH: usize = 60;

const NUCLEOTIDES: [char; 4] = ['A', 'C', 'G', 'T'];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SequenceId(String);

impl SequenceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SequenceId {
    type Err = HarvestError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_string();
        let is_valid = !normalized.is_empty()
            && normalized
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
        if !is_valid {
            return Err(HarvestError::InvalidSequenceId(value.to_string()));
        }
        Ok(Self(normalized))
    }
}

pub fn generate_dna_sequence<R: Rng>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| NUCLEOTIDES.choose(rng).copied().unwrap_or('A'))
        .collect()
}

/// Inserts `tag` at a random position of `sequence`. Statistics are meant to
/// be computed on the untagged sequence, so callers take them first.
pub fn insert_tag<R: Rng>(rng: &mut R, sequence: &str, tag: &str) -> String {
    if tag.is_empty() {
        return sequence.to_string();
    }
    let position = rng.gen_range(0..=sequence.len());
    let mut tagged = String::with_capacity(sequence.len() + tag.len());
    tagged.push_str(&sequence[..position]);
    tagged.push_str(tag);
    tagged.push_str(&sequence[position..]);
    tagged
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NucleotideStats {
    pub a: usize,
    pub c: usize,
    pub g: usize,
    pub t: usize,
}

impl NucleotideStats {
    pub fn from_sequence(sequence: &str) -> Self {
        let mut stats = Self::default();
        for base in sequence.chars() {
            match base.to_ascii_uppercase() {
                'A' => stats.a += 1,
                'C' => stats.c += 1,
                'G' => stats.g += 1,
                'T' => stats.t += 1,
                _ => {}
            }
        }
        stats
    }

    pub fn total(&self) -> usize {
        self.a + self.c + self.g + self.t
    }

    pub fn count(&self, base: char) -> usize {
        match base.to_ascii_uppercase() {
            'A' => self.a,
            'C' => self.c,
            'G' => self.g,
            'T' => self.t,
            _ => 0,
        }
    }

    pub fn percent(&self, base: char) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.count(base) as f64 / total as f64) * 100.0
    }

    /// (C+G)/(A+T); `None` when the sequence has no A or T.
    pub fn cg_at_ratio(&self) -> Option<f64> {
        let cg = self.c + self.g;
        let at = self.a + self.t;
        (at > 0).then(|| cg as f64 / at as f64)
    }
}

pub fn format_fasta(id: &SequenceId, description: &str, sequence: &str) -> String {
    let mut fasta = format!(">{id}");
    if !description.is_empty() {
        fasta.push(' ');
        fasta.push_str(description);
    }
    fasta.push('\n');
    for start in (0..sequence.len()).step_by(LINE_WIDTH) {
        let end = sequence.len().min(start + LINE_WIDTH);
        fasta.push_str(&sequence[start..end]);
        fasta.push('\n');
    }
    fasta
}
