use crate::error::{AssemblyError, Result};
use crate::io::{fasta, fastq};
use std::path::Path;

/// A sequencing read as handed to the assemblers. Never mutated after ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Read {
    pub id: String,
    pub sequence: String,
    /// Per-base Phred scores, when the source format carries them.
    pub quality: Option<Vec<u8>>,
}

impl Read {
    pub fn new(id: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sequence: sequence.into(),
            quality: None,
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Build reads named `read_0`, `read_1`, ... from bare sequences.
pub fn reads_from_sequences<S: AsRef<str>>(sequences: &[S]) -> Vec<Read> {
    sequences
        .iter()
        .enumerate()
        .map(|(i, seq)| Read::new(format!("read_{}", i), seq.as_ref()))
        .collect()
}

/// Strip the record marker and keep the identifier up to the first whitespace.
pub(crate) fn normalize_id(header: &str) -> String {
    header
        .trim_start_matches(|c| c == '@' || c == '>')
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeqFormat {
    Fasta,
    Fastq,
}

fn detect_format(path: &Path) -> Option<SeqFormat> {
    let name = path.file_name()?.to_str()?.to_ascii_lowercase();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    let ext = name.rsplit('.').next()?;
    match ext {
        "fq" | "fastq" => Some(SeqFormat::Fastq),
        "fa" | "fasta" | "fna" | "fas" => Some(SeqFormat::Fasta),
        _ => None,
    }
}

/// Load all reads from a FASTA or FASTQ file (optionally gzipped), in file order.
pub fn load_reads(path: &Path) -> Result<Vec<Read>> {
    match detect_format(path) {
        Some(SeqFormat::Fastq) => fastq::read_fastq(path),
        Some(SeqFormat::Fasta) => fasta::read_fasta(path),
        None => Err(AssemblyError::Configuration {
            message: format!(
                "cannot infer sequence format of `{}` (expected .fastq/.fq/.fasta/.fa, optionally .gz)",
                path.display()
            ),
        }),
    }
}
