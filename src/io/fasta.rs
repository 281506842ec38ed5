// src/io/fasta.rs
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use flate2::write::GzEncoder;
use flate2::read::MultiGzDecoder;
use flate2::Compression;

use crate::error::{AssemblyError, Result};
use crate::graph::assembler::Contig;
use crate::io::read::{normalize_id, Read};

pub enum FastaWriter {
    Plain(BufWriter<File>),
    Compressed(BufWriter<GzEncoder<File>>),
}

/// Open a FASTA file for reading, handles gzipped files automatically
pub fn open_fasta(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|e| AssemblyError::io(path, e))?;
    if path.extension().map_or(false, |ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Parse FASTA records; sequence lines are concatenated and upper-cased.
pub fn parse_fasta<R: BufRead>(reader: R, path: &Path) -> Result<Vec<Read>> {
    let mut reads = Vec::new();
    let mut current: Option<Read> = None;

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| AssemblyError::io(path, e))?;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('>') {
            if let Some(read) = current.take() {
                reads.push(read);
            }
            current = Some(Read::new(normalize_id(line), String::new()));
        } else {
            match current.as_mut() {
                Some(read) => read.sequence.push_str(&line.to_ascii_uppercase()),
                None => {
                    return Err(AssemblyError::MalformedInput {
                        path: path.to_path_buf(),
                        line: idx + 1,
                        message: "sequence data before the first '>' header".to_string(),
                    })
                }
            }
        }
    }

    if let Some(read) = current {
        reads.push(read);
    }
    Ok(reads)
}

pub fn read_fasta(path: &Path) -> Result<Vec<Read>> {
    let reader = open_fasta(path)?;
    parse_fasta(reader, path)
}

impl FastaWriter {
    pub fn new(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|e| AssemblyError::io(path, e))?;
        if path.extension().map_or(false, |ext| ext == "gz") {
            let encoder = GzEncoder::new(file, Compression::default());
            Ok(FastaWriter::Compressed(BufWriter::new(encoder)))
        } else {
            Ok(FastaWriter::Plain(BufWriter::new(file)))
        }
    }

    /// Write one contig as `>contig_<id>` followed by its sequence on a single line.
    pub fn write_contig(&mut self, contig: &Contig, id: usize) -> std::io::Result<()> {
        match self {
            FastaWriter::Plain(writer) => {
                writeln!(writer, ">contig_{}", id)?;
                writeln!(writer, "{}", contig.sequence)?;
            },
            FastaWriter::Compressed(writer) => {
                writeln!(writer, ">contig_{}", id)?;
                writeln!(writer, "{}", contig.sequence)?;
            },
        };
        Ok(())
    }

    pub fn finish(self) -> std::io::Result<()> {
        match self {
            FastaWriter::Plain(mut writer) => writer.flush(),
            FastaWriter::Compressed(writer) => {
                let encoder = writer.into_inner().map_err(|e| e.into_error())?;
                encoder.finish()?;
                Ok(())
            },
        }
    }
}

/// Write contigs in production order with 1-based `contig_<n>` headers.
pub fn write_contigs(path: &Path, contigs: &[Contig]) -> Result<()> {
    let mut writer = FastaWriter::new(path)?;
    for (i, contig) in contigs.iter().enumerate() {
        writer
            .write_contig(contig, i + 1)
            .map_err(|e| AssemblyError::io(path, e))?;
    }
    writer.finish().map_err(|e| AssemblyError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_multiline_fasta() {
        let data = ">seq1 desc\nacgt\nACGT\n\n>seq2\nTTTT\n";
        let reads = parse_fasta(Cursor::new(data), Path::new("mem.fa")).unwrap();
        assert_eq!(reads.len(), 2);
        assert_eq!(reads[0].id, "seq1");
        assert_eq!(reads[0].sequence, "ACGTACGT");
        assert_eq!(reads[1].sequence, "TTTT");
        assert!(reads[1].quality.is_none());
    }

    #[test]
    fn test_sequence_before_header_is_an_error() {
        let result = parse_fasta(Cursor::new("ACGT\n>x\nA\n"), Path::new("mem.fa"));
        assert!(matches!(
            result,
            Err(AssemblyError::MalformedInput { line: 1, .. })
        ));
    }

    #[test]
    fn test_write_contigs_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.fasta");
        let contigs = vec![
            Contig::new(0, "ACGTACTGAA".to_string()),
            Contig::new(1, "GGGG".to_string()),
        ];
        write_contigs(&path, &contigs).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, ">contig_1\nACGTACTGAA\n>contig_2\nGGGG\n");
    }

    #[test]
    fn test_write_contigs_gzip_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.fasta.gz");
        write_contigs(&path, &[Contig::new(0, "ACGT".to_string())]).unwrap();

        let reads = read_fasta(&path).unwrap();
        assert_eq!(reads.len(), 1);
        assert_eq!(reads[0].id, "contig_1");
        assert_eq!(reads[0].sequence, "ACGT");
    }

    #[test]
    fn test_write_empty_contig_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.fasta");
        write_contigs(&path, &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }
}
