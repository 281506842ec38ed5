// src/io/fastq.rs
use crate::error::{AssemblyError, Result};
use crate::io::read::{normalize_id, Read};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FastqRecord {
    pub header: String,
    pub sequence: String,
    pub plus: String,
    pub quality: String,
}

impl FastqRecord {
    /// Convert into a read: id trimmed at the first whitespace, sequence upper-cased,
    /// quality decoded from Phred+33.
    pub fn into_read(self) -> Read {
        let quality = if self.quality.is_empty() {
            None
        } else {
            Some(
                self.quality
                    .bytes()
                    .map(|q| q.saturating_sub(33))
                    .collect(),
            )
        };
        Read {
            id: normalize_id(&self.header),
            sequence: self.sequence.trim().to_ascii_uppercase(),
            quality,
        }
    }
}

/// Open a FASTQ file for reading, handles gzipped files automatically
pub fn open_fastq(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|e| AssemblyError::io(path, e))?;
    if path.extension().map_or(false, |ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Stream FASTQ records one at a time instead of collecting all lines first.
/// Blank lines between records are tolerated.
pub fn stream_fastq_records<R: BufRead>(reader: R, path: &Path) -> FastqStreamParser<io::Lines<R>> {
    FastqStreamParser {
        lines: reader.lines(),
        path: path.to_path_buf(),
        line_no: 0,
    }
}

/// Iterator adaptor to handle streaming FASTQ parsing
pub struct FastqStreamParser<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    lines: I,
    path: PathBuf,
    line_no: usize,
}

impl<I> FastqStreamParser<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    fn next_line(&mut self) -> Option<Result<String>> {
        loop {
            let line = self.lines.next()?;
            self.line_no += 1;
            match line {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => return Some(Ok(line)),
                Err(e) => return Some(Err(AssemblyError::io(&self.path, e))),
            }
        }
    }

    fn truncated(&self) -> AssemblyError {
        AssemblyError::MalformedInput {
            path: self.path.clone(),
            line: self.line_no,
            message: "truncated FASTQ record".to_string(),
        }
    }
}

impl<I> Iterator for FastqStreamParser<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = Result<FastqRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let header = match self.next_line()? {
            Ok(line) => line,
            Err(e) => return Some(Err(e)),
        };
        if !header.starts_with('@') {
            return Some(Err(AssemblyError::MalformedInput {
                path: self.path.clone(),
                line: self.line_no,
                message: format!("expected '@' header, found {:?}", header),
            }));
        }

        let mut rest = Vec::with_capacity(3);
        for _ in 0..3 {
            match self.lines.next() {
                Some(Ok(line)) => {
                    self.line_no += 1;
                    rest.push(line);
                }
                Some(Err(e)) => return Some(Err(AssemblyError::io(&self.path, e))),
                None => return Some(Err(self.truncated())),
            }
        }
        let quality = rest.pop().unwrap_or_default();
        let plus = rest.pop().unwrap_or_default();
        let sequence = rest.pop().unwrap_or_default();

        if !plus.starts_with('+') {
            return Some(Err(AssemblyError::MalformedInput {
                path: self.path.clone(),
                line: self.line_no - 1,
                message: format!("expected '+' separator, found {:?}", plus),
            }));
        }

        Some(Ok(FastqRecord {
            header,
            sequence,
            plus,
            quality,
        }))
    }
}

/// Load every record of a FASTQ(.gz) file as reads, in file order.
pub fn read_fastq(path: &Path) -> Result<Vec<Read>> {
    let reader = open_fastq(path)?;
    stream_fastq_records(reader, path)
        .map(|record| record.map(FastqRecord::into_read))
        .collect()
}
