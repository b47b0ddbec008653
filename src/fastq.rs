use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use crate::error::{NanoRangerError, Result};
use crate::types::DNASequence;

use flate2::read::MultiGzDecoder;
use std::path::Path;

fn open_reader(path: &Path) -> Result<Box<dyn BufRead>> {
    let f = File::open(path)?;

    // If the file ends with ".gz", wrap it in a MultiGzDecoder
    let is_gz = path
        .extension()
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    Ok(if is_gz {
        Box::new(BufReader::new(MultiGzDecoder::new(f)))
    } else {
        Box::new(BufReader::new(f))
    })
}

/// Minimal FASTQ read function that also supports .gz
///
/// Lines that do not start a record are skipped until the next '@'.
/// A record cut short by end-of-file is an error, not a silent drop.
pub fn read_fastq_records<P: AsRef<Path>>(path: P) -> Result<Vec<DNASequence>> {
    let path = path.as_ref();
    let mut reader = open_reader(path)?;

    let truncated = |what: &str| NanoRangerError::Fastq {
        path: path.to_path_buf(),
        reason: format!("file ends before {what} line"),
    };

    let mut sequences = Vec::new();
    let mut line = String::new();

    loop {
        line.clear();
        // 1) read header
        if reader.read_line(&mut line)? == 0 {
            break; // EOF
        }
        let header_line = line.trim_end();
        let Some(header_str) = header_line.strip_prefix('@') else {
            continue;
        };
        let header_str = header_str.to_string();

        // 2) read sequence
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(truncated("sequence"));
        }
        let seq_str = line.trim_end().to_ascii_uppercase();

        // 3) read plus line
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(truncated("separator"));
        }
        if !line.starts_with('+') {
            return Err(NanoRangerError::Fastq {
                path: path.to_path_buf(),
                reason: format!("record '{header_str}' has no '+' separator"),
            });
        }

        // 4) read quality
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(truncated("quality"));
        }
        let qual_str = line.trim_end().to_string();

        let id = header_str
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
        sequences.push(DNASequence {
            id,
            header_line: header_str,
            seq: seq_str,
            quals: qual_str,
        });
    }

    Ok(sequences)
}

/// Write reads back out as plain 4-line records.
pub fn write_fastq_records<'a, P, I>(path: P, reads: I) -> Result<usize>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = &'a DNASequence>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    let mut written = 0;
    for read in reads {
        writeln!(writer, "@{}\n{}\n+\n{}", read.header_line, read.seq, read.quals)?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

/// Number of records in a FASTQ file.
pub fn count_records<P: AsRef<Path>>(path: P) -> Result<usize> {
    Ok(read_fastq_records(path)?.len())
}
