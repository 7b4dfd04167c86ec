//! Sequence loading
//!
//! Reads one FASTA record (optionally gzip-compressed) into an uppercase
//! nucleotide sequence. Parsing is delegated to needletail; gzip input is
//! decoded with flate2 when the path ends in `.gz`.
//!
//! Symbols outside A/C/G/T are handled according to [`AlphabetPolicy`]:
//!
//! * `Mask` (default): any other ASCII letter (IUPAC ambiguity codes, `U`,
//!   `X`, ...) becomes `N`, which never matches anything. Non-letter bytes
//!   are rejected.
//! * `Strict`: anything other than A/C/G/T/N is rejected.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use needletail::parse_fastx_reader;

use crate::error::{DotPlotError, Result};

/// Ambiguity symbol; never matches, not even itself
pub const AMBIGUOUS: u8 = b'N';

/// Treatment of symbols outside the nucleotide alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlphabetPolicy {
    /// Map unknown letters to `N`
    #[default]
    Mask,
    /// Reject anything other than A, C, G, T and N
    Strict,
}

/// An immutable, uppercase nucleotide sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub id: String,
    pub description: Option<String>,
    data: Vec<u8>,
}

impl Sequence {
    /// Normalise raw symbols under `policy`. The error names the first
    /// offending symbol and its offset.
    pub fn from_bytes<S: Into<String>>(
        id: S,
        raw: &[u8],
        policy: AlphabetPolicy,
    ) -> std::result::Result<Self, String> {
        let mut data = Vec::with_capacity(raw.len());
        for (offset, &byte) in raw.iter().enumerate() {
            let upper = byte.to_ascii_uppercase();
            let symbol = match (upper, policy) {
                (b'A' | b'C' | b'G' | b'T' | AMBIGUOUS, _) => upper,
                (b'A'..=b'Z', AlphabetPolicy::Mask) => AMBIGUOUS,
                _ => {
                    return Err(format!(
                        "invalid symbol {:?} at offset {}",
                        byte as char, offset
                    ))
                }
            };
            data.push(symbol);
        }

        Ok(Self {
            id: id.into(),
            description: None,
            data,
        })
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of valid window start offsets for window length `k`
    pub fn window_count(&self, k: usize) -> usize {
        if k == 0 || k > self.data.len() {
            0
        } else {
            self.data.len() - k + 1
        }
    }

    /// Fraction of symbols masked to `N`
    pub fn ambiguous_fraction(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        let masked = self.data.iter().filter(|&&b| b == AMBIGUOUS).count();
        masked as f64 / self.data.len() as f64
    }
}

/// Load one record from a FASTA file.
///
/// With `record_name` the first record whose id (header up to the first
/// whitespace) equals it is returned, otherwise the first record.
pub fn load_sequence<P: AsRef<Path>>(
    path: P,
    record_name: Option<&str>,
    policy: AlphabetPolicy,
) -> Result<Sequence> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| DotPlotError::malformed(path, format!("cannot open file: {}", e)))?;

    let reader: Box<dyn Read + Send> = if path.to_string_lossy().ends_with(".gz") {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let sequence = read_sequence(reader, record_name, policy)
        .map_err(|reason| DotPlotError::malformed(path, reason))?;

    log::debug!(
        "Loaded {} ({} bp, {:.2}% ambiguous) from {}",
        sequence.id,
        sequence.len(),
        sequence.ambiguous_fraction() * 100.0,
        path.display()
    );
    Ok(sequence)
}

/// Parse FASTA data from any readable source
pub fn read_sequence<R: Read + Send>(
    reader: R,
    record_name: Option<&str>,
    policy: AlphabetPolicy,
) -> std::result::Result<Sequence, String> {
    let mut fastx_reader = parse_fastx_reader(reader).map_err(|e| e.to_string())?;

    while let Some(record) = fastx_reader.next() {
        let record = record.map_err(|e| e.to_string())?;
        let header = String::from_utf8_lossy(record.id()).to_string();
        let (id, description) = split_header(&header);

        if let Some(name) = record_name {
            if id != name {
                continue;
            }
        }

        let seq = record.seq();
        if seq.is_empty() {
            return Err(format!("record '{}' has an empty sequence", id));
        }

        let mut sequence = Sequence::from_bytes(id, &seq, policy)
            .map_err(|reason| format!("record '{}': {}", id, reason))?;
        if let Some(desc) = description {
            sequence = sequence.with_description(desc.to_string());
        }
        return Ok(sequence);
    }

    match record_name {
        Some(name) => Err(format!("sequence '{}' not found", name)),
        None => Err("no sequence record found".to_string()),
    }
}

fn split_header(header: &str) -> (&str, Option<&str>) {
    match header.split_once(char::is_whitespace) {
        Some((id, rest)) => {
            let rest = rest.trim();
            (id, if rest.is_empty() { None } else { Some(rest) })
        }
        None => (header, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_fasta(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().expect("create temp fasta");
        f.write_all(contents.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn test_uppercases_sequence() {
        let f = write_fasta(">chr1 test record\nacgtACGTnn\n");
        let seq = load_sequence(f.path(), None, AlphabetPolicy::Mask).unwrap();
        assert_eq!(seq.id, "chr1");
        assert_eq!(seq.description.as_deref(), Some("test record"));
        assert_eq!(seq.as_bytes(), b"ACGTACGTNN");
    }

    #[test]
    fn test_mask_policy_maps_letters_to_n() {
        let seq = Sequence::from_bytes("s", b"ACRYGTU", AlphabetPolicy::Mask).unwrap();
        assert_eq!(seq.as_bytes(), b"ACNNGTN");
        assert!((seq.ambiguous_fraction() - 3.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_mask_policy_rejects_non_letters() {
        let err = Sequence::from_bytes("s", b"ACG-T", AlphabetPolicy::Mask).unwrap_err();
        assert!(err.contains("offset 3"));
    }

    #[test]
    fn test_strict_policy_rejects_ambiguity_codes() {
        assert!(Sequence::from_bytes("s", b"ACGTN", AlphabetPolicy::Strict).is_ok());
        assert!(Sequence::from_bytes("s", b"ACGTR", AlphabetPolicy::Strict).is_err());
    }

    #[test]
    fn test_selects_named_record() {
        let f = write_fasta(">first\nAAAA\n>second\nCCCC\n");
        let seq = load_sequence(f.path(), Some("second"), AlphabetPolicy::Mask).unwrap();
        assert_eq!(seq.as_bytes(), b"CCCC");

        let err = load_sequence(f.path(), Some("third"), AlphabetPolicy::Mask).unwrap_err();
        assert!(matches!(err, DotPlotError::MalformedInput { .. }));
    }

    #[test]
    fn test_missing_header_is_malformed() {
        let f = write_fasta("ACGTACGT\n");
        let err = load_sequence(f.path(), None, AlphabetPolicy::Mask).unwrap_err();
        assert!(matches!(err, DotPlotError::MalformedInput { .. }));
    }

    #[test]
    fn test_empty_file_is_malformed() {
        let f = write_fasta("");
        let err = load_sequence(f.path(), None, AlphabetPolicy::Mask).unwrap_err();
        assert!(matches!(err, DotPlotError::MalformedInput { .. }));
    }

    #[test]
    fn test_missing_file_is_malformed() {
        let err = load_sequence("/definitely/not/here.fa", None, AlphabetPolicy::Mask)
            .unwrap_err();
        assert!(matches!(err, DotPlotError::MalformedInput { .. }));
    }

    #[test]
    fn test_gzipped_input() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seq.fa.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(b">gz\nGATTACA\n").unwrap();
        encoder.finish().unwrap();

        let seq = load_sequence(&path, None, AlphabetPolicy::Mask).unwrap();
        assert_eq!(seq.id, "gz");
        assert_eq!(seq.as_bytes(), b"GATTACA");
    }

    #[test]
    fn test_window_count() {
        let seq = Sequence::from_bytes("s", b"ACGTAC", AlphabetPolicy::Mask).unwrap();
        assert_eq!(seq.window_count(4), 3);
        assert_eq!(seq.window_count(7), 0);
        assert_eq!(seq.window_count(0), 0);
    }
}
