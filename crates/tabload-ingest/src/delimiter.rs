//! Field separator detection from the first line of a file.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tabload_model::Delimiter;

use crate::error::{IngestError, Result};
use crate::text::decode_text;

const UTF16LE_BOM: [u8; 2] = [0xFF, 0xFE];

/// Picks the separator that occurs most often in `line`.
///
/// Ties go to the candidate listed first in [`Delimiter::CANDIDATES`], so a
/// line without any candidate yields [`Delimiter::Comma`].
pub fn detect_delimiter_in_line(line: &str) -> Delimiter {
    let mut best = Delimiter::CANDIDATES[0];
    let mut best_count = 0usize;
    for candidate in Delimiter::CANDIDATES {
        let count = line.chars().filter(|&ch| ch == candidate.as_char()).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

/// Reads the first line of `path` and detects its separator.
///
/// Only the first line is read. A leading byte-order mark is ignored.
pub fn detect_delimiter(path: &Path) -> Result<Delimiter> {
    let line = read_first_line(path)?;
    let delimiter = detect_delimiter_in_line(&line);
    tracing::debug!(
        path = %path.display(),
        delimiter = delimiter.name(),
        "detected delimiter"
    );
    Ok(delimiter)
}

fn read_first_line(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| IngestError::from_io(path, e))?;
    let mut reader = BufReader::new(file);
    let raw = read_raw_line(&mut reader).map_err(|e| IngestError::from_io(path, e))?;
    let decoded = decode_text(&raw);
    Ok(decoded.text.trim_end_matches(['\r', '\n']).to_string())
}

/// Bytes of the first line. UTF-16LE input ends on a whole `0A 00` unit.
fn read_raw_line<R: BufRead>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut raw = Vec::new();
    loop {
        if reader.read_until(b'\n', &mut raw)? == 0
            || !raw.starts_with(&UTF16LE_BOM)
            || !raw.ends_with(b"\n")
        {
            return Ok(raw);
        }
        // At an even length the `0A` was the high byte of a code unit.
        if !raw.len().is_multiple_of(2) {
            let mut high = [0u8; 1];
            if reader.read(&mut high)? == 0 {
                return Ok(raw);
            }
            raw.push(high[0]);
            if high[0] == 0 {
                return Ok(raw);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn comma_beats_semicolon() {
        assert_eq!(detect_delimiter_in_line("a,b;c,d"), Delimiter::Comma);
    }

    #[test]
    fn no_candidates_defaults_to_comma() {
        assert_eq!(detect_delimiter_in_line("just one header"), Delimiter::Comma);
        assert_eq!(detect_delimiter_in_line(""), Delimiter::Comma);
    }

    #[test]
    fn highest_count_wins() {
        assert_eq!(detect_delimiter_in_line("a;b;c,d"), Delimiter::Semicolon);
        assert_eq!(detect_delimiter_in_line("a\tb\tc"), Delimiter::Tab);
        assert_eq!(detect_delimiter_in_line("a|b|c;d"), Delimiter::Pipe);
    }

    #[test]
    fn ties_follow_candidate_order() {
        assert_eq!(detect_delimiter_in_line("a;b,c"), Delimiter::Comma);
        assert_eq!(detect_delimiter_in_line("a\tb;c"), Delimiter::Semicolon);
        assert_eq!(detect_delimiter_in_line("a|b\tc"), Delimiter::Tab);
    }

    #[test]
    fn only_the_first_line_counts() {
        let file = create_temp_file(b"a;b;c\n1,2,3,4,5,6\n");
        assert_eq!(detect_delimiter(file.path()).unwrap(), Delimiter::Semicolon);
    }

    #[test]
    fn bom_is_ignored() {
        let file = create_temp_file(b"\xEF\xBB\xBFid|name|city\r\n1|x|y\r\n");
        assert_eq!(detect_delimiter(file.path()).unwrap(), Delimiter::Pipe);
    }

    fn utf16le(text: &str) -> Vec<u8> {
        let mut bytes = UTF16LE_BOM.to_vec();
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn utf16le_first_line_ends_on_a_whole_character() {
        let file = create_temp_file(&utf16le("a;b\r\n1,2,3,4\r\n"));
        assert_eq!(read_first_line(file.path()).unwrap(), "a;b");
        assert_eq!(detect_delimiter(file.path()).unwrap(), Delimiter::Semicolon);
    }

    #[test]
    fn utf16le_newline_byte_inside_a_character_does_not_end_the_line() {
        // U+010A and U+0A01 both carry a 0x0A byte
        let file = create_temp_file(&utf16le("\u{10a}|\u{a01}|c\nx,y,z,w\n"));
        assert_eq!(read_first_line(file.path()).unwrap(), "\u{10a}|\u{a01}|c");
        assert_eq!(detect_delimiter(file.path()).unwrap(), Delimiter::Pipe);
    }

    #[test]
    fn empty_file_defaults_to_comma() {
        let file = create_temp_file(b"");
        assert_eq!(detect_delimiter(file.path()).unwrap(), Delimiter::Comma);
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = detect_delimiter(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
