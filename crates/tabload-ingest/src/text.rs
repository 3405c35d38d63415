//! Byte-to-text decoding for source files.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

/// Decoded file contents.
#[derive(Debug, Clone)]
pub struct DecodedText<'a> {
    pub text: Cow<'a, str>,
    /// Encoding actually used.
    pub encoding: &'static Encoding,
    /// Some bytes could not be decoded and were replaced.
    pub had_errors: bool,
}

/// Decodes `bytes`, removing any byte-order mark.
///
/// A UTF-8 or UTF-16 BOM selects that encoding. Without a BOM the bytes must
/// be valid UTF-8; otherwise they are read as Windows-1252, which is what
/// spreadsheet exports without a BOM usually are.
pub fn decode_text(bytes: &[u8]) -> DecodedText<'_> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return DecodedText {
            text: strip_bom(text),
            encoding,
            had_errors,
        };
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => DecodedText {
            text: Cow::Borrowed(text),
            encoding: UTF_8,
            had_errors: false,
        },
        Err(_) => {
            let (text, had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
            DecodedText {
                text,
                encoding: WINDOWS_1252,
                    had_errors,
            }
        }
    }
}

// A second BOM after the first one shows up in files that were re-saved.
fn strip_bom(text: Cow<'_, str>) -> Cow<'_, str> {
    match text {
        Cow::Borrowed(s) => Cow::Borrowed(s.strip_prefix('\u{feff}').unwrap_or(s)),
        Cow::Owned(s) => match s.strip_prefix('\u{feff}') {
            Some(rest) => Cow::Owned(rest.to_string()),
            None => Cow::Owned(s),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_utf8_is_borrowed() {
        let decoded = decode_text(b"a,b\n1,2\n");
        assert!(matches!(decoded.text, Cow::Borrowed(_)));
        assert_eq!(decoded.encoding, UTF_8);
    }

    #[test]
    fn utf8_bom_is_removed() {
        let decoded = decode_text(b"\xEF\xBB\xBFname;age\n");
        assert_eq!(decoded.text, "name;age\n");
        assert_eq!(decoded.encoding, UTF_8);
    }

    #[test]
    fn utf16le_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "x|y".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let decoded = decode_text(&bytes);
        assert_eq!(decoded.text, "x|y");
        assert_eq!(decoded.encoding.name(), "UTF-16LE");
    }

    #[test]
    fn invalid_utf8_falls_back_to_windows_1252() {
        // "café" in Windows-1252
        let decoded = decode_text(b"caf\xE9,x\n");
        assert_eq!(decoded.text, "café,x\n");
        assert_eq!(decoded.encoding, WINDOWS_1252);
    }
}
