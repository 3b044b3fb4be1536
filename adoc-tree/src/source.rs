//! Reading documents from disk.

use std::path::Path;

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};

use crate::{Error, Options, model::Tree};

/// BOM (Byte Order Mark) patterns for encoding detection
const BOM_PATTERNS: &[(&[u8], &Encoding, usize, &str)] = &[
    (&[0xEF, 0xBB, 0xBF], UTF_8, 3, "UTF-8"),
    (&[0xFF, 0xFE], UTF_16LE, 2, "UTF-16 LE"),
    (&[0xFE, 0xFF], UTF_16BE, 2, "UTF-16 BE"),
];

/// Decode the bytes of a document.
///
/// An explicit encoding label wins. Otherwise a byte-order mark selects UTF-8,
/// UTF-16 LE or UTF-16 BE and is stripped; without one the bytes must be UTF-8.
///
/// # Errors
///
/// Returns [`Error::UnknownEncoding`] for a label `encoding_rs` does not know, and
/// [`Error::UnrecognizedEncodingInFile`] for bytes that are not UTF-8 and carry no
/// byte-order mark.
pub fn decode(bytes: &[u8], encoding: Option<&str>, name: &str) -> Result<String, Error> {
    if let Some(label) = encoding {
        let encoding = Encoding::for_label(label.as_bytes())
            .ok_or_else(|| Error::UnknownEncoding(label.to_string()))?;
        let (text, _, had_errors) = encoding.decode(bytes);
        if had_errors {
            tracing::warn!(name, encoding = %label, "decoding encountered errors");
        }
        return Ok(text.into_owned());
    }

    for (bom, encoding, skip, encoding_name) in BOM_PATTERNS {
        if bytes.starts_with(bom)
            && let Some(content) = bytes.get(*skip..)
        {
            let (text, had_errors) = encoding.decode_without_bom_handling(content);
            if had_errors {
                tracing::warn!(name, encoding = encoding_name, "decoding encountered errors");
            }
            return Ok(text.into_owned());
        }
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_string()),
        Err(_) => Err(Error::UnrecognizedEncodingInFile(name.to_string())),
    }
}

/// Read, decode and parse the file at `path`.
///
/// # Errors
///
/// Fails only when the file cannot be read or decoded. Parsing itself never fails.
#[tracing::instrument(skip(options), fields(path = %path.as_ref().display()))]
pub fn parse_file<P: AsRef<Path>>(path: P, options: &Options) -> Result<Tree, Error> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| Error::File {
        path: path.to_path_buf(),
        source,
    })?;
    let text = decode(&bytes, options.encoding.as_deref(), &path.display().to_string())?;
    Ok(Tree::parse(text, options.clone()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::utf8_bom(&[0xEF, 0xBB, 0xBF, b'h', b'i'], "hi")]
    #[case::utf16le_bom(&[0xFF, 0xFE, b'h', 0, b'i', 0], "hi")]
    #[case::utf16be_bom(&[0xFE, 0xFF, 0, b'h', 0, b'i'], "hi")]
    #[case::plain_utf8("é\n".as_bytes(), "é\n")]
    fn decodes_by_bom(#[case] bytes: &[u8], #[case] expected: &str) -> Result<(), Error> {
        assert_eq!(decode(bytes, None, "test")?, expected);
        Ok(())
    }

    #[test]
    fn explicit_encoding_wins() -> Result<(), Error> {
        assert_eq!(decode(&[0xE9], Some("windows-1252"), "test")?, "é");
        Ok(())
    }

    #[test]
    fn rejects_unknown_label_and_invalid_bytes() {
        assert!(matches!(
            decode(b"x", Some("no-such-encoding"), "test"),
            Err(Error::UnknownEncoding(_))
        ));
        assert!(matches!(
            decode(&[0xFF, 0x00, 0xC3], None, "test"),
            Err(Error::UnrecognizedEncodingInFile(_))
        ));
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(matches!(
            parse_file("does/not/exist.adoc", &Options::default()),
            Err(Error::File { .. })
        ));
    }

    #[test]
    fn parses_fixture_file() -> Result<(), Error> {
        let tree = parse_file("fixtures/sections.adoc", &Options::default())?;
        assert!(tree.source().starts_with("= Document"));
        assert!(tree.warnings().is_empty());
        Ok(())
    }
}
