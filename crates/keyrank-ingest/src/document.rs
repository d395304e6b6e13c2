//! Document reading: title on the first line, body on the rest.
//!
//! Every line is decoded on its own, so a file mixing UTF-8 and a legacy
//! encoding (GBK is common) still comes through.

use std::path::Path;

use chardetng::EncodingDetector;
use keyrank_core::{Error, Result};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

/// A document split into its title and body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    /// Non-empty body lines joined with `\n`.
    pub body: String,
}

impl Document {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Decode raw file bytes line by line.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut lines = bytes.split(|&b| b == b'\n');
        let title = lines.next().and_then(decode_line).unwrap_or_default();

        let body: Vec<String> = lines
            .filter_map(decode_line)
            .filter(|line| !line.is_empty())
            .collect();

        Self {
            title,
            body: body.join("\n"),
        }
    }

    /// Title and body as one text.
    pub fn full_text(&self) -> String {
        format!("{}\n{}", self.title, self.body)
    }

    /// SHA-256 of the decoded text, used to tie stage artifacts to a document version.
    pub fn content_hash(&self) -> String {
        content_hash(&self.full_text())
    }
}

/// Read a document from disk. A missing or unreadable file is an error.
pub fn read_document(path: &Path) -> Result<Document> {
    let bytes = std::fs::read(path)
        .map_err(|e| Error::Document(format!("{}: {}", path.display(), e)))?;
    let doc = Document::from_bytes(&bytes);
    debug!(
        "Read {}: title {} chars, body {} chars",
        path.display(),
        doc.title.chars().count(),
        doc.body.chars().count()
    );
    Ok(doc)
}

/// Compute SHA-256 content hash.
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Decode one line, trimming surrounding whitespace and a leading BOM.
/// Returns `None` when the detected encoding cannot decode it cleanly.
fn decode_line(raw: &[u8]) -> Option<String> {
    let raw = trim_ascii(raw);
    if raw.is_empty() {
        return Some(String::new());
    }

    if let Ok(text) = std::str::from_utf8(raw) {
        return Some(clean(text));
    }

    let mut detector = EncodingDetector::new();
    detector.feed(raw, true);
    let encoding = detector.guess(None, true);
    let (text, _, had_errors) = encoding.decode(raw);
    if had_errors {
        warn!("Dropping undecodable line ({} bytes, guessed {})", raw.len(), encoding.name());
        return None;
    }
    Some(clean(&text))
}

fn clean(text: &str) -> String {
    text.trim_start_matches('\u{feff}').trim().to_string()
}

fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_title_and_body() {
        let doc = Document::from_bytes("标题\r\n第一行。\n\n  第二行。  \n".as_bytes());
        assert_eq!(doc.title, "标题");
        assert_eq!(doc.body, "第一行。\n第二行。");
    }

    #[test]
    fn test_mixed_encodings() {
        let (gbk, _, _) = encoding_rs::GBK.encode("中文信息处理技术的发展非常迅速，我们在这个领域开展了大量的研究工作");
        let mut bytes = "UTF-8 标题\n".as_bytes().to_vec();
        bytes.extend_from_slice(&gbk);
        bytes.push(b'\n');

        let doc = Document::from_bytes(&bytes);
        assert_eq!(doc.title, "UTF-8 标题");
        assert_eq!(doc.body, "中文信息处理技术的发展非常迅速，我们在这个领域开展了大量的研究工作");
    }

    #[test]
    fn test_bom_is_stripped() {
        let doc = Document::from_bytes("\u{feff}标题\n正文".as_bytes());
        assert_eq!(doc.title, "标题");
    }

    #[test]
    fn test_empty_input() {
        let doc = Document::from_bytes(b"");
        assert_eq!(doc, Document::default());
    }

    #[test]
    fn test_read_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "神经网络").unwrap();
        writeln!(file, "神经网络是一种模型。").unwrap();

        let doc = read_document(file.path()).unwrap();
        assert_eq!(doc.title, "神经网络");
        assert_eq!(doc.full_text(), "神经网络\n神经网络是一种模型。");
        assert_eq!(doc.content_hash().len(), 64);
    }

    #[test]
    fn test_missing_document_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_document(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, Error::Document(_)));
    }
}
