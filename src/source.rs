use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::info;

use crate::error::{CatalogError, Result};

/// Where page-ordered catalog text comes from.
#[derive(Debug)]
pub enum SourceDocument {
    /// Rendered through the `pdftotext` tool (poppler), one page after another.
    Pdf(PathBuf),
    /// Text already extracted by some other tool.
    Text(PathBuf),
}

impl SourceDocument {
    pub fn from_path(path: &Path) -> Self {
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if is_pdf {
            SourceDocument::Pdf(path.to_path_buf())
        } else {
            SourceDocument::Text(path.to_path_buf())
        }
    }

    fn path(&self) -> &Path {
        match self {
            SourceDocument::Pdf(p) | SourceDocument::Text(p) => p,
        }
    }

    /// Only checks that the source exists and yields some text.
    pub fn read_text(&self) -> Result<String> {
        let path = self.path();
        let meta = fs::metadata(path).map_err(|e| unavailable(path, e.to_string()))?;
        if meta.len() == 0 {
            return Err(unavailable(path, "file is empty".into()));
        }

        let text = match self {
            SourceDocument::Text(p) => fs::read_to_string(p).map_err(|e| CatalogError::io(p, e))?,
            SourceDocument::Pdf(p) => pdf_to_text(p)?,
        };
        if text.trim().is_empty() {
            return Err(unavailable(path, "no extractable text".into()));
        }
        info!(path = ?path, chars = text.len(), "source text loaded");
        Ok(text.replace("\r\n", "\n").replace('\u{c}', "\n"))
    }
}

fn pdf_to_text(path: &Path) -> Result<String> {
    let output = Command::new("pdftotext")
        .arg("-enc")
        .arg("UTF-8")
        .arg(path)
        .arg("-")
        .output()
        .map_err(|e| unavailable(path, format!("failed to spawn pdftotext: {}", e)))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(unavailable(path, format!("pdftotext failed: {}", stderr.trim())));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn unavailable(path: &Path, reason: String) -> CatalogError {
    CatalogError::SourceUnavailable {
        path: path.to_path_buf(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_extension() {
        assert!(matches!(
            SourceDocument::from_path(Path::new("Catalog.PDF")),
            SourceDocument::Pdf(_)
        ));
        assert!(matches!(
            SourceDocument::from_path(Path::new("catalog.txt")),
            SourceDocument::Text(_)
        ));
    }

    #[test]
    fn missing_and_empty_sources_are_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let missing = SourceDocument::Text(dir.path().join("missing.txt"));
        assert!(matches!(
            missing.read_text(),
            Err(CatalogError::SourceUnavailable { .. })
        ));

        let empty = dir.path().join("empty.txt");
        fs::write(&empty, "").unwrap();
        assert!(matches!(
            SourceDocument::Text(empty).read_text(),
            Err(CatalogError::SourceUnavailable { .. })
        ));

        let blank = dir.path().join("blank.txt");
        fs::write(&blank, "   \n\n").unwrap();
        assert!(matches!(
            SourceDocument::Text(blank).read_text(),
            Err(CatalogError::SourceUnavailable { .. })
        ));
    }

    #[test]
    fn text_source_normalizes_line_endings() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("c.txt");
        fs::write(&p, "ENGLISH 1-2\r\nline two\u{c}page two").unwrap();
        let text = SourceDocument::Text(p).read_text().unwrap();
        assert_eq!(text, "ENGLISH 1-2\nline two\npage two");
    }
}
