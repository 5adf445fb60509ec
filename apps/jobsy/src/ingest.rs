//! Reads resume and job description documents from disk (plain text or PDF).

use std::path::Path;

use tracing::info;

use crate::errors::AppError;

/// Returns the document's text. `.pdf` files go through text extraction,
/// everything else is read as UTF-8.
pub fn read_document(path: &Path) -> Result<String, AppError> {
    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);

    let text = if is_pdf {
        pdf_extract::extract_text(path)
            .map_err(|e| AppError::Ingest(format!("{}: {e}", path.display())))?
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| AppError::Ingest(format!("{}: {e}", path.display())))?
    };

    let text = normalize(&text);
    if text.is_empty() {
        return Err(AppError::Ingest(format!(
            "{} contains no readable text",
            path.display()
        )));
    }

    info!("Read {} chars from {}", text.len(), path.display());
    Ok(text)
}

/// Trims trailing whitespace per line and collapses runs of blank lines
/// (PDF extraction tends to emit many).
fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.lines().map(str::trim_end) {
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_reads_plain_text() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "Jane Doe  \n\n\n\nProduct Manager\n").unwrap();
        let text = read_document(file.path()).unwrap();
        assert_eq!(text, "Jane Doe\n\nProduct Manager");
    }

    #[test]
    fn test_blank_document_is_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "   \n\n").unwrap();
        assert!(matches!(
            read_document(file.path()),
            Err(AppError::Ingest(_))
        ));
    }

    #[test]
    fn test_missing_file_is_an_ingest_error() {
        let err = read_document(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, AppError::Ingest(_)));
    }
}
