//! Text extractor: converts an uploaded PDF or DOCX binary into one normalized string.
//!
//! Pure transform: no I/O beyond the bytes handed in. Callers on the async path
//! run it through `tokio::task::spawn_blocking` because decoding is CPU-bound.

mod docx;
mod normalize;
mod pdf;

use std::fmt;

use thiserror::Error;

pub use normalize::normalize_whitespace;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Underlying decoder error (lopdf, pdf-extract, zip, quick-xml), kept as the source.
pub type DecoderError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported format '{0}': upload a PDF or DOCX file")]
    UnsupportedFormat(String),

    #[error("Failed to extract text from {format} document: {source}")]
    ExtractionFailed {
        format: DocumentFormat,
        #[source]
        source: DecoderError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Resolves a MIME type to a supported format. Parameters (`; charset=...`) are ignored.
    pub fn from_mime(mime_type: &str) -> Result<Self, ExtractError> {
        let essence = mime_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            PDF_MIME => Ok(DocumentFormat::Pdf),
            DOCX_MIME => Ok(DocumentFormat::Docx),
            _ => Err(ExtractError::UnsupportedFormat(mime_type.to_string())),
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => PDF_MIME,
            DocumentFormat::Docx => DOCX_MIME,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Pdf => f.write_str("PDF"),
            DocumentFormat::Docx => f.write_str("DOCX"),
        }
    }
}

/// Extracts normalized text from `document`.
///
/// - PDF: pages in order, tokens joined by spaces, pages joined by newlines.
/// - DOCX: raw text of `word/document.xml`.
///
/// Either way the result has all whitespace runs collapsed to one space and is trimmed.
/// A PDF with zero pages yields an empty string.
pub fn extract_text(document: &[u8], mime_type: &str) -> Result<String, ExtractError> {
    let format = DocumentFormat::from_mime(mime_type)?;

    let raw = match format {
        DocumentFormat::Pdf => pdf::extract_pdf_text(document),
        DocumentFormat::Docx => docx::extract_docx_text(document),
    }
    .map_err(|source| ExtractError::ExtractionFailed { format, source })?;

    Ok(normalize_whitespace(&raw))
}

/// In-test document builders shared by the extraction, ingestion and router tests.
#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::{Cursor, Write};

    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Builds a PDF with one page per entry; each page shows its lines with `Tj`.
    pub fn pdf_with_pages(pages: &[&[&str]]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for lines in pages {
            // One text object per line so each line ends its own text run.
            let mut operations = Vec::new();
            for (i, line) in lines.iter().enumerate() {
                let y = 720 - 14 * i as i64;
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
                operations.push(Operation::new("Td", vec![72.into(), y.into()]));
                operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
                operations.push(Operation::new("ET", vec![]));
            }

            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().expect("encode page content"),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).expect("serialize pdf");
        buf
    }

    /// Builds a minimal DOCX container whose body holds one paragraph per entry.
    pub fn docx_with_paragraphs(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!(r#"<w:p><w:r><w:t xml:space="preserve">{p}</w:t></w:r></w:p>"#))
            .collect();
        docx_with_body(&body)
    }

    /// Builds a DOCX whose `<w:body>` is `body` verbatim.
    pub fn docx_with_body(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();
        writer
            .start_file("[Content_Types].xml", options)
            .expect("start content types");
        writer
            .write_all(br#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#)
            .expect("write content types");
        writer
            .start_file("word/document.xml", options)
            .expect("start document.xml");
        writer
            .write_all(xml.as_bytes())
            .expect("write document.xml");
        writer.finish().expect("finish docx").into_inner()
    }
}
