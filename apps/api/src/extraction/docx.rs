use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::DecoderError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Reads the raw text of a DOCX: text runs in document order, one line per paragraph.
pub(super) fn extract_docx_text(data: &[u8]) -> Result<String, DecoderError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;

    let mut xml = String::new();
    archive.by_name(DOCUMENT_PART)?.read_to_string(&mut xml)?;

    document_xml_to_text(&xml)
}

fn document_xml_to_text(xml: &str) -> Result<String, DecoderError> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Empty(e) => {
                if matches!(e.name().as_ref(), b"w:tab" | b"w:br" | b"w:cr") {
                    current.push(' ');
                }
            }
            Event::Text(e) if in_text => current.push_str(&e.xml_content()?),
            Event::GeneralRef(reference) if in_text => {
                if let Some(ch) = reference.resolve_char_ref()? {
                    current.push(ch);
                } else {
                    match &*reference {
                        b"amp" => current.push('&'),
                        b"lt" => current.push('<'),
                        b"gt" => current.push('>'),
                        b"quot" => current.push('"'),
                        b"apos" => current.push('\''),
                        _ => {}
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }

    Ok(paragraphs.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::docx_with_body;
    use super::*;

    #[test]
    fn test_runs_in_a_paragraph_are_concatenated() {
        let docx = docx_with_body(
            r#"<w:p><w:r><w:t>Jane</w:t></w:r><w:r><w:t xml:space="preserve"> Doe</w:t></w:r></w:p><w:p><w:r><w:t>Rust</w:t></w:r></w:p>"#,
        );
        assert_eq!(extract_docx_text(&docx).unwrap(), "Jane Doe\nRust");
    }

    #[test]
    fn test_tabs_and_breaks_become_spaces() {
        let docx = docx_with_body(
            r#"<w:p><w:r><w:t>Skills:</w:t><w:tab/><w:t>Go</w:t><w:br/><w:t>Rust</w:t></w:r></w:p>"#,
        );
        assert_eq!(extract_docx_text(&docx).unwrap(), "Skills: Go Rust");
    }

    #[test]
    fn test_entities_are_resolved() {
        let docx = docx_with_body(r#"<w:p><w:r><w:t>AT&amp;T &#8211; R&amp;D</w:t></w:r></w:p>"#);
        assert_eq!(extract_docx_text(&docx).unwrap(), "AT&T \u{2013} R&D");
    }

    #[test]
    fn test_text_outside_runs_is_ignored() {
        let docx = docx_with_body(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Summary</w:t></w:r></w:p>"#,
        );
        assert_eq!(extract_docx_text(&docx).unwrap(), "Summary");
    }

    #[test]
    fn test_missing_document_part_is_an_error() {
        use std::io::Write;
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/other.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<x/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        assert!(extract_docx_text(&bytes).is_err());
    }
}
