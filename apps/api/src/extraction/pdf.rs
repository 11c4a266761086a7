use lopdf::Document;
use tracing::{debug, warn};

use super::DecoderError;

/// Returns the document's pages in page order, one line per page, tokens separated by spaces.
///
/// lopdf decodes page by page. When it cannot decode a page's text (unsupported font
/// encodings), the whole document is re-read with pdf-extract, whose output separates
/// pages with form feeds.
pub(super) fn extract_pdf_text(data: &[u8]) -> Result<String, DecoderError> {
    let document = Document::load_mem(data)?;
    let pages = document.get_pages();
    debug!("PDF loaded: {} page(s)", pages.len());

    let mut page_texts = Vec::with_capacity(pages.len());
    for &page_number in pages.keys() {
        match document.extract_text(&[page_number]) {
            Ok(text) => page_texts.push(join_tokens(&text)),
            Err(err) => {
                warn!("lopdf could not decode page {page_number} ({err}); retrying with pdf-extract");
                return extract_with_pdf_extract(data);
            }
        }
    }

    Ok(page_texts.join("\n"))
}

fn extract_with_pdf_extract(data: &[u8]) -> Result<String, DecoderError> {
    let text = pdf_extract::extract_text_from_mem(data)?;
    Ok(join_form_feed_pages(&text))
}

/// One line per form-feed separated page. Blank pages stay as empty lines; only the
/// empty segment after a terminating form feed is dropped.
fn join_form_feed_pages(text: &str) -> String {
    let mut pages: Vec<String> = text.split('\x0C').map(join_tokens).collect();
    if pages.len() > 1 && pages.last().is_some_and(String::is_empty) {
        pages.pop();
    }
    pages.join("\n")
}

fn join_tokens(page: &str) -> String {
    page.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::pdf_with_pages;
    use super::*;

    #[test]
    fn test_one_line_per_page() {
        let pdf = pdf_with_pages(&[&["first page"], &["second", "page"], &["third"]]);
        let text = extract_pdf_text(&pdf).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("first page"));
        assert!(lines[1].contains("second"));
        assert!(lines[2].contains("third"));
    }

    #[test]
    fn test_blank_page_is_kept_in_position() {
        let pdf = pdf_with_pages(&[&["alpha"], &[], &["omega"]]);
        let text = extract_pdf_text(&pdf).unwrap();
        let lines: Vec<_> = text.split('\n').collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "");
    }

    #[test]
    fn test_form_feed_pages_keep_blank_page_in_position() {
        let text = join_form_feed_pages("alpha  one\n\x0C \n\x0Comega\x0C");

        assert_eq!(text, "alpha one\n\nomega");
    }

    #[test]
    fn test_form_feed_pages_without_separator_is_single_line() {
        assert_eq!(join_form_feed_pages("only\n page"), "only page");
        assert_eq!(join_form_feed_pages(""), "");
    }

    #[test]
    fn test_join_tokens_uses_single_spaces() {
        assert_eq!(join_tokens("a \n  b\tc"), "a b c");
    }
}
