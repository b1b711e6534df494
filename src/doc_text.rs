//! Document text extraction
//!
//! Single capability boundary between filing mining and document formats:
//! `extract_text` accepts raw bytes plus a content type and returns
//! whatever text it can. PDFs are extracted page by page up to a bounded
//! page count; anything else, and any PDF that fails to parse, is treated
//! as text directly. Scanned or garbled documents therefore degrade to
//! unmatchable noise rather than errors.

use tracing::debug;

/// Extract text from a fetched document body.
pub fn extract_text(bytes: &[u8], content_type: &str, max_pdf_pages: usize) -> String {
    let looks_like_pdf =
        content_type.to_lowercase().contains("pdf") || bytes.starts_with(b"%PDF");

    if looks_like_pdf {
        match pdf_text(bytes, max_pdf_pages) {
            Ok(text) => return text,
            Err(e) => {
                debug!("pdf extraction failed ({}), falling back to raw text", e);
            }
        }
    }

    String::from_utf8_lossy(bytes).into_owned()
}

/// Page-by-page PDF text extraction, bounded to `max_pages`.
fn pdf_text(bytes: &[u8], max_pages: usize) -> anyhow::Result<String> {
    let document = lopdf::Document::load_mem(bytes)?;

    let mut text = String::new();
    for (page_num, _) in document.get_pages().into_iter().take(max_pages) {
        match document.extract_text(&[page_num]) {
            Ok(page_text) => {
                text.push_str(&page_text);
                text.push('\n');
            }
            Err(e) => {
                // One unreadable page does not spoil the others
                debug!("failed to extract text from page {}: {}", page_num, e);
            }
        }
    }

    Ok(text)
}
