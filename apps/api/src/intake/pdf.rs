use tracing::warn;

/// Extracts plain text from PDF bytes. Unreadable documents yield an empty string.
pub fn extract_text_from_pdf(bytes: &[u8]) -> String {
    // pdf-extract panics on some malformed documents
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => text.trim().to_string(),
        Ok(Err(e)) => {
            warn!("Error extracting text from PDF: {e}");
            String::new()
        }
        Err(_) => {
            warn!("PDF extractor panicked on upload");
            String::new()
        }
    }
}
