/// PDF files start with this magic; anything else is treated as text.
const PDF_MAGIC: &[u8] = b"%PDF";

/// Converts stored resume bytes to plain text.
/// PDFs go through `pdf-extract`; everything else is decoded as UTF-8 (lossy).
pub fn resume_text_from_bytes(bytes: &[u8]) -> Result<String, String> {
    if is_pdf(bytes) {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| format!("PDF extraction failed: {e}"))
    } else {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}
