//! Document text extraction. Never fails: an unreadable document yields empty text,
//! which the segmenter turns into an empty section map.

use bytes::Bytes;
use tracing::{info, warn};

/// Extracts plain text from an uploaded PDF held in memory.
///
/// Runs the extractor on a blocking thread. Extraction errors and extractor
/// panics are logged and produce an empty string.
pub async fn extract_text(data: Bytes) -> String {
    if data.is_empty() {
        warn!("Uploaded document is empty");
        return String::new();
    }

    let size = data.len();
    let result = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data)).await;

    match result {
        Ok(Ok(text)) => {
            let text = normalize_page_breaks(&text);
            info!(bytes = size, chars = text.len(), "PDF text extraction complete");
            text
        }
        Ok(Err(e)) => {
            warn!(bytes = size, "PDF text extraction failed: {e}");
            String::new()
        }
        Err(e) => {
            warn!(bytes = size, "PDF text extraction task aborted: {e}");
            String::new()
        }
    }
}

/// Page boundaries come out as form feeds; treat them as line breaks.
fn normalize_page_breaks(text: &str) -> String {
    text.replace('\u{c}', "\n")
}

/// Builds a one-page PDF with each entry of `lines` drawn on its own line in
/// Helvetica.
#[cfg(test)]
pub(crate) fn text_pdf(lines: &[&str]) -> Vec<u8> {
    let mut content = String::from("BT /F1 12 Tf 72 720 Td");
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            content.push_str(" 0 -20 Td");
        }
        let escaped = line
            .replace('\\', "\\\\")
            .replace('(', "\\(")
            .replace(')', "\\)");
        content.push_str(&format!(" ({escaped}) Tj"));
    }
    content.push_str(" ET");

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
         /Resources << /Font << /F1 5 0 R >> >> >>"
            .to_string(),
        format!(
            "<< /Length {} >>\nstream\n{content}\nendstream",
            content.len()
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    ];

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{body}\nendobj\n", i + 1));
    }

    let xref = pdf.len();
    pdf.push_str(&format!(
        "xref\n0 {}\n0000000000 65535 f \n",
        objects.len() + 1
    ));
    for offset in offsets {
        pdf.push_str(&format!("{offset:010} 00000 n \n"));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n",
        objects.len() + 1
    ));
    pdf.into_bytes()
}
