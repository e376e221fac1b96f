//! Resume upload checks and text extraction.

use bytes::Bytes;
use tracing::{debug, warn};

use crate::errors::AppError;

/// Largest accepted resume upload.
pub const MAX_RESUME_BYTES: usize = 2 * 1024 * 1024;
/// Extracted PDF text beyond this many characters is not sent to the screener.
pub const MAX_EXTRACTED_CHARS: usize = 6000;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Accepts only PDFs under the size cap. Both the declared type and the file header must agree.
pub fn validate_pdf(content_type: Option<&str>, data: &[u8]) -> Result<(), AppError> {
    if data.len() > MAX_RESUME_BYTES {
        return Err(AppError::PayloadTooLarge(
            "File is too large. Please upload a PDF under 2MB.".to_string(),
        ));
    }
    let declared_pdf = content_type
        .map(|ct| {
            ct.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .eq_ignore_ascii_case("application/pdf")
        })
        .unwrap_or(false);
    if !declared_pdf || !data.starts_with(PDF_MAGIC) {
        return Err(AppError::Validation("Please upload a PDF file.".to_string()));
    }
    Ok(())
}

/// Pulls plain text out of a PDF on the blocking pool.
///
/// Returns `None` if the PDF has no extractable text or the extractor fails;
/// an unreadable resume still makes a valid application.
pub async fn extract_text(pdf: Bytes) -> Option<String> {
    let result = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf)).await;
    match result {
        Ok(Ok(text)) => {
            let text = collapse_whitespace(&text);
            debug!("Extracted {} characters of resume text", text.len());
            (!text.is_empty()).then_some(text)
        }
        Ok(Err(e)) => {
            warn!("Resume text extraction failed: {e}");
            None
        }
        Err(e) => {
            warn!("Resume text extraction aborted: {e}");
            None
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text handed to the screener: the skills line as entered, then any extracted resume text.
pub fn build_resume_text(skills_input: &str, extracted: Option<&str>) -> String {
    let mut text = format!("Skills: {}", skills_input.trim());
    if let Some(extracted) = extracted.filter(|t| !t.is_empty()) {
        text.push_str("\n\nResume:\n");
        text.extend(extracted.chars().take(MAX_EXTRACTED_CHARS));
    }
    text
}

/// Strips characters that cannot appear inside a quoted `Content-Disposition` filename.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .filter(|c| c.is_ascii())
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "resume.pdf".to_string()
    } else {
        cleaned.to_string()
    }
}
