// Résumé text extraction. PDF parsing is CPU-bound, so it runs on the blocking pool.

use tracing::{debug, warn};

use crate::errors::AppError;

/// Largest résumé accepted, in bytes.
pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

/// Extracts plain text from an uploaded PDF.
pub async fn extract_text(pdf_bytes: Vec<u8>) -> Result<String, AppError> {
    if pdf_bytes.is_empty() {
        return Err(AppError::Validation("Uploaded résumé is empty".to_string()));
    }
    if pdf_bytes.len() > MAX_RESUME_BYTES {
        return Err(AppError::Validation(format!(
            "Résumé exceeds the {} MB limit",
            MAX_RESUME_BYTES / (1024 * 1024)
        )));
    }

    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf_bytes))
        .await
        .map_err(|e| {
            // pdf-extract panics on some malformed documents
            if e.is_panic() {
                AppError::Validation("Could not read the résumé PDF".to_string())
            } else {
                AppError::Internal(anyhow::anyhow!(
                    "spawn_blocking failed in PDF extraction: {e}"
                ))
            }
        })?
        .map_err(|e| {
            warn!("PDF extraction failed: {e}");
            AppError::Validation(format!("Could not read the résumé PDF: {e}"))
        })?;

    debug!("Extracted {} characters of résumé text", text.len());
    Ok(text)
}
