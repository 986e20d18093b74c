//! PDF text extraction for uploaded resumes.

use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

/// Extracts plain text from `pdf` on a blocking thread.
///
/// Unreadable documents and documents with no text layer are both
/// `AppError::Extraction`.
pub async fn extract_resume_text(pdf: Bytes) -> Result<String, AppError> {
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf))
        .await
        // The extractor can panic on malformed input; treat that as unreadable.
        .map_err(|e| AppError::Extraction(format!("Could not read the uploaded PDF: {e}")))?
        .map_err(|e| AppError::Extraction(format!("Could not read the uploaded PDF: {e}")))?;

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::Extraction(
            "The uploaded PDF does not contain any extractable text.".to_string(),
        ));
    }

    debug!(chars = text.len(), "extracted resume text");
    Ok(text)
}
