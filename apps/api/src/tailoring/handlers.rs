use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{Multipart, State},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::ChatModel;
use crate::models::ResumeData;
use crate::render::{RenderJob, RenderTier, ResumeTemplate};
use crate::state::AppState;
use crate::tailoring::extract::extract_resume_text;
use crate::tailoring::service::{tailor_resume, tailor_text, TailorRequest, TailorResponse};

const MISSING_FIELDS: &str = "Missing required fields.";

fn chat_model(state: &AppState) -> Result<Arc<dyn ChatModel>, AppError> {
    state.llm.clone().ok_or(AppError::MissingApiKey)
}

/// POST /api/tailor
///
/// The body is parsed by hand: an empty body reads as `{}`, and a body that is
/// not JSON is an internal error rather than an extractor rejection.
pub async fn handle_tailor(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<TailorResponse>, AppError> {
    let payload: Value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Default::default())
    } else {
        serde_json::from_slice(&body).context("request body is not valid JSON")?
    };
    let req = TailorRequest::from_body(&payload);
    if req.missing_fields() {
        return Err(AppError::Validation(MISSING_FIELDS.to_string()));
    }
    let model = chat_model(&state)?;

    let request_id = Uuid::new_v4();
    let response = tailor_text(model.as_ref(), &req)
        .instrument(info_span!("tailor", %request_id, job_title = %req.job_title))
        .await?;
    Ok(Json(response))
}

/// Fields collected from the `POST /api/tailor-pdf` form.
#[derive(Debug, Default)]
struct TailorPdfForm {
    resume: Option<Bytes>,
    job_title: String,
    job_description: String,
    template: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<TailorPdfForm, AppError> {
    let mut form = TailorPdfForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let invalid = |e: axum::extract::multipart::MultipartError| {
            AppError::Validation(format!("Invalid form field '{name}': {e}"))
        };
        match name.as_str() {
            "resume" => form.resume = Some(field.bytes().await.map_err(invalid)?),
            "jobTitle" => form.job_title = field.text().await.map_err(invalid)?.trim().to_string(),
            "jobDescription" => {
                form.job_description = field.text().await.map_err(invalid)?.trim().to_string()
            }
            "template" => form.template = Some(field.text().await.map_err(invalid)?),
            _ => {}
        }
    }
    Ok(form)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorPdfResponse {
    pub resume: ResumeData,
    pub html: Option<String>,
    pub pdf_base64: String,
    pub render_tier: RenderTier,
    pub generated_at: DateTime<Utc>,
}

/// POST /api/tailor-pdf
pub async fn handle_tailor_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TailorPdfResponse>, AppError> {
    let mut form = read_form(multipart).await?;

    let original = form
        .resume
        .take()
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(|| AppError::Validation("A resume PDF upload is required.".to_string()))?;
    if form.job_title.is_empty() || form.job_description.is_empty() {
        return Err(AppError::Validation(MISSING_FIELDS.to_string()));
    }
    let template = match form.template.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        None => ResumeTemplate::default(),
        Some(name) => ResumeTemplate::from_name(name)
            .ok_or_else(|| AppError::Validation(format!("Unknown template '{name}'.")))?,
    };
    let model = chat_model(&state)?;

    let request_id = Uuid::new_v4();
    let span = info_span!("tailor_pdf", %request_id, template = template.name());

    tailor_uploaded_resume(&state, model.as_ref(), original, &form, template)
        .instrument(span)
        .await
}

async fn tailor_uploaded_resume(
    state: &AppState,
    model: &dyn ChatModel,
    original: Bytes,
    form: &TailorPdfForm,
    template: ResumeTemplate,
) -> Result<Json<TailorPdfResponse>, AppError> {
    info!(upload_kb = original.len() / 1024, "tailoring uploaded resume");
    let resume_text = extract_resume_text(original.clone()).await?;
    let resume = tailor_resume(model, &resume_text, &form.job_title, &form.job_description).await?;

    let html = match state.templates.render(&resume, template) {
        Ok(html) => Some(html),
        Err(e) => {
            warn!(error = %e, "HTML template render failed");
            None
        }
    };

    let job = RenderJob {
        html,
        resume,
        original: Some(original),
    };
    let outcome = state
        .render_pipeline
        .run(&job)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("every render tier failed: {e}")))?;

    info!(tier = ?outcome.tier, "tailored resume ready");
    Ok(Json(TailorPdfResponse {
        resume: job.resume,
        html: job.html,
        pdf_base64: STANDARD.encode(&outcome.pdf),
        render_tier: outcome.tier,
        generated_at: Utc::now(),
    }))
}
