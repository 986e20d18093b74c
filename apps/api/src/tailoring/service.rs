//! Tailoring service — builds prompts, calls the chat model and shapes replies.
//!
//! Two flows:
//! - `tailor_text`: free-form about-me and experience text in, strings out.
//! - `tailor_resume`: text extracted from an uploaded PDF in, normalized `ResumeData` out.

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::llm_client::{call_json, ChatMessage, ChatModel, LlmError};
use crate::models::ResumeData;
use crate::tailoring::normalize::{experiences_to_strings, normalize_resume, split_experience_text};
use crate::tailoring::prompts::{
    TAILOR_RESUME_PROMPT, TAILOR_RESUME_SYSTEM, TAILOR_TEXT_GUIDANCE, TAILOR_TEXT_SYSTEM,
};

/// Body of `POST /api/tailor`. Absent, null or non-string fields read as
/// empty and are rejected by `missing_fields`.
#[derive(Debug, Clone, Default)]
pub struct TailorRequest {
    pub job_title: String,
    pub job_description: String,
    pub about_me: String,
    pub experiences: String,
}

fn body_str(body: &Value, key: &str) -> String {
    body.get(key).and_then(Value::as_str).unwrap_or_default().to_string()
}

impl TailorRequest {
    /// Reads the request from an arbitrary JSON body. `experiences` may also be
    /// an array of strings, which is joined with blank lines.
    pub fn from_body(body: &Value) -> Self {
        let experiences = match body.get("experiences") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("\n\n"),
            _ => body_str(body, "experiences"),
        };
        Self {
            job_title: body_str(body, "jobTitle"),
            job_description: body_str(body, "jobDescription"),
            about_me: body_str(body, "aboutMe"),
            experiences,
        }
    }

    pub fn missing_fields(&self) -> bool {
        [
            &self.job_title,
            &self.job_description,
            &self.about_me,
            &self.experiences,
        ]
        .iter()
        .any(|field| field.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TailorResponse {
    pub about_me: String,
    pub experiences: Vec<String>,
    pub cover_letter: String,
}

fn text_messages(req: &TailorRequest) -> Vec<ChatMessage> {
    let user = json!({
        "jobTitle": req.job_title,
        "jobDescription": req.job_description,
        "currentAboutMe": req.about_me,
        "experiences": req.experiences,
        "guidance": TAILOR_TEXT_GUIDANCE,
    });
    vec![
        ChatMessage::system(TAILOR_TEXT_SYSTEM),
        ChatMessage::user(user.to_string()),
    ]
}

/// Shapes a model reply for the text flow. Missing pieces fall back to the
/// request: the original about-me, and the experience text split on blank lines.
pub fn parse_tailor_reply(reply: &Value, req: &TailorRequest) -> TailorResponse {
    let about_me = reply
        .get("aboutMe")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(req.about_me.as_str())
        .to_string();

    let experiences = reply
        .get("experiences")
        .and_then(experiences_to_strings)
        .unwrap_or_else(|| split_experience_text(&req.experiences));

    let cover_letter = reply
        .get("coverLetter")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    TailorResponse {
        about_me,
        experiences,
        cover_letter,
    }
}

pub async fn tailor_text(model: &dyn ChatModel, req: &TailorRequest) -> Result<TailorResponse, LlmError> {
    let reply: Value = call_json(model, &text_messages(req)).await?;
    let response = parse_tailor_reply(&reply, req);
    info!(
        experiences = response.experiences.len(),
        has_cover_letter = !response.cover_letter.is_empty(),
        "text tailoring complete"
    );
    Ok(response)
}

/// Substitutes `{key}` placeholders in one left-to-right pass, so text inserted
/// for one placeholder is never scanned for another.
fn fill_placeholders(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let hit = values.iter().find_map(|(key, value)| {
            tail.strip_prefix(key)
                .and_then(|after| after.strip_prefix('}'))
                .map(|after| (*value, after))
        });
        match hit {
            Some((value, after)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

fn resume_messages(resume_text: &str, job_title: &str, job_description: &str) -> Vec<ChatMessage> {
    let prompt = fill_placeholders(
        TAILOR_RESUME_PROMPT,
        &[
            ("job_title", job_title),
            ("job_description", job_description),
            ("resume_text", resume_text),
        ],
    );
    vec![ChatMessage::system(TAILOR_RESUME_SYSTEM), ChatMessage::user(prompt)]
}

/// Asks the model for a structured resume and normalizes whatever comes back.
pub async fn tailor_resume(
    model: &dyn ChatModel,
    resume_text: &str,
    job_title: &str,
    job_description: &str,
) -> Result<ResumeData, LlmError> {
    let reply: Value = call_json(model, &resume_messages(resume_text, job_title, job_description)).await?;
    debug!(reply = %reply, "raw structured resume reply");
    let resume = normalize_resume(&reply);
    info!(
        experiences = resume.experiences.len(),
        skills = resume.skills.len(),
        "structured resume tailoring complete"
    );
    Ok(resume)
}
