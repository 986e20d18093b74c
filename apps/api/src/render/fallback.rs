//! Resume Fallback Renderer — appends a plain-text tailored resume to an existing PDF.
//!
//! Degraded-fidelity path used only when the browser render fails. It needs the
//! uploaded document to append to and never builds one from scratch.

use lopdf::Document;
use tracing::debug;

use crate::layout::writer::{DocumentWriter, WriterStyle};
use crate::models::ResumeData;
use crate::render::RenderError;
use crate::tailoring::normalize::experience_header;

pub const SUMMARY_HEADING: &str = "Tailored Summary";
pub const SKILLS_HEADING: &str = "Highlighted Skills";
pub const EXPERIENCE_HEADING: &str = "Optimized Experience";
pub const CONTACT_HEADING: &str = "Contact snapshot";

pub const NO_SUMMARY: &str = "No summary generated.";
pub const NO_SKILLS: &str = "No skills detected.";
pub const NO_EXPERIENCE: &str = "No experience entries detected.";
pub const NO_CONTACT: &str = "No personal info detected.";

const SUMMARY_INDENT: f32 = 12.0;

/// Loads `original`, appends the tailored sections on new pages and returns the
/// re-serialized document. Original pages are left as they were.
pub fn append_tailored_resume_to_pdf(
    original: Option<&[u8]>,
    resume: &ResumeData,
) -> Result<Vec<u8>, RenderError> {
    let original = original
        .filter(|bytes| !bytes.is_empty())
        .ok_or(RenderError::MissingOriginal)?;

    let mut doc = Document::load_mem(original)?;
    let original_pages = doc.get_pages().len();

    let mut writer = DocumentWriter::append_to(&mut doc, WriterStyle::default())?;

    writer.draw_heading(SUMMARY_HEADING)?;
    writer.draw_paragraph(or_fallback(resume.about_me.trim(), NO_SUMMARY))?;

    writer.draw_heading(SKILLS_HEADING)?;
    writer.draw_paragraph(or_fallback(&resume.skills.join(", "), NO_SKILLS))?;

    writer.draw_heading(EXPERIENCE_HEADING)?;
    if resume.experiences.is_empty() {
        writer.draw_paragraph(NO_EXPERIENCE)?;
    }
    for entry in &resume.experiences {
        writer.draw_text_line(&experience_header(entry), true)?;
        if !entry.summary.is_empty() {
            writer.draw_paragraph_indented(&entry.summary, SUMMARY_INDENT)?;
        }
    }

    writer.draw_heading(CONTACT_HEADING)?;
    let contact = resume.personal_info.contact_fields().join(" | ");
    writer.draw_paragraph(or_fallback(&contact, NO_CONTACT))?;

    let pages_added = writer.finish()?;
    debug!(original_pages, pages_added, "appended tailored resume to original PDF");

    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    Ok(out)
}

fn or_fallback<'a>(text: &'a str, fallback: &'a str) -> &'a str {
    if text.is_empty() {
        fallback
    } else {
        text
    }
}
