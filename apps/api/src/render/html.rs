//! HTML template renderer for the primary (browser) render path.
//!
//! Templates are compiled into the binary and registered once at startup.
//! Handlebars escapes every interpolated value, so resume text is safe to embed.

use handlebars::Handlebars;
use serde::{Deserialize, Serialize};

use crate::models::{EducationEntry, ResumeData};
use crate::render::RenderError;

const MODERN_TEMPLATE: &str = include_str!("../../templates/modern.hbs");
const CLASSIC_TEMPLATE: &str = include_str!("../../templates/classic.hbs");

const NAME_FALLBACK: &str = "Name unavailable";
const SUMMARY_FALLBACK: &str = "No tailored summary generated.";
const SKILLS_FALLBACK: &str = "Skills available upon request.";
const EXPERIENCE_SUMMARY_FALLBACK: &str = "Summary unavailable.";
const SEPARATOR: &str = " \u{2022} ";

/// Available resume layouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeTemplate {
    /// Card-style sans-serif layout.
    #[default]
    Modern,
    /// Single-column serif layout.
    Classic,
}

impl ResumeTemplate {
    pub fn name(&self) -> &'static str {
        match self {
            ResumeTemplate::Modern => "modern",
            ResumeTemplate::Classic => "classic",
        }
    }

    /// Parses a user-supplied template name; unknown names return `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "modern" => Some(ResumeTemplate::Modern),
            "classic" => Some(ResumeTemplate::Classic),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct ResumeView<'a> {
    name: &'a str,
    contacts: String,
    links: String,
    about: Vec<&'a str>,
    skills: String,
    experiences: Vec<ExperienceView<'a>>,
    education: &'a [EducationEntry],
    languages: String,
}

#[derive(Serialize)]
struct ExperienceView<'a> {
    company: &'a str,
    role: &'a str,
    years: &'a str,
    summary: Vec<&'a str>,
}

/// Splits text into non-empty paragraphs on newlines.
fn paragraphs<'a>(text: &'a str, fallback: &'a str) -> Vec<&'a str> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() {
        vec![fallback]
    } else {
        lines
    }
}

impl<'a> ResumeView<'a> {
    fn from_resume(resume: &'a ResumeData) -> Self {
        let info = &resume.personal_info;
        let name = if info.name.is_empty() {
            NAME_FALLBACK
        } else {
            info.name.as_str()
        };
        let contacts = [&info.email, &info.phone, &info.location]
            .into_iter()
            .filter(|s| !s.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(SEPARATOR);
        let skills = if resume.skills.is_empty() {
            SKILLS_FALLBACK.to_string()
        } else {
            resume.skills.join(SEPARATOR)
        };

        Self {
            name,
            contacts,
            links: info.links.join(SEPARATOR),
            about: paragraphs(&resume.about_me, SUMMARY_FALLBACK),
            skills,
            experiences: resume
                .experiences
                .iter()
                .map(|e| ExperienceView {
                    company: &e.company,
                    role: &e.role,
                    years: &e.years,
                    summary: paragraphs(&e.summary, EXPERIENCE_SUMMARY_FALLBACK),
                })
                .collect(),
            education: &resume.education,
            languages: resume.languages.join(SEPARATOR),
        }
    }
}

/// Registry of compiled resume templates. Built once and shared through `AppState`.
pub struct HtmlRenderer {
    registry: Handlebars<'static>,
}

impl HtmlRenderer {
    pub fn new() -> Result<Self, handlebars::TemplateError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        registry.register_template_string(ResumeTemplate::Modern.name(), MODERN_TEMPLATE)?;
        registry.register_template_string(ResumeTemplate::Classic.name(), CLASSIC_TEMPLATE)?;
        Ok(Self { registry })
    }

    /// Renders `resume` with the chosen template into a complete HTML document.
    pub fn render(&self, resume: &ResumeData, template: ResumeTemplate) -> Result<String, RenderError> {
        let view = ResumeView::from_resume(resume);
        Ok(self.registry.render(template.name(), &view)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExperienceEntry, PersonalInfo};

    fn renderer() -> HtmlRenderer {
        HtmlRenderer::new().unwrap()
    }

    fn entry(company: &str) -> ExperienceEntry {
        ExperienceEntry {
            company: company.to_string(),
            role: "Engineer".to_string(),
            years: "2019-2021".to_string(),
            summary: format!("Work at {company}"),
        }
    }

    #[test]
    fn test_empty_resume_uses_fallback_text() {
        let html = renderer()
            .render(&ResumeData::default(), ResumeTemplate::Modern)
            .unwrap();
        assert!(html.contains(NAME_FALLBACK));
        assert!(html.contains(SUMMARY_FALLBACK));
        assert!(html.contains(SKILLS_FALLBACK));
        assert!(html.contains("No experience entries were generated."));
        assert!(!html.contains("<h2>Education</h2>"));
    }

    #[test]
    fn test_values_are_html_escaped() {
        let resume = ResumeData {
            personal_info: PersonalInfo {
                name: "<script>alert(1)</script>".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let html = renderer().render(&resume, ResumeTemplate::Modern).unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_experience_order_is_preserved_in_both_templates() {
        let resume = ResumeData {
            experiences: vec![entry("B Corp"), entry("A Corp")],
            ..Default::default()
        };
        for template in [ResumeTemplate::Modern, ResumeTemplate::Classic] {
            let html = renderer().render(&resume, template).unwrap();
            let b = html.find("B Corp").unwrap();
            let a = html.find("A Corp").unwrap();
            assert!(b < a, "{template:?}: B Corp must come before A Corp");
        }
    }

    #[test]
    fn test_summary_newlines_become_paragraphs() {
        let mut experience = entry("Acme");
        experience.summary = "First line\n\nSecond line".to_string();
        let resume = ResumeData {
            experiences: vec![experience],
            ..Default::default()
        };
        let html = renderer().render(&resume, ResumeTemplate::Modern).unwrap();
        assert!(html.contains("<p>First line</p><p>Second line</p>"));
    }

    #[test]
    fn test_contacts_skills_and_optional_sections() {
        let resume = ResumeData {
            personal_info: PersonalInfo {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                location: "London".to_string(),
                links: vec!["https://ada.dev".to_string()],
                ..Default::default()
            },
            skills: vec!["Rust".to_string(), "SQL".to_string()],
            languages: vec!["English".to_string()],
            education: vec![EducationEntry {
                institution: "MIT".to_string(),
                degree: "BSc".to_string(),
                years: String::new(),
            }],
            ..Default::default()
        };
        let html = renderer().render(&resume, ResumeTemplate::Classic).unwrap();
        assert!(html.contains("ada@example.com \u{2022} London"));
        assert!(html.contains("Rust \u{2022} SQL"));
        assert!(html.contains("https:&#x2F;&#x2F;ada.dev") || html.contains("https://ada.dev"));
        assert!(html.contains("MIT"));
        assert!(html.contains("English"));
    }

    #[test]
    fn test_template_from_name() {
        assert_eq!(ResumeTemplate::from_name(" Classic "), Some(ResumeTemplate::Classic));
        assert_eq!(ResumeTemplate::from_name("modern"), Some(ResumeTemplate::Modern));
        assert_eq!(ResumeTemplate::from_name("fancy"), None);
    }
}
