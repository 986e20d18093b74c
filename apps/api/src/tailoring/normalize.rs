//! Normalization Layer — coerces arbitrary LLM JSON into `ResumeData`.
//!
//! Nothing here fails: wrong types and empty strings become defaults, and
//! missing experience fields become placeholder text. The permissive handling
//! can hide a malformed model reply; callers that care should log the raw value.

use serde_json::Value;

use crate::models::{EducationEntry, ExperienceEntry, PersonalInfo, ResumeData};

pub const COMPANY_PLACEHOLDER: &str = "Company not specified";
pub const ROLE_PLACEHOLDER: &str = "Role not specified";
pub const YEARS_PLACEHOLDER: &str = "Years not specified";

/// Trimmed, non-empty string at `key`, or `None`.
fn clean_str(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Array of trimmed, non-empty strings; anything else is dropped.
fn clean_str_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Normalizes a raw `experiences` value. Non-arrays yield an empty list.
pub fn normalize_experiences(raw: &Value) -> Vec<ExperienceEntry> {
    raw.as_array()
        .map(|items| items.iter().map(normalize_experience).collect())
        .unwrap_or_default()
}

fn normalize_experience(item: &Value) -> ExperienceEntry {
    ExperienceEntry {
        company: clean_str(item, "company").unwrap_or_else(|| COMPANY_PLACEHOLDER.to_string()),
        role: clean_str(item, "role").unwrap_or_else(|| ROLE_PLACEHOLDER.to_string()),
        years: clean_str(item, "years").unwrap_or_else(|| YEARS_PLACEHOLDER.to_string()),
        summary: clean_str(item, "summary")
            .or_else(|| clean_str(item, "details"))
            .unwrap_or_default(),
    }
}

/// `"{company} — {role} ({years})"`.
pub fn experience_header(entry: &ExperienceEntry) -> String {
    format!("{} \u{2014} {} ({})", entry.company, entry.role, entry.years)
}

/// Plain-text rendering: the header, then the summary on the next line if present.
pub fn format_experience(entry: &ExperienceEntry) -> String {
    let header = experience_header(entry);
    if entry.summary.is_empty() {
        header
    } else {
        format!("{header}\n{}", entry.summary)
    }
}

fn normalize_personal_info(raw: Option<&Value>) -> PersonalInfo {
    let Some(raw) = raw.filter(|v| v.is_object()) else {
        return PersonalInfo::default();
    };
    PersonalInfo {
        name: clean_str(raw, "name").unwrap_or_default(),
        email: clean_str(raw, "email").unwrap_or_default(),
        phone: clean_str(raw, "phone").unwrap_or_default(),
        location: clean_str(raw, "location").unwrap_or_default(),
        links: clean_str_list(raw.get("links")),
    }
}

fn normalize_education(raw: Option<&Value>) -> Vec<EducationEntry> {
    raw.and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| EducationEntry {
                    institution: clean_str(item, "institution")
                        .or_else(|| clean_str(item, "school"))
                        .unwrap_or_default(),
                    degree: clean_str(item, "degree").unwrap_or_default(),
                    years: clean_str(item, "years").unwrap_or_default(),
                })
                .filter(|e| !(e.institution.is_empty() && e.degree.is_empty()))
                .collect()
        })
        .unwrap_or_default()
}

/// Normalizes a full structured-resume reply. Non-objects yield an empty resume.
pub fn normalize_resume(raw: &Value) -> ResumeData {
    ResumeData {
        personal_info: normalize_personal_info(raw.get("personalInfo")),
        about_me: clean_str(raw, "aboutMe").unwrap_or_default(),
        skills: clean_str_list(raw.get("skills")),
        education: normalize_education(raw.get("education")),
        languages: clean_str_list(raw.get("languages")),
        experiences: raw
            .get("experiences")
            .map(normalize_experiences)
            .unwrap_or_default(),
        cover_letter: clean_str(raw, "coverLetter").unwrap_or_default(),
    }
}

/// Splits free-form experience text into items on runs of two or more `\n`.
/// Lines holding only spaces do not separate items.
pub fn split_experience_text(text: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut rest = text;
    while let Some(at) = rest.find("\n\n") {
        items.push(&rest[..at]);
        rest = rest[at..].trim_start_matches('\n');
    }
    items.push(rest);
    items
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Converts a model-returned `experiences` array into display strings.
///
/// Strings pass through trimmed; objects are normalized and formatted.
/// Returns `None` when the value is not an array.
pub fn experiences_to_strings(raw: &Value) -> Option<Vec<String>> {
    let items = raw.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
                Value::Object(_) => Some(format_experience(&normalize_experience(item))),
                _ => None,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_and_null_yield_empty_sequence() {
        assert!(normalize_experiences(&json!([])).is_empty());
        assert!(normalize_experiences(&Value::Null).is_empty());
        assert!(normalize_experiences(&json!({"company": "Acme"})).is_empty());
        assert!(normalize_experiences(&json!("Acme")).is_empty());
    }

    #[test]
    fn test_empty_role_gets_placeholder() {
        let raw = json!([{
            "company": "Acme",
            "role": "",
            "years": "2020-2022",
            "summary": "Did things"
        }]);
        assert_eq!(
            normalize_experiences(&raw),
            vec![ExperienceEntry {
                company: "Acme".to_string(),
                role: "Role not specified".to_string(),
                years: "2020-2022".to_string(),
                summary: "Did things".to_string(),
            }]
        );
    }

    #[test]
    fn test_fields_are_trimmed_and_non_strings_replaced() {
        let raw = json!([{ "company": "  Acme  ", "role": 42, "years": null }]);
        let entry = &normalize_experiences(&raw)[0];
        assert_eq!(entry.company, "Acme");
        assert_eq!(entry.role, ROLE_PLACEHOLDER);
        assert_eq!(entry.years, YEARS_PLACEHOLDER);
        assert_eq!(entry.summary, "", "summary never gets a placeholder");
    }

    #[test]
    fn test_summary_falls_back_to_details() {
        let raw = json!([{ "company": "Acme", "details": "  Shipped v2  " }]);
        assert_eq!(normalize_experiences(&raw)[0].summary, "Shipped v2");
    }

    #[test]
    fn test_non_object_elements_become_placeholder_entries() {
        let entries = normalize_experiences(&json!(["just text"]));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].company, COMPANY_PLACEHOLDER);
    }

    #[test]
    fn test_order_is_preserved() {
        let raw = json!([{ "company": "B Corp" }, { "company": "A Corp" }]);
        let companies: Vec<_> = normalize_experiences(&raw)
            .into_iter()
            .map(|e| e.company)
            .collect();
        assert_eq!(companies, vec!["B Corp", "A Corp"]);
    }

    #[test]
    fn test_format_experience_with_and_without_summary() {
        let mut entry = ExperienceEntry {
            company: "Acme".to_string(),
            role: "Engineer".to_string(),
            years: "2021".to_string(),
            summary: "Built things".to_string(),
        };
        assert_eq!(
            format_experience(&entry),
            "Acme \u{2014} Engineer (2021)\nBuilt things"
        );
        entry.summary.clear();
        assert_eq!(format_experience(&entry), "Acme \u{2014} Engineer (2021)");
    }

    #[test]
    fn test_normalize_resume_fills_defaults() {
        let resume = normalize_resume(&json!({
            "personalInfo": { "name": " Ada ", "links": ["https://ada.dev", "", 3] },
            "skills": ["Rust", " ", "SQL", null],
            "education": [{ "school": "MIT", "degree": "BSc" }, {}],
            "languages": "English",
            "aboutMe": "  Systems engineer  "
        }));
        assert_eq!(resume.personal_info.name, "Ada");
        assert_eq!(resume.personal_info.email, "");
        assert_eq!(resume.personal_info.links, vec!["https://ada.dev"]);
        assert_eq!(resume.skills, vec!["Rust", "SQL"]);
        assert_eq!(resume.education.len(), 1);
        assert_eq!(resume.education[0].institution, "MIT");
        assert!(resume.languages.is_empty());
        assert_eq!(resume.about_me, "Systems engineer");
        assert!(resume.experiences.is_empty());
        assert_eq!(resume.cover_letter, "");
    }

    #[test]
    fn test_normalize_resume_non_object_is_empty() {
        assert_eq!(normalize_resume(&json!([1, 2])), ResumeData::default());
    }

    #[test]
    fn test_split_experience_text_on_blank_lines() {
        let text = "Acme, 2020\nBuilt APIs\n\n\n  Globex, 2018  \n\n";
        assert_eq!(
            split_experience_text(text),
            vec!["Acme, 2020\nBuilt APIs".to_string(), "Globex, 2018".to_string()]
        );
        assert!(split_experience_text("   ").is_empty());
        assert!(split_experience_text("\n\n\n").is_empty());
    }

    #[test]
    fn test_split_experience_text_needs_consecutive_newlines() {
        assert_eq!(split_experience_text("Acme\n \nGlobex"), vec!["Acme\n \nGlobex"]);
        assert_eq!(split_experience_text("Acme\r\n\r\nGlobex"), vec!["Acme\r\n\r\nGlobex"]);
    }

    #[test]
    fn test_experiences_to_strings_mixed_items() {
        let raw = json!(["  First  ", { "company": "Acme", "role": "Dev", "years": "2020" }, 7, ""]);
        assert_eq!(
            experiences_to_strings(&raw),
            Some(vec![
                "First".to_string(),
                "Acme \u{2014} Dev (2020)".to_string()
            ])
        );
        assert_eq!(experiences_to_strings(&json!("nope")), None);
    }
}
