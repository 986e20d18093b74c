use serde::{Deserialize, Serialize};

/// Contact block of a resume. Every field is optional upstream and defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub links: Vec<String>,
}

impl PersonalInfo {
    /// Non-empty contact fields in display order: name, email, phone, location.
    pub fn contact_fields(&self) -> Vec<&str> {
        [&self.name, &self.email, &self.phone, &self.location]
            .into_iter()
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// A single experience entry after normalization.
///
/// `company`, `role` and `years` are never empty (placeholders fill the gaps);
/// `summary` may be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub company: String,
    pub role: String,
    pub years: String,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub years: String,
}

/// Normalized resume produced from LLM output.
///
/// `experiences` keeps the order the model returned (most relevant first);
/// every renderer must preserve it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeData {
    pub personal_info: PersonalInfo,
    pub about_me: String,
    pub skills: Vec<String>,
    pub education: Vec<EducationEntry>,
    pub languages: Vec<String>,
    pub experiences: Vec<ExperienceEntry>,
    pub cover_letter: String,
}
