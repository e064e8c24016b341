use thiserror::Error;

use crate::models::profile::{CandidateForm, CandidateProfile, ExperienceLevel};

const MAX_EXPERIENCE_YEARS: u32 = 50;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Please fill in all mandatory fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please enter a valid phone number")]
    InvalidPhone,

    #[error("Please enter at least one technology in the tech stack")]
    EmptyTechStack,

    #[error("Years of experience must be between 0 and 50, got {0}")]
    ExperienceOutOfRange(u32),
}

/// Validates the sidebar form and normalizes it into a `CandidateProfile`.
///
/// Checks, in order:
/// - every mandatory field is non-blank (all missing fields reported together)
/// - email contains `@` and `.` (stored lower-cased)
/// - phone is digits once `-`, `+` and spaces are removed
/// - tech stack has at least one non-empty comma-separated entry
/// - experience is within 0–50 years
pub fn validate_candidate(form: &CandidateForm) -> Result<CandidateProfile, ValidationError> {
    let mandatory: [(&str, &'static str); 5] = [
        (form.full_name.as_str(), "Full Name"),
        (form.email.as_str(), "Email"),
        (form.phone.as_str(), "Phone"),
        (form.position.as_str(), "Position Applied For"),
        (form.tech_stack.as_str(), "Tech Stack"),
    ];
    let missing: Vec<&'static str> = mandatory
        .iter()
        .filter(|(value, _)| value.trim().is_empty())
        .map(|(_, name)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    let email = form.email.trim().to_lowercase();
    if !email.contains('@') || !email.contains('.') {
        return Err(ValidationError::InvalidEmail);
    }

    let phone = form.phone.trim().to_string();
    let digits: String = phone
        .chars()
        .filter(|c| !matches!(c, '-' | '+' | ' '))
        .collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidPhone);
    }

    let tech_stack = parse_tech_stack(&form.tech_stack);
    if tech_stack.is_empty() {
        return Err(ValidationError::EmptyTechStack);
    }

    if form.experience > MAX_EXPERIENCE_YEARS {
        return Err(ValidationError::ExperienceOutOfRange(form.experience));
    }

    let location = form
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from);

    Ok(CandidateProfile {
        full_name: form.full_name.trim().to_string(),
        email,
        phone,
        experience_years: form.experience,
        position: form.position.trim().to_string(),
        location,
        tech_stack,
        level: form
            .level
            .unwrap_or_else(|| ExperienceLevel::from_years(form.experience)),
    })
}

/// Splits a comma-separated stack, trimming entries and dropping blanks and
/// case-insensitive duplicates. First spelling wins.
pub fn parse_tech_stack(raw: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.to_lowercase()))
        .map(String::from)
        .collect()
}
