use std::fmt;

use serde::{Deserialize, Serialize};

/// Seniority the interview is pitched at. Drives question count and difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExperienceLevel {
    Junior,
    #[serde(alias = "mid")]
    MidLevel,
    Senior,
}

impl ExperienceLevel {
    /// <2 years junior, <5 years mid-level, otherwise senior.
    pub fn from_years(years: u32) -> Self {
        match years {
            0..=1 => ExperienceLevel::Junior,
            2..=4 => ExperienceLevel::MidLevel,
            _ => ExperienceLevel::Senior,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Junior => "junior",
            ExperienceLevel::MidLevel => "mid-level",
            ExperienceLevel::Senior => "senior",
        }
    }

    pub fn question_count(&self) -> usize {
        match self {
            ExperienceLevel::Junior => 3,
            ExperienceLevel::MidLevel => 4,
            ExperienceLevel::Senior => 5,
        }
    }

    pub fn complexity(&self) -> &'static str {
        match self {
            ExperienceLevel::Junior => "basic to intermediate",
            ExperienceLevel::MidLevel => "intermediate to advanced",
            ExperienceLevel::Senior => "advanced to expert",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw sidebar form as submitted by the browser. Validated into a `CandidateProfile`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub experience: u32,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub location: Option<String>,
    /// Comma-separated, e.g. "Python, SQL, React".
    #[serde(default)]
    pub tech_stack: String,
    /// Overrides the level derived from `experience` when present.
    #[serde(default)]
    pub level: Option<ExperienceLevel>,
}

/// Validated candidate details. Never changes once the interview has started.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateProfile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub experience_years: u32,
    pub position: String,
    pub location: Option<String>,
    pub tech_stack: Vec<String>,
    pub level: ExperienceLevel,
}

impl CandidateProfile {
    pub fn tech_stack_joined(&self) -> String {
        self.tech_stack.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_years_boundaries() {
        assert_eq!(ExperienceLevel::from_years(0), ExperienceLevel::Junior);
        assert_eq!(ExperienceLevel::from_years(1), ExperienceLevel::Junior);
        assert_eq!(ExperienceLevel::from_years(2), ExperienceLevel::MidLevel);
        assert_eq!(ExperienceLevel::from_years(4), ExperienceLevel::MidLevel);
        assert_eq!(ExperienceLevel::from_years(5), ExperienceLevel::Senior);
        assert_eq!(ExperienceLevel::from_years(30), ExperienceLevel::Senior);
    }

    #[test]
    fn test_level_deserializes_with_mid_alias() {
        let level: ExperienceLevel = serde_json::from_str("\"mid\"").unwrap();
        assert_eq!(level, ExperienceLevel::MidLevel);
        let level: ExperienceLevel = serde_json::from_str("\"mid-level\"").unwrap();
        assert_eq!(level, ExperienceLevel::MidLevel);
        let level: ExperienceLevel = serde_json::from_str("\"junior\"").unwrap();
        assert_eq!(level, ExperienceLevel::Junior);
    }

    #[test]
    fn test_question_count_grows_with_seniority() {
        assert!(
            ExperienceLevel::Junior.question_count() < ExperienceLevel::Senior.question_count()
        );
    }

    #[test]
    fn test_form_missing_fields_default() {
        let form: CandidateForm = serde_json::from_str(r#"{"full_name": "Ada"}"#).unwrap();
        assert_eq!(form.full_name, "Ada");
        assert_eq!(form.experience, 0);
        assert!(form.level.is_none());
        assert!(form.tech_stack.is_empty());
    }
}
