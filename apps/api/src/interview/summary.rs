use chrono::{DateTime, Utc};

use crate::interview::session::InterviewSession;

/// Plain-text interview report offered as a download. Unstructured by intent:
/// header, one block per turn, the aggregate line, then the model's summary.
pub fn render_summary(session: &InterviewSession) -> String {
    let mut out = String::from("TalentScout Interview Summary\n=============================\n\n");

    if let Some(p) = &session.profile {
        out.push_str(&format!("Candidate: {}\n", p.full_name));
        out.push_str(&format!("Email: {}\n", p.email));
        out.push_str(&format!("Phone: {}\n", p.phone));
        out.push_str(&format!("Position: {}\n", p.position));
        if let Some(location) = &p.location {
            out.push_str(&format!("Location: {location}\n"));
        }
        out.push_str(&format!(
            "Experience: {} years ({})\n",
            p.experience_years, p.level
        ));
        out.push_str(&format!("Tech Stack: {}\n", p.tech_stack_joined()));
    }
    out.push_str(&format!(
        "Started: {}\n\n",
        session.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    for (i, turn) in session.turns.iter().enumerate() {
        let kind = if turn.is_follow_up { "Follow-up" } else { "Question" };
        out.push_str(&format!("{kind} {}: {}\n", i + 1, turn.question));
        out.push_str(&format!("Response: {}\n", turn.response));
        out.push_str(&format!(
            "Score: {:.1}/10 ({})\n",
            turn.score,
            turn.score_source.label()
        ));
        out.push_str(&format!("Feedback: {}\n\n", turn.feedback));
    }

    let aggregate = session.final_score.unwrap_or_else(|| session.aggregate_score());
    out.push_str(&format!(
        "Aggregate Score: {aggregate:.2}/10 over {} answer(s)\n",
        session.turns.len()
    ));

    if let Some(summary) = &session.summary {
        out.push_str("\nAssessment\n----------\n");
        out.push_str(summary.trim());
        out.push('\n');
    }
    out
}

/// `interview_summary_Jane_Doe_20240131_154500.txt`
pub fn summary_filename(session: &InterviewSession, now: DateTime<Utc>) -> String {
    let name = session
        .profile
        .as_ref()
        .map(|p| p.full_name.as_str())
        .unwrap_or("candidate");
    let safe: String = name
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!(
        "interview_summary_{safe}_{}.txt",
        now.format("%Y%m%d_%H%M%S")
    )
}
