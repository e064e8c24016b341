// Interview LLM prompt templates.
// All prompts for the interview module are defined here; `prompt_builder`
// fills the `{placeholders}`.

pub const QUESTION_SYSTEM: &str = "You are a technical interviewer generating relevant \
    interview questions based on experience level and tech stack. \
    Output only the numbered questions, one per line.";

/// Replace: {count}, {level}, {years}, {position}, {tech_stack}, {complexity}
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"Generate {count} technical interview questions for a {level} developer with {years} years of experience, applying for the position of {position}.
The candidate is familiar with: {tech_stack}

Requirements:
1. Questions should be {complexity} level
2. Include at least one question for each technology listed
3. Mix theoretical and practical questions
4. Test both knowledge and problem-solving ability
5. Include at least one system design or architecture question suitable for a {level} candidate
6. Write each question on its own line as a clear, concise sentence

Format:
1. [Technology] Question about a specific concept
2. [Technology] Practical problem-solving scenario
3. [Technology] System design or architecture question"#;

pub const ANALYSIS_SYSTEM: &str =
    "You are an expert technical interviewer evaluating candidate responses. \
    Be strict, fair and concise.";

/// Replace: {question}, {response}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Evaluate the candidate's response to the technical question.

Question: {question}
Response: {response}

Assess technical accuracy, completeness, clarity of explanation and areas for improvement.

Start your answer with exactly these three lines:
Score: [number from 0 to 10]
Satisfactory: [true/false]
Feedback: [one or two sentences of feedback for the candidate]

Then give a short structured analysis."#;

pub const FOLLOW_UP_SYSTEM: &str =
    "You are an expert technical interviewer generating follow-up questions. \
    Output only the question.";

/// Replace: {tech_stack}, {question}, {response}, {prior_questions}
pub const FOLLOW_UP_PROMPT_TEMPLATE: &str = r#"The candidate's answer to the last question was weak. Generate one follow-up question that probes the same topic further.

The candidate is familiar with: {tech_stack}
Question: {question}
Candidate's response: {response}

Questions already asked (do not repeat them):
{prior_questions}

Generate a single focused, relevant follow-up question that builds on the candidate's response."#;

pub const SUMMARY_SYSTEM: &str =
    "You are an expert technical interviewer providing a comprehensive interview summary.";

/// Replace: {name}, {position}, {years}, {level}, {tech_stack}, {question_count},
///          {aggregate}, {transcript}
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Generate a comprehensive interview summary for the following candidate:
Name: {name}
Position: {position}
Experience: {years} years ({level})
Tech Stack: {tech_stack}
Questions Answered: {question_count}
Average Score: {aggregate}/10

Interview Transcript:
{transcript}

Provide a structured summary including:
1. Overall Performance (0-10)
2. Key Strengths
3. Areas for Improvement
4. Technical Knowledge Assessment
5. Communication Skills
6. Final Recommendation"#;
