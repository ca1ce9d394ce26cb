// Prompt templates for answer and cover-letter generation.
// Shared fragments live in llm_client::prompts.

/// System prompt for single-field answers.
pub const ANSWER_SYSTEM: &str = "You are filling in a job application on behalf of the applicant. \
    Answer each question truthfully from the applicant profile, favouring answers that keep \
    the application moving. Keep answers short.";

/// Replace: {json_only}, {form_ready}, {label}, {field_type}, {options}, {job}, {profile}
pub const ANSWER_PROMPT_TEMPLATE: &str = r#"{json_only}

{form_ready}

APPLICATION QUESTION:
{label}

FIELD TYPE: {field_type}

OPTIONS:
{options}

JOB:
{job}

APPLICANT PROFILE:
{profile}

Return a JSON object in one of these two shapes:
{"kind": "boolean", "value": true}
{"kind": "text", "value": "your answer"}

RULES:
1. For a yes/no question or a checkbox, use "boolean".
2. When OPTIONS are listed, answer with the NUMBER of the chosen option as text, e.g. {"kind": "text", "value": "2"}.
3. For numeric questions answer with digits only.
4. For free-text questions answer in at most three sentences."#;

/// System prompt for cover letters: plain text only.
pub const COVER_LETTER_SYSTEM: &str = "You are a professional cover letter writer. \
    Write concise, well-structured cover letters as plain text.";

/// Replace: {form_ready}, {title}, {company}, {location}, {description}, {profile}, {applicant}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"{form_ready}

JOB DETAILS:
- Position: {title}
- Company: {company}
- Location: {location}
- Job Description: {description}

APPLICANT CV:
{profile}

REQUIREMENTS:
1. Write the letter from the perspective of {applicant}
2. Address it to the Hiring Manager
3. Reference the CV skills and experience that match the job requirements
4. Keep it between 300 and 400 words
5. Highlight 2-3 concrete achievements from the CV that align with the role
6. Use a professional, confident tone with a proper salutation and closing
7. Do NOT include the date or address blocks
8. Plain text only, ready to paste into a form field

Cover letter:"#;

/// Used when cover-letter generation fails and nothing is stored.
/// Replace: {title}, {company}, {applicant}
pub const FALLBACK_COVER_LETTER_TEMPLATE: &str = "Dear Hiring Manager,

I am writing to express my interest in the {title} position at {company}. \
I was excited to learn about this opportunity and believe my skills and experience \
align well with the requirements of the role.

I would welcome the opportunity to discuss how my background can contribute to your team. \
Thank you for considering my application.

Sincerely,
{applicant}";
