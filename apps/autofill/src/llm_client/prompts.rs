// Prompt fragments shared by every generator.
// Each generator keeps its own templates next to it (resolver/prompts.rs).

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every prompt whose output is pasted straight into a form.
pub const FORM_READY_INSTRUCTION: &str = "\
    The output is pasted verbatim into a job application form. \
    Do NOT leave placeholders such as [Company] or blank fields. \
    Do NOT invent employers, degrees or certifications that are not in the applicant profile.";
