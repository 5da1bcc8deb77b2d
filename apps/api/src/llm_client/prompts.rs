// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Appended to the system prompt of every JSON-producing call.
pub const JSON_ONLY_SUFFIX: &str = "IMPORTANT: Return ONLY valid JSON. \
    No markdown formatting, no code blocks, no explanations.";
