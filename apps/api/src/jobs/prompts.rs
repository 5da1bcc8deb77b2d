// Job posting LLM prompt templates.

pub const REWRITE_SYSTEM: &str = "You are a professional HR copywriter. \
You rewrite job descriptions and requirements to be clear, inclusive, and exciting.";

pub const REWRITE_PROMPT: &str = "Rewrite the following job {field} to be more professional, \
engaging, and clear. Keep the tone suitable for a modern tech job listing.

Original Text:
{text}

Rewritten Version:";
