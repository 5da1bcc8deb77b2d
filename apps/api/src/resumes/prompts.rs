// Resume import and section assist prompt templates.

/// System prompt for resume import.
pub const RESUME_PARSE_SYSTEM: &str =
    "You are a helpful assistant that extracts structured data from resumes.";

/// Resume import prompt. Replace `{resume_text}` before sending.
pub const RESUME_PARSE_PROMPT_TEMPLATE: &str = r#"You are an expert resume parser. Extract the following details from the resume text below and return them in a strict JSON format matching this structure:

{
  "profile": {
    "name": "", "email": "", "phone": "",
    "url": "LinkedIn or portfolio link",
    "summary": "", "location": ""
  },
  "workExperiences": [
    {"company": "", "jobTitle": "", "date": "", "descriptions": ["bullet point"]}
  ],
  "educations": [
    {"school": "", "degree": "", "date": "", "gpa": "", "descriptions": []}
  ],
  "projects": [
    {"project": "project name", "date": "", "descriptions": []}
  ],
  "skills": {
    "featuredSkills": [{"skill": "", "rating": 4}],
    "descriptions": ["other skill categories"]
  }
}

Extract the top 6 skills as featuredSkills with a default rating of 4.
Use empty strings or arrays when data is missing.

Resume Text:
{resume_text}"#;

pub const ASSIST_SYSTEM: &str = "You are an expert resume writer.";

/// Replace `{role}` and `{background}`.
pub const SUMMARY_PROMPT_TEMPLATE: &str = "Create a professional resume summary for a {role} \
with the following background: {background}. \
Keep it concise, impactful, and under 50 words.";

/// Replace `{description}`.
pub const EXPERIENCE_PROMPT_TEMPLATE: &str = "Enhance the following job description for a resume bullet point. \
Make it action-oriented, quantifiable, and professional:
\"{description}\"";

/// Replace `{role}` and `{background}`.
pub const SKILLS_PROMPT_TEMPLATE: &str = "Suggest 5 key technical skills for a {role} based on this background: \
{background}. Return only the skills as a comma-separated list.";
