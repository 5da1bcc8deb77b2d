//! Fixed resume schema shared by the resume importer and the builder UI.
//!
//! Every field is `#[serde(default)]` so a partial LLM reply merges onto
//! the empty resume instead of failing to parse.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// LinkedIn or portfolio link.
    pub url: String,
    pub summary: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeWorkExperience {
    pub company: String,
    pub job_title: String,
    pub date: String,
    pub descriptions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeEducation {
    pub school: String,
    pub degree: String,
    pub date: String,
    pub gpa: String,
    pub descriptions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeProject {
    pub project: String,
    pub date: String,
    pub descriptions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturedSkill {
    pub skill: String,
    pub rating: f32,
}

impl Default for FeaturedSkill {
    fn default() -> Self {
        Self {
            skill: String::new(),
            rating: 4.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResumeSkills {
    pub featured_skills: Vec<FeaturedSkill>,
    pub descriptions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeCustom {
    pub descriptions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Resume {
    pub profile: ResumeProfile,
    pub work_experiences: Vec<ResumeWorkExperience>,
    pub educations: Vec<ResumeEducation>,
    pub projects: Vec<ResumeProject>,
    pub skills: ResumeSkills,
    pub custom: ResumeCustom,
}
